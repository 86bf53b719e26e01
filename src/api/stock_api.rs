// ==========================================
// 陶瓷库存系统 - 库存 API
// ==========================================
// 职责: 库存快照查询、商品/仓库维护、单品单仓数量更新
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::import::MAX_QUANTITY;
use crate::domain::stock::{Product, StockEntry, StockQuery, StockSummary, Warehouse};
use crate::engine::normalizer::NameNormalizer;
use crate::engine::stock_aggregator::{CategoryGroup, StockAggregator};
use crate::i18n::{t, t_with_args};
use crate::repository::error::RepositoryError;
use crate::repository::product_repo::ProductRepository;
use crate::repository::stock_repo::StockRepository;
use crate::repository::warehouse_repo::WarehouseRepository;

// ==========================================
// StockApi - 库存 API
// ==========================================
pub struct StockApi {
    product_repo: Arc<ProductRepository>,
    warehouse_repo: Arc<WarehouseRepository>,
    stock_repo: Arc<StockRepository>,
    aggregator: Arc<StockAggregator>,
    normalizer: Arc<NameNormalizer>,
}

impl StockApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        warehouse_repo: Arc<WarehouseRepository>,
        stock_repo: Arc<StockRepository>,
        aggregator: Arc<StockAggregator>,
        normalizer: Arc<NameNormalizer>,
    ) -> Self {
        Self {
            product_repo,
            warehouse_repo,
            stock_repo,
            aggregator,
            normalizer,
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 库存快照（可按名称关键字、分类过滤）
    pub fn get_stock(&self, query: &StockQuery) -> ApiResult<Vec<StockSummary>> {
        let summaries = self.aggregator.snapshot_filtered(query)?;
        debug!(count = summaries.len(), "查询库存快照");
        Ok(summaries)
    }

    /// 按分类分组的库存快照
    pub fn get_stock_by_category(&self, query: &StockQuery) -> ApiResult<Vec<CategoryGroup>> {
        Ok(self.aggregator.group_by_category(query)?)
    }

    pub fn list_warehouses(&self) -> ApiResult<Vec<Warehouse>> {
        Ok(self.warehouse_repo.list_all()?)
    }

    // ==========================================
    // 维护接口
    // ==========================================

    /// 新增商品（名称先规范化）
    ///
    /// # 返回
    /// - Err(InvalidInput): 规范化后为空
    /// - Err(BusinessRuleViolation): 规范名已存在
    pub fn add_product(&self, raw_name: &str) -> ApiResult<Product> {
        let canonical = self.normalizer.normalize(raw_name);
        if canonical.is_empty() {
            return Err(ApiError::InvalidInput(t("stock.empty_name")));
        }

        let product = self
            .product_repo
            .create(&canonical)
            .map_err(|e| duplicate_as_business_error(e, &canonical))?;
        info!(id = product.id, name = %product.canonical_name, "新增商品");
        Ok(product)
    }

    /// 新增仓库（名称去首尾空白，保留大小写）
    pub fn add_warehouse(&self, name: &str) -> ApiResult<Warehouse> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput(t("stock.empty_name")));
        }

        let warehouse = self
            .warehouse_repo
            .create(name)
            .map_err(|e| duplicate_as_business_error(e, name))?;
        info!(id = warehouse.id, name = %warehouse.name, "新增仓库");
        Ok(warehouse)
    }

    /// 删除商品（库存记录级联删除）
    pub fn delete_product(&self, product_id: i64) -> ApiResult<()> {
        self.product_repo.delete(product_id)?;
        info!(id = product_id, "删除商品");
        Ok(())
    }

    /// 删除仓库（库存记录级联删除）
    pub fn delete_warehouse(&self, warehouse_id: i64) -> ApiResult<()> {
        self.warehouse_repo.delete(warehouse_id)?;
        info!(id = warehouse_id, "删除仓库");
        Ok(())
    }

    /// 直接设置单品单仓数量
    pub fn update_stock(
        &self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i64,
    ) -> ApiResult<StockEntry> {
        if quantity < 0 {
            return Err(ApiError::InvalidInput(t("stock.negative_quantity")));
        }
        if quantity > MAX_QUANTITY {
            let max = MAX_QUANTITY.to_string();
            return Err(ApiError::InvalidInput(t_with_args(
                "stock.quantity_too_large",
                &[("max", max.as_str())],
            )));
        }
        if self.product_repo.find_by_id(product_id)?.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: product_id.to_string(),
            }
            .into());
        }
        if self.warehouse_repo.find_by_id(warehouse_id)?.is_none() {
            return Err(RepositoryError::NotFound {
                entity: "Warehouse".to_string(),
                id: warehouse_id.to_string(),
            }
            .into());
        }

        let entry = self
            .stock_repo
            .upsert_quantity(product_id, warehouse_id, quantity)?;
        info!(product_id, warehouse_id, quantity, "更新库存数量");
        Ok(entry)
    }
}

fn duplicate_as_business_error(err: RepositoryError, name: &str) -> ApiError {
    match err {
        RepositoryError::UniqueConstraintViolation(_) => {
            ApiError::BusinessRuleViolation(t_with_args("stock.duplicate_name", &[("name", name)]))
        }
        other => other.into(),
    }
}
