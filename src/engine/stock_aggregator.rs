// ==========================================
// 陶瓷库存系统 - 库存快照聚合引擎
// ==========================================
// 红线: Engine 不拼 SQL；分类在读取时计算，不落库
// ==========================================
// 输出: 每个商品一条 StockSummary，按规范名升序
// - total_quantity: 全部仓库数量之和（无记录为 0，商品仍列出）
// - per_warehouse: 覆盖系统内全部仓库，无记录的仓库为 0
// ==========================================

use crate::domain::stock::{StockQuery, StockSummary};
use crate::domain::types::Category;
use crate::engine::classifier::CategoryClassifier;
use crate::repository::error::RepositoryResult;
use crate::repository::stock_repo::StockRepository;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::instrument;

/// 按分类分组的快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub total_quantity: i64,
    pub items: Vec<StockSummary>,
}

// ==========================================
// StockAggregator - 快照聚合器
// ==========================================
pub struct StockAggregator {
    stock_repo: Arc<StockRepository>,
    classifier: Arc<CategoryClassifier>,
}

impl StockAggregator {
    pub fn new(stock_repo: Arc<StockRepository>, classifier: Arc<CategoryClassifier>) -> Self {
        Self {
            stock_repo,
            classifier,
        }
    }

    /// 全量库存快照
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> RepositoryResult<Vec<StockSummary>> {
        let rows = self.stock_repo.read_snapshot_rows()?;

        let warehouse_names: HashMap<i64, &str> = rows
            .warehouses
            .iter()
            .map(|w| (w.id, w.name.as_str()))
            .collect();
        let blank: BTreeMap<String, i64> = rows
            .warehouses
            .iter()
            .map(|w| (w.name.clone(), 0))
            .collect();

        let mut per_product: HashMap<i64, BTreeMap<String, i64>> = HashMap::new();
        for entry in &rows.entries {
            if let Some(name) = warehouse_names.get(&entry.warehouse_id) {
                per_product
                    .entry(entry.product_id)
                    .or_insert_with(|| blank.clone())
                    .insert((*name).to_string(), entry.quantity);
            }
        }

        let summaries: Vec<StockSummary> = rows
            .products
            .into_iter()
            .map(|(product, total_quantity)| StockSummary {
                category: self.classifier.classify(&product.canonical_name),
                per_warehouse: per_product
                    .remove(&product.id)
                    .unwrap_or_else(|| blank.clone()),
                id: product.id,
                canonical_name: product.canonical_name,
                total_quantity,
            })
            .collect();

        tracing::debug!(
            products = summaries.len(),
            warehouses = rows.warehouses.len(),
            "库存快照已生成"
        );
        Ok(summaries)
    }

    /// 按条件过滤的快照（名称关键字 + 分类）
    pub fn snapshot_filtered(&self, query: &StockQuery) -> RepositoryResult<Vec<StockSummary>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|summary| query.matches(summary))
            .collect())
    }

    /// 按分类分组（仅含有商品的分类，按规则顺序，Lainnya 在最后）
    pub fn group_by_category(&self, query: &StockQuery) -> RepositoryResult<Vec<CategoryGroup>> {
        Ok(group_summaries(self.snapshot_filtered(query)?))
    }
}

/// 将快照按分类分组（组内保持规范名升序）
pub fn group_summaries(summaries: Vec<StockSummary>) -> Vec<CategoryGroup> {
    let mut buckets: BTreeMap<usize, Vec<StockSummary>> = BTreeMap::new();
    for summary in summaries {
        let rank = Category::ALL
            .iter()
            .position(|c| *c == summary.category)
            .unwrap_or(Category::ALL.len());
        buckets.entry(rank).or_default().push(summary);
    }

    buckets
        .into_values()
        .filter_map(|items| {
            let category = items.first()?.category;
            Some(CategoryGroup {
                category,
                total_quantity: items
                    .iter()
                    .fold(0i64, |acc, s| acc.saturating_add(s.total_quantity)),
                items,
            })
        })
        .collect()
}
