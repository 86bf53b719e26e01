// ==========================================
// 陶瓷库存系统 - 库存对账引擎
// ==========================================
// 红线: Engine 不拼 SQL（写入经由 repository 的事务内函数）
// 红线: 全有或全无；仓库清零、实体创建、数量写入共享同一事务
// ==========================================
// 流程:
// 1. 校验批次结构（至少一个仓库列）
// 2. 解析/创建仓库 → 将这些仓库的全部库存清零
// 3. 逐行: 跳过空商品名 → 规范化 → 解析/创建商品 → 逐仓 UPSERT
// 4. 统计去重后的规范商品数
// 5. 提交（任一步失败 → 整体回滚）
// ==========================================

use crate::domain::import::{ImportBatch, ImportResult};
use crate::engine::normalizer::NameNormalizer;
use crate::importer::error::ImportError;
use crate::repository::identity_repo::{resolve_or_create_tx, EntityKind};
use crate::repository::stock_repo::{reset_warehouses_tx, upsert_tx, StockRepository};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// ReconciliationEngine - 对账引擎
// ==========================================
pub struct ReconciliationEngine {
    stock_repo: Arc<StockRepository>,
    normalizer: Arc<NameNormalizer>,
}

impl ReconciliationEngine {
    pub fn new(stock_repo: Arc<StockRepository>, normalizer: Arc<NameNormalizer>) -> Self {
        Self {
            stock_repo,
            normalizer,
        }
    }

    /// 执行一次全量对账
    ///
    /// # 参数
    /// - batch: 已解析的导入批次
    ///
    /// # 返回
    /// - Ok(ImportResult): 已提交
    /// - Err(NoWarehouseColumns): 结构校验失败，未做任何写入
    /// - Err(Persistence): 存储失败，事务已回滚
    #[instrument(skip(self, batch), fields(rows = batch.rows.len()))]
    pub fn reconcile(&self, batch: &ImportBatch) -> Result<ImportResult, ImportError> {
        let started = Instant::now();
        let import_id = Uuid::new_v4().to_string();

        let warehouse_names = batch.distinct_warehouse_names();
        if warehouse_names.iter().all(|name| name.trim().is_empty()) {
            tracing::warn!(import_id = %import_id, "导入批次没有仓库列");
            return Err(ImportError::NoWarehouseColumns);
        }

        tracing::info!(
            import_id = %import_id,
            warehouses = ?warehouse_names,
            rows = batch.rows.len(),
            "开始库存对账"
        );

        let outcome = self.stock_repo.run_in_transaction(|tx| {
            // ===== 仓库解析 + 清零 =====
            let mut warehouse_ids = Vec::with_capacity(warehouse_names.len());
            for name in &warehouse_names {
                warehouse_ids.push(resolve_or_create_tx(tx, EntityKind::Warehouse, name)?);
            }
            let reset_count = reset_warehouses_tx(tx, &warehouse_ids)?;
            tracing::debug!(import_id = %import_id, reset_count, "仓库库存已清零");

            // 表头列 → 仓库 ID（重复表头映射到同一仓库，后列覆盖前列）
            let column_ids: Vec<i64> = batch
                .warehouse_names
                .iter()
                .map(|name| {
                    warehouse_names
                        .iter()
                        .position(|n| n == name)
                        .map(|idx| warehouse_ids[idx])
                })
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| ImportError::InternalError("仓库列映射失败".to_string()))?;

            // ===== 逐行写入 =====
            let mut unique_names: HashSet<String> = HashSet::new();
            let mut rows_processed = 0usize;
            let mut rows_skipped = 0usize;

            for row in &batch.rows {
                let raw = match row.item.as_deref().map(str::trim) {
                    Some(raw) if !raw.is_empty() => raw,
                    _ => {
                        tracing::debug!(row = row.row_number, "商品名为空，跳过");
                        rows_skipped += 1;
                        continue;
                    }
                };

                let canonical = self.normalizer.normalize(raw);
                let product_id = resolve_or_create_tx(tx, EntityKind::Product, &canonical)?;

                for (column, warehouse_id) in column_ids.iter().enumerate() {
                    upsert_tx(tx, product_id, *warehouse_id, row.quantity_at(column))?;
                }

                unique_names.insert(canonical);
                rows_processed += 1;
            }

            Ok::<_, ImportError>((unique_names.len(), rows_processed, rows_skipped))
        });

        let (unique_items_count, rows_processed, rows_skipped) = match outcome {
            Ok(counts) => counts,
            Err(e) => {
                tracing::error!(import_id = %import_id, error = %e, "库存对账失败，已回滚");
                return Err(e);
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            import_id = %import_id,
            unique_items_count,
            rows_processed,
            rows_skipped,
            elapsed_ms,
            "库存对账完成"
        );

        Ok(ImportResult {
            import_id,
            unique_items_count,
            warehouse_names,
            rows_processed,
            rows_skipped,
            imported_at: Utc::now(),
            elapsed_ms,
        })
    }
}
