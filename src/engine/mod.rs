// ==========================================
// 陶瓷库存系统 - 引擎层
// ==========================================
// 职责: 名称规范化、分类、全量对账、快照聚合
// 红线: Engine 不拼 SQL, 规则表构建后只读
// ==========================================

pub mod classifier;
pub mod normalizer;
pub mod reconciliation;
pub mod stock_aggregator;

// 重导出核心引擎
pub use classifier::{classify, CategoryClassifier};
pub use normalizer::{normalize, NameNormalizer};
pub use reconciliation::ReconciliationEngine;
pub use stock_aggregator::{group_summaries, CategoryGroup, StockAggregator};
