// ==========================================
// 陶瓷库存系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod import;
pub mod stock;
pub mod types;

// 重导出核心类型
pub use import::{ImportBatch, ImportResult, ImportRow, QuantityCell, MAX_QUANTITY};
pub use stock::{Product, StockEntry, StockQuery, StockSummary, Warehouse};
pub use types::Category;
