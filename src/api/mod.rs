// ==========================================
// 陶瓷库存系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行/传输层调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod stock_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorClass};
pub use import_api::{ImportApi, ImportApiResponse};
pub use stock_api::StockApi;
