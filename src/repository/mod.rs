// ==========================================
// 陶瓷库存系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 连接由调用方注入（Arc<Mutex<Connection>>），每个方法即一个工作单元
// ==========================================

pub mod error;
pub mod identity_repo;
pub mod product_repo;
pub mod stock_repo;
pub mod warehouse_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use identity_repo::{resolve_or_create_tx, EntityKind, IdentityResolver};
pub use product_repo::ProductRepository;
pub use stock_repo::{StockRepository, StockSnapshotRows};
pub use warehouse_repo::WarehouseRepository;
