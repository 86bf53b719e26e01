// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、引擎组装等功能
// ==========================================

#![allow(dead_code)]

use ceramic_stock::db::{init_schema, open_sqlite_connection};
use ceramic_stock::domain::StockSummary;
use ceramic_stock::engine::{
    CategoryClassifier, NameNormalizer, ReconciliationEngine, StockAggregator,
};
use ceramic_stock::repository::StockRepository;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（与 AppState 相同的注入方式）
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).expect("打开测试数据库失败");
    Arc::new(Mutex::new(conn))
}

/// 测试用引擎组合（默认目录规则）
pub struct TestEngines {
    pub conn: Arc<Mutex<Connection>>,
    pub stock_repo: Arc<StockRepository>,
    pub reconciliation: ReconciliationEngine,
    pub aggregator: StockAggregator,
}

pub fn build_engines(db_path: &str) -> TestEngines {
    let conn = open_shared(db_path);
    let stock_repo = Arc::new(StockRepository::from_connection(conn.clone()));
    TestEngines {
        conn,
        stock_repo: stock_repo.clone(),
        reconciliation: ReconciliationEngine::new(
            stock_repo.clone(),
            Arc::new(NameNormalizer::default()),
        ),
        aggregator: StockAggregator::new(stock_repo, Arc::new(CategoryClassifier::default())),
    }
}

/// 从快照中取某商品在某仓库的数量
pub fn quantity_in(snapshot: &[StockSummary], item: &str, warehouse: &str) -> Option<i64> {
    snapshot
        .iter()
        .find(|s| s.canonical_name == item)
        .and_then(|s| s.per_warehouse.get(warehouse).copied())
}

/// 写入 CSV 测试文件
pub fn write_csv(content: &str) -> NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("创建临时 CSV 失败");
    file.write_all(content.as_bytes()).expect("写入临时 CSV 失败");
    file
}
