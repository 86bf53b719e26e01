// ==========================================
// 陶瓷库存系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ImportApi, StockApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{
    classifier::CategoryClassifier, normalizer::NameNormalizer,
    reconciliation::ReconciliationEngine, stock_aggregator::StockAggregator,
};
use crate::importer::StockImporterImpl;
use crate::repository::{
    product_repo::ProductRepository, stock_repo::StockRepository,
    warehouse_repo::WarehouseRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源，所有仓储共用同一连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 库存API
    pub stock_api: Arc<StockApi>,

    /// 库存导入API
    pub import_api: Arc<ImportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 用于测试）
    ///
    /// # 返回
    /// - Ok(AppState): 成功创建
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 目录规则在启动时读取一次，之后规范化器/分类器只读共享
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库 schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置与目录规则
        // ==========================================
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        let catalog_rules = config_manager
            .load_catalog_rules()
            .map_err(|e| format!("目录规则加载失败: {}", e))?;

        let normalizer = Arc::new(NameNormalizer::new(&catalog_rules.normalization));
        let classifier = Arc::new(CategoryClassifier::new(&catalog_rules.classification));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let warehouse_repo = Arc::new(WarehouseRepository::from_connection(conn.clone()));
        let stock_repo = Arc::new(StockRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let reconciliation = Arc::new(ReconciliationEngine::new(
            stock_repo.clone(),
            normalizer.clone(),
        ));
        let aggregator = Arc::new(StockAggregator::new(stock_repo.clone(), classifier));

        // ==========================================
        // 初始化API层
        // ==========================================
        let stock_api = Arc::new(StockApi::new(
            product_repo,
            warehouse_repo,
            stock_repo,
            aggregator,
            normalizer,
        ));

        let importer_config = ConfigManager::from_connection(conn)
            .map_err(|e| format!("无法创建导入配置读取器: {}", e))?;
        let importer = Arc::new(StockImporterImpl::new(importer_config, reconciliation));
        let import_api = Arc::new(ImportApi::new(importer));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            stock_api,
            import_api,
            config_manager: Arc::new(config_manager),
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 CERAMIC_STOCK_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CERAMIC_STOCK_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./stok_keramik.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("ceramic-stock");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("stok_keramik.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 从环境变量 CERAMIC_STOCK_LOCALE 读取界面语言
pub fn locale_from_env() -> Option<String> {
    std::env::var("CERAMIC_STOCK_LOCALE")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
