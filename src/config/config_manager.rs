// ==========================================
// 陶瓷库存系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::catalog_rules::CatalogRules;
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，键有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 商品目录规则 =====

    /// 加载商品目录规则
    ///
    /// # 返回
    /// - 未配置覆盖: 内置默认规则
    /// - 配置了覆盖: 解析并校验后的规则（统一转大写）
    /// - Err: 覆盖值无法解析或校验失败（不静默回退）
    pub fn load_catalog_rules(&self) -> Result<CatalogRules, Box<dyn Error>> {
        let raw = match self.get_config_value(config_keys::CATALOG_RULES)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(CatalogRules::default()),
        };

        let rules: CatalogRules = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(config_key = config_keys::CATALOG_RULES, error = %e, "商品目录规则解析失败");
            format!("商品目录规则解析失败: {}", e)
        })?;
        let rules = rules.into_uppercase();
        rules
            .validate()
            .map_err(|e| format!("商品目录规则校验失败: {}", e))?;

        tracing::info!(
            rule_count = rules.classification.rules.len(),
            "已加载自定义商品目录规则"
        );
        Ok(rules)
    }

    /// 保存商品目录规则覆盖
    pub fn save_catalog_rules(&self, rules: &CatalogRules) -> Result<(), Box<dyn Error>> {
        rules.validate()?;
        let raw = serde_json::to_string(rules)?;
        self.set_global_config_value(config_keys::CATALOG_RULES, &raw)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_item_header(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_or_default(config_keys::IMPORT_ITEM_HEADER, "Item")?
            .trim()
            .to_string())
    }

    async fn get_placeholder_prefix(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_or_default(config_keys::IMPORT_PLACEHOLDER_PREFIX, "unnamed")?
            .trim()
            .to_string())
    }

    async fn get_upload_extensions(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::IMPORT_UPLOAD_EXTENSIONS, "xlsx,xls")?;

        let exts: Vec<String> = value
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        if exts.is_empty() {
            Ok(vec!["xlsx".to_string(), "xls".to_string()])
        } else {
            Ok(exts)
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 商品目录规则 (JSON)
    pub const CATALOG_RULES: &str = "catalog_rules";

    // 导入表头约定
    pub const IMPORT_ITEM_HEADER: &str = "import_item_header";
    pub const IMPORT_PLACEHOLDER_PREFIX: &str = "import_placeholder_prefix";
    pub const IMPORT_UPLOAD_EXTENSIONS: &str = "import_upload_extensions";
}
