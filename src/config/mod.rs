// ==========================================
// 陶瓷库存系统 - 配置层
// ==========================================
// 职责: 系统配置管理（导入约定 + 商品目录规则）
// 存储: config_kv 表
// ==========================================

pub mod catalog_rules;
pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use catalog_rules::{
    CatalogRules, CategoryRule, ClassificationRules, KeywordMatcher, NormalizationRules,
};
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfigReader, ImportSettings};
