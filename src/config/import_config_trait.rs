// ==========================================
// 陶瓷库存系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 导入表头约定的汇总视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    /// 首列表头（大小写不敏感匹配）
    pub item_header: String,
    /// 占位列前缀（以此开头的列不视为仓库）
    pub placeholder_prefix: String,
    /// 上传入口允许的扩展名（小写，不含点）
    pub upload_extensions: Vec<String>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            item_header: "Item".to_string(),
            placeholder_prefix: "unnamed".to_string(),
            upload_extensions: vec!["xlsx".to_string(), "xls".to_string()],
        }
    }
}

impl ImportSettings {
    /// 表头是否为商品列
    pub fn is_item_header(&self, header: &str) -> bool {
        header.trim().eq_ignore_ascii_case(self.item_header.trim())
    }

    /// 表头是否为占位列（空表头同样视为占位）
    pub fn is_placeholder_header(&self, header: &str) -> bool {
        let header = header.trim();
        header.is_empty()
            || header
                .to_lowercase()
                .starts_with(&self.placeholder_prefix.to_lowercase())
    }

    /// 扩展名是否允许通过上传入口导入
    pub fn accepts_upload_extension(&self, ext: &str) -> bool {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        self.upload_extensions
            .iter()
            .any(|e| e.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取商品列表头
    ///
    /// # 默认值
    /// - "Item"
    async fn get_item_header(&self) -> Result<String, Box<dyn Error>>;

    /// 获取占位列前缀
    ///
    /// # 默认值
    /// - "unnamed"
    async fn get_placeholder_prefix(&self) -> Result<String, Box<dyn Error>>;

    /// 获取上传入口允许的扩展名
    ///
    /// # 默认值
    /// - ["xlsx", "xls"]
    async fn get_upload_extensions(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 一次性读取全部导入约定
    async fn get_import_settings(&self) -> Result<ImportSettings, Box<dyn Error>> {
        // 逐个绑定：`?` 的临时值不能跨越下一个 await（Box<dyn Error> 非 Send）
        let item_header = self.get_item_header().await?;
        let placeholder_prefix = self.get_placeholder_prefix().await?;
        let upload_extensions = self.get_upload_extensions().await?;
        Ok(ImportSettings {
            item_header,
            placeholder_prefix,
            upload_extensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_predicates() {
        let settings = ImportSettings::default();
        assert!(settings.is_item_header(" item "));
        assert!(settings.is_item_header("ITEM"));
        assert!(!settings.is_item_header("Items"));

        assert!(settings.is_placeholder_header("Unnamed: 3"));
        assert!(settings.is_placeholder_header("  "));
        assert!(!settings.is_placeholder_header("Gudang X"));
    }

    #[test]
    fn test_upload_extensions() {
        let settings = ImportSettings::default();
        assert!(settings.accepts_upload_extension("XLSX"));
        assert!(settings.accepts_upload_extension(".xls"));
        assert!(!settings.accepts_upload_extension("csv"));

        let configured = ImportSettings {
            upload_extensions: vec![".XLSX".to_string()],
            ..ImportSettings::default()
        };
        assert!(configured.accepts_upload_extension("xlsx"));
        assert!(!configured.accepts_upload_extension("xls"));
    }
}
