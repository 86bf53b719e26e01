// ==========================================
// 陶瓷库存系统 - 库存导入API
// ==========================================
// 职责: 封装库存表格导入（文件路径 / 上传内容）
// ==========================================

use crate::api::error::ApiError;
use crate::config::ConfigManager;
use crate::domain::import::ImportResult;
use crate::i18n::t_with_args;
use crate::importer::{StockImporter, StockImporterImpl};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 结果摘要（本地化）
    pub message: String,
    /// 被全量更新的仓库说明（本地化）
    pub details: String,
    /// 去重后的规范商品数
    pub unique_items_count: usize,
    pub warehouse_names: Vec<String>,
    /// 导入ID（日志关联）
    pub import_id: String,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
}

impl From<ImportResult> for ImportApiResponse {
    fn from(result: ImportResult) -> Self {
        let count = result.unique_items_count.to_string();
        let warehouses = result.warehouse_names.join(", ");
        Self {
            message: t_with_args("import.success", &[("count", count.as_str())]),
            details: t_with_args("import.details", &[("warehouses", warehouses.as_str())]),
            unique_items_count: result.unique_items_count,
            warehouse_names: result.warehouse_names,
            import_id: result.import_id,
            elapsed_ms: result.elapsed_ms,
        }
    }
}

/// 导入API
pub struct ImportApi {
    importer: Arc<StockImporterImpl<ConfigManager>>,
}

impl ImportApi {
    pub fn new(importer: Arc<StockImporterImpl<ConfigManager>>) -> Self {
        Self { importer }
    }

    /// 从本地文件导入（.xlsx / .xls / .csv）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 已提交
    /// - Err(ApiError): 客户端错误（文件/结构）或服务端错误（持久化，已回滚）
    pub async fn import_file(&self, file_path: &str) -> Result<ImportApiResponse, ApiError> {
        match self.importer.import_from_file(file_path).await {
            Ok(result) => Ok(result.into()),
            Err(e) => {
                warn!(file_path = %file_path, error = %e, "导入失败");
                Err(e.into())
            }
        }
    }

    /// 从上传内容导入（仅 .xlsx / .xls）
    pub async fn import_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ImportApiResponse, ApiError> {
        match self.importer.import_from_bytes(file_name, bytes).await {
            Ok(result) => Ok(result.into()),
            Err(e) => {
                warn!(file_name = %file_name, error = %e, "上传导入失败");
                Err(e.into())
            }
        }
    }
}
