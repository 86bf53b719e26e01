// ==========================================
// 陶瓷库存系统 - 库存导入 Trait 定义
// ==========================================
// 职责: 定义导入流程各环节的接口（不包含实现）
// 流程: 文件解析 → RawSheet → ImportBatch → 对账事务
// ==========================================

use crate::domain::import::{ImportResult, QuantityCell};
use crate::importer::error::ImportError;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// RawSheet - 解析后的原始表格
// ==========================================
/// 第一个工作表的原始内容（表头 + 数据行），尚未做结构校验
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 表格行号（从 1 开始，表头为第 1 行）
    pub cells: Vec<QuantityCell>,
}

// ==========================================
// StockImporter Trait
// ==========================================
// 用途: 库存表格导入主接口
// 实现者: StockImporterImpl
#[async_trait]
pub trait StockImporter: Send + Sync {
    /// 从 Excel 文件导入（.xlsx / .xls）
    ///
    /// # 返回
    /// - Ok(ImportResult): 对账已提交
    /// - Err(ImportError): 文件/结构/持久化错误（持久化错误时已整体回滚）
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError>;

    /// 从 CSV 文件导入
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError>;

    /// 按扩展名自动选择解析器导入
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError>;

    /// 从上传内容导入（扩展名取自 file_name，仅允许配置的上传扩展名）
    async fn import_from_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ImportResult, ImportError>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析（Excel/CSV → RawSheet）
pub trait FileParser: Send + Sync {
    /// 解析文件
    ///
    /// # 返回
    /// - Err(FileNotFound / UnsupportedFormat / 解析错误)
    fn parse_path(&self, file_path: &Path) -> Result<RawSheet, ImportError>;

    /// 解析内存中的文件内容
    fn parse_bytes(&self, bytes: &[u8]) -> Result<RawSheet, ImportError>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格文本清洗
pub trait DataCleaner: Send + Sync {
    /// 清洗文本（去 BOM、去首尾空白）
    fn clean_text(&self, value: &str) -> String;

    /// 空值标准化（空白字符串 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;
}
