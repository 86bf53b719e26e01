// ==========================================
// 陶瓷库存系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - 文件级错误（不存在/格式/读取/解析）
// - 结构校验错误（表头、仓库列）：立即返回，不做任何写入
// - 持久化错误：对账事务整体回滚
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构校验错误 =====
    #[error("表头无效: 第一列应为 '{expected}'，实际为 '{found}'")]
    MissingItemHeader { expected: String, found: String },

    #[error("未找到仓库列")]
    NoWarehouseColumns,

    #[error("工作表为空")]
    EmptySheet,

    // ===== 持久化错误 =====
    #[error("持久化失败: {0}")]
    Persistence(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为表格结构校验错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImportError::MissingItemHeader { .. }
                | ImportError::NoWarehouseColumns
                | ImportError::EmptySheet
        )
    }

    /// 是否由调用方输入引起（文件问题 + 结构校验）
    pub fn is_client_error(&self) -> bool {
        self.is_validation()
            || matches!(
                self,
                ImportError::FileNotFound(_)
                    | ImportError::UnsupportedFormat(_)
                    | ImportError::ExcelParseError(_)
                    | ImportError::CsvParseError(_)
            )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

// 实现 From<rusqlite::Error>（经由仓储层错误分类）
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Persistence(RepositoryError::from(err))
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}
