// ==========================================
// 陶瓷库存系统 - API层错误类型
// ==========================================
// 职责: 将仓储/导入错误转换为面向用户的错误消息，
//       并给出客户端/服务端错误分类（由传输层映射为状态码）
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 错误分类（传输层据此选择状态码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    Client,
    Server,
}

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 客户端错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    /// 上传文件类型不允许
    #[error("{0}")]
    UnsupportedFileType(String),

    /// 表格结构校验失败
    #[error("{0}")]
    ValidationError(String),

    /// 文件无法读取或解析
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 服务端错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::NotFound(_)
            | ApiError::BusinessRuleViolation(_)
            | ApiError::UnsupportedFileType(_)
            | ApiError::ValidationError(_)
            | ApiError::ImportError(_) => ErrorClass::Client,
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::DatabaseTransactionError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => ErrorClass::Server,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.class() == ErrorClass::Client
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ApiError::NotFound(t_with_args(
                "common.not_found",
                &[("entity", entity.as_str()), ("id", id.as_str())],
            )),
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => {
                ApiError::NotFound(t_with_args("import.file_not_found", &[("path", path.as_str())]))
            }
            ImportError::UnsupportedFormat(_) => {
                ApiError::UnsupportedFileType(t("import.invalid_file_type"))
            }
            ImportError::FileReadError(msg)
            | ImportError::ExcelParseError(msg)
            | ImportError::CsvParseError(msg) => {
                ApiError::ImportError(t_with_args("import.failed", &[("detail", msg.as_str())]))
            }
            ImportError::MissingItemHeader { .. } => {
                ApiError::ValidationError(t("import.missing_item_header"))
            }
            ImportError::NoWarehouseColumns => {
                ApiError::ValidationError(t("import.no_warehouse_columns"))
            }
            ImportError::EmptySheet => ApiError::ValidationError(t("import.empty_sheet")),
            // 对账事务内的任何写入失败均已回滚，归为服务端错误
            ImportError::Persistence(repo_err) => match repo_err {
                RepositoryError::UniqueConstraintViolation(msg)
                | RepositoryError::ForeignKeyViolation(msg)
                | RepositoryError::ValidationError(msg) => {
                    ApiError::DatabaseTransactionError(format!("导入写入失败，已回滚: {}", msg))
                }
                RepositoryError::NotFound { entity, id } => ApiError::DatabaseTransactionError(
                    format!("导入写入失败，已回滚: {} {}", entity, id),
                ),
                other => ApiError::from(other),
            },
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::set_locale;
    use crate::i18n::tests::LOCALE_TEST_LOCK;

    #[test]
    fn test_error_classes() {
        assert_eq!(
            ApiError::from(ImportError::NoWarehouseColumns).class(),
            ErrorClass::Client
        );
        assert_eq!(
            ApiError::from(ImportError::UnsupportedFormat("pdf".into())).class(),
            ErrorClass::Client
        );
        assert_eq!(
            ApiError::from(ImportError::Persistence(RepositoryError::DatabaseTransactionError(
                "disk I/O error".into()
            )))
            .class(),
            ErrorClass::Server
        );
        assert_eq!(
            ApiError::from(ImportError::Persistence(
                RepositoryError::UniqueConstraintViolation("product.canonical_name".into())
            ))
            .class(),
            ErrorClass::Server
        );
        assert_eq!(
            ApiError::from(ImportError::Persistence(RepositoryError::ForeignKeyViolation(
                "stock_entry".into()
            )))
            .class(),
            ErrorClass::Server
        );
        // 手工操作中的唯一约束冲突仍是客户端错误
        assert_eq!(
            ApiError::from(RepositoryError::UniqueConstraintViolation("x".into())).class(),
            ErrorClass::Client
        );
        assert_eq!(
            ApiError::from(RepositoryError::NotFound {
                entity: "Product".into(),
                id: "7".into()
            })
            .class(),
            ErrorClass::Client
        );
        assert!(ApiError::InternalError("x".into()).class() == ErrorClass::Server);
    }

    #[test]
    fn test_messages_are_localized() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let err = ApiError::from(ImportError::MissingItemHeader {
            expected: "Item".into(),
            found: "Nama".into(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid Excel format. The first column must be titled 'Item'."
        );

        let err = ApiError::from(ImportError::UnsupportedFormat("csv".into()));
        assert!(err.to_string().contains(".xlsx"));
        set_locale(crate::i18n::DEFAULT_LOCALE);
    }
}
