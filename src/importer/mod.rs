// ==========================================
// 陶瓷库存系统 - 导入层
// ==========================================
// 职责: 库存表格解析、结构校验，交由对账引擎落库
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod sheet_reader;
pub mod stock_importer_impl;
pub mod stock_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::ImportError;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use sheet_reader::SheetReader;
pub use stock_importer_impl::StockImporterImpl;

// 重导出 Trait 接口
pub use stock_importer_trait::{DataCleaner, FileParser, RawRow, RawSheet, StockImporter};
