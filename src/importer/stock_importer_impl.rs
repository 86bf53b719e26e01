// ==========================================
// 陶瓷库存系统 - 库存导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 结构校验（ImportBatch）→ 全量对账
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::ImportResult;
use crate::engine::reconciliation::ReconciliationEngine;
use crate::importer::error::ImportError;
use crate::importer::file_parser::{file_extension, CsvParser, ExcelParser, UniversalFileParser};
use crate::importer::sheet_reader::SheetReader;
use crate::importer::stock_importer_trait::{FileParser, RawSheet, StockImporter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// StockImporterImpl - 库存导入器实现
// ==========================================
pub struct StockImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 配置读取器
    config: C,

    // 对账引擎
    reconciliation: Arc<ReconciliationEngine>,
}

impl<C> StockImporterImpl<C>
where
    C: ImportConfigReader,
{
    pub fn new(config: C, reconciliation: Arc<ReconciliationEngine>) -> Self {
        Self {
            config,
            reconciliation,
        }
    }

    /// 结构校验 + 对账（各入口共用）
    async fn reconcile_sheet(
        &self,
        sheet: RawSheet,
        source: &str,
    ) -> Result<ImportResult, ImportError> {
        let settings = self
            .config
            .get_import_settings()
            .await
            .map_err(|e| ImportError::InternalError(format!("导入配置读取失败: {}", e)))?;

        let batch = SheetReader::to_import_batch(sheet, &settings).map_err(|e| {
            warn!(source = %source, error = %e, "表格结构校验失败");
            e
        })?;

        let result = self.reconciliation.reconcile(&batch)?;
        info!(
            source = %source,
            import_id = %result.import_id,
            unique_items_count = result.unique_items_count,
            "导入完成"
        );
        Ok(result)
    }
}

#[async_trait::async_trait]
impl<C> StockImporter for StockImporterImpl<C>
where
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path))]
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入 Excel 库存表");
        let sheet = ExcelParser.parse_path(path)?;
        self.reconcile_sheet(sheet, &path.display().to_string()).await
    }

    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入 CSV 库存表");
        let sheet = CsvParser.parse_path(path)?;
        self.reconcile_sheet(sheet, &path.display().to_string()).await
    }

    #[instrument(skip(self, file_path))]
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> Result<ImportResult, ImportError> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入库存表");
        let sheet = UniversalFileParser.parse(path)?;
        self.reconcile_sheet(sheet, &path.display().to_string()).await
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_from_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ImportResult, ImportError> {
        let settings = self
            .config
            .get_import_settings()
            .await
            .map_err(|e| ImportError::InternalError(format!("导入配置读取失败: {}", e)))?;

        let ext = file_extension(Path::new(file_name));
        if !settings.accepts_upload_extension(&ext) {
            warn!(file_name = %file_name, "上传文件类型不允许");
            return Err(ImportError::UnsupportedFormat(ext));
        }

        info!(file_name = %file_name, "开始导入上传的库存表");
        let sheet = UniversalFileParser.parse_named_bytes(file_name, bytes)?;
        self.reconcile_sheet(sheet, file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::db::{init_schema, open_sqlite_connection};
    use crate::engine::normalizer::NameNormalizer;
    use crate::repository::stock_repo::StockRepository;
    use std::sync::Mutex;

    fn setup() -> StockImporterImpl<ConfigManager> {
        let conn = open_sqlite_connection(":memory:").unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let stock_repo = Arc::new(StockRepository::from_connection(conn.clone()));
        let engine = ReconciliationEngine::new(stock_repo, Arc::new(NameNormalizer::default()));
        StockImporterImpl::new(
            ConfigManager::from_connection(conn).unwrap(),
            Arc::new(engine),
        )
    }

    #[tokio::test]
    async fn test_import_from_bytes_rejects_csv_upload() {
        let importer = setup();
        let err = importer
            .import_from_bytes("stok.csv", b"Item,W1\nTILE A,1\n")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "csv"));
    }

    #[tokio::test]
    async fn test_import_from_bytes_accepts_uppercase_excel_name() {
        let importer = setup();
        let err = importer
            .import_from_bytes("STOK.XLSX", b"bukan excel")
            .await
            .unwrap_err();
        // 扩展名通过检查，失败发生在解析阶段
        assert!(!matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_import_from_csv_file() {
        use std::io::Write;
        let importer = setup();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Item,Gudang X,Unnamed: 2").unwrap();
        writeln!(file, "TILE A KW1,10,x").unwrap();
        writeln!(file, "TILE A,5,y").unwrap();
        writeln!(file, "TILE B,abc,").unwrap();

        let result = importer.import_from_csv(file.path()).await.unwrap();
        assert_eq!(result.unique_items_count, 2);
        assert_eq!(result.warehouse_names, vec!["Gudang X"]);
    }

    #[tokio::test]
    async fn test_structural_error_surfaces() {
        let importer = setup();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"Name,W1\nTILE A,1\n").unwrap();

        let err = importer.import_from_file(file.path()).await.unwrap_err();
        assert!(err.is_validation());
    }
}
