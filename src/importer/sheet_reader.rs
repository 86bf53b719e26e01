// ==========================================
// 陶瓷库存系统 - 表格结构校验与批次构建
// ==========================================
// 输入: RawSheet（任意表头）
// 输出: ImportBatch（仓库列 + 强类型数据行）
// 规则:
// - 第一列表头必须为商品列（大小写不敏感，去空白）
// - 其后非空且不以占位前缀开头的列为仓库列
// - 商品名与全部仓库单元格均为空的行丢弃
// ==========================================

use crate::config::import_config_trait::ImportSettings;
use crate::domain::import::{ImportBatch, ImportRow, QuantityCell};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportError;
use crate::importer::stock_importer_trait::{DataCleaner as DataCleanerTrait, RawSheet};

pub struct SheetReader;

impl SheetReader {
    /// RawSheet → ImportBatch
    ///
    /// # 返回
    /// - Err(EmptySheet): 无表头
    /// - Err(MissingItemHeader): 第一列不是商品列
    /// - Err(NoWarehouseColumns): 没有可用的仓库列
    pub fn to_import_batch(
        sheet: RawSheet,
        settings: &ImportSettings,
    ) -> Result<ImportBatch, ImportError> {
        let cleaner = DataCleaner;

        let first = sheet.headers.first().ok_or(ImportError::EmptySheet)?;
        if !settings.is_item_header(first) {
            return Err(ImportError::MissingItemHeader {
                expected: settings.item_header.clone(),
                found: cleaner.clean_text(first),
            });
        }

        let warehouse_columns: Vec<(usize, String)> = sheet
            .headers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, header)| !settings.is_placeholder_header(header))
            .map(|(idx, header)| (idx, cleaner.clean_text(header)))
            .collect();

        if warehouse_columns.is_empty() {
            return Err(ImportError::NoWarehouseColumns);
        }

        let mut batch = ImportBatch::new(
            warehouse_columns
                .iter()
                .map(|(_, name)| name.clone())
                .collect(),
        );

        let mut dropped = 0usize;
        for raw in sheet.rows {
            let item = cleaner.cell_to_item(raw.cells.first());
            let quantities: Vec<QuantityCell> = warehouse_columns
                .iter()
                .map(|(idx, _)| raw.cells.get(*idx).cloned().unwrap_or(QuantityCell::Empty))
                .collect();

            if item.is_none() && quantities.iter().all(QuantityCell::is_blank) {
                dropped += 1;
                continue;
            }

            batch
                .rows
                .push(ImportRow::new(raw.row_number, item, quantities));
        }

        tracing::debug!(
            warehouses = batch.warehouse_names.len(),
            rows = batch.rows.len(),
            dropped,
            "表格结构校验通过"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::stock_importer_trait::RawRow;

    fn sheet(headers: &[&str], rows: Vec<Vec<QuantityCell>>) -> RawSheet {
        RawSheet {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(idx, cells)| RawRow {
                    row_number: idx + 2,
                    cells,
                })
                .collect(),
        }
    }

    #[test]
    fn test_builds_batch_and_skips_placeholders() {
        let raw = sheet(
            &["ITEM", "Gudang X", "Unnamed: 2", "", " Gudang Y "],
            vec![
                vec![
                    QuantityCell::from("TILE A"),
                    QuantityCell::from(10i64),
                    QuantityCell::from("junk"),
                    QuantityCell::Empty,
                    QuantityCell::from("3"),
                ],
                vec![QuantityCell::Empty, QuantityCell::Empty],
                vec![QuantityCell::Empty, QuantityCell::from(4i64)],
            ],
        );

        let batch = SheetReader::to_import_batch(raw, &ImportSettings::default()).unwrap();
        assert_eq!(batch.warehouse_names, vec!["Gudang X", "Gudang Y"]);
        // 全空行被丢弃；商品名为空但有数量的行保留给对账统计
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].item.as_deref(), Some("TILE A"));
        assert_eq!(batch.rows[0].quantity_at(0), 10);
        assert_eq!(batch.rows[0].quantity_at(1), 3);
        assert_eq!(batch.rows[1].row_number, 4);
        assert_eq!(batch.rows[1].item, None);
    }

    #[test]
    fn test_missing_item_header() {
        let raw = sheet(&["Nama", "Gudang X"], vec![]);
        let err = SheetReader::to_import_batch(raw, &ImportSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingItemHeader { ref found, .. } if found == "Nama"
        ));
    }

    #[test]
    fn test_no_warehouse_columns() {
        let raw = sheet(&["Item", "Unnamed: 1"], vec![]);
        let err = SheetReader::to_import_batch(raw, &ImportSettings::default()).unwrap_err();
        assert!(matches!(err, ImportError::NoWarehouseColumns));

        let err = SheetReader::to_import_batch(RawSheet::default(), &ImportSettings::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::EmptySheet));
    }
}
