// ==========================================
// 陶瓷库存系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls，第一个工作表) / CSV (.csv)
// 约束: 表头必须位于 A1；否则生成空表头，由结构校验报告
// ==========================================

use crate::domain::import::QuantityCell;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportError;
use crate::importer::stock_importer_trait::{
    DataCleaner as DataCleanerTrait, FileParser, RawRow, RawSheet,
};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// 小写扩展名（无扩展名返回空串）
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> Result<(), ImportError> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    fn parse_reader<R: Read>(&self, source: R) -> Result<RawSheet, ImportError> {
        let cleaner = DataCleaner;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(source);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| cleaner.clean_text(h))
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            rows.push(RawRow {
                row_number: idx + 2,
                cells: record
                    .iter()
                    .map(|value| cleaner.text_to_quantity_cell(value))
                    .collect(),
            });
        }

        Ok(RawSheet { headers, rows })
    }
}

impl FileParser for CsvParser {
    fn parse_path(&self, file_path: &Path) -> Result<RawSheet, ImportError> {
        ensure_exists(file_path)?;

        let ext = file_extension(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        self.parse_reader(File::open(file_path)?)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> Result<RawSheet, ImportError> {
        self.parse_reader(bytes)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn sheet_from_range(&self, range: &Range<Data>) -> Result<RawSheet, ImportError> {
        let cleaner = DataCleaner;
        let (start_row, start_col) = range.start().ok_or(ImportError::EmptySheet)?;
        let pad = start_col as usize;

        let to_cells = |cells: &[Data]| -> Vec<QuantityCell> {
            std::iter::repeat(QuantityCell::Empty)
                .take(pad)
                .chain(cells.iter().map(|cell| cleaner.to_quantity_cell(cell)))
                .collect()
        };

        let mut range_rows = range.rows();
        let (headers, first_data_row) = if start_row == 0 {
            let header_row = range_rows.next().ok_or(ImportError::EmptySheet)?;
            let headers = std::iter::repeat(String::new())
                .take(pad)
                .chain(header_row.iter().map(|cell| cleaner.clean_text(&cell.to_string())))
                .collect();
            (headers, 2)
        } else {
            // 第 1 行为空：表头不在 A1
            (vec![String::new(); pad + range.width()], start_row as usize + 1)
        };

        let rows = range_rows
            .enumerate()
            .map(|(idx, cells)| RawRow {
                row_number: first_data_row + idx,
                cells: to_cells(cells),
            })
            .collect();

        Ok(RawSheet { headers, rows })
    }

    fn first_sheet<RS: Read + Seek>(
        &self,
        workbook: &mut Sheets<RS>,
    ) -> Result<RawSheet, ImportError> {
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        self.sheet_from_range(&range)
    }
}

impl FileParser for ExcelParser {
    fn parse_path(&self, file_path: &Path) -> Result<RawSheet, ImportError> {
        ensure_exists(file_path)?;

        let ext = file_extension(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        self.first_sheet(&mut workbook)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> Result<RawSheet, ImportError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        self.first_sheet(&mut workbook)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn parser_for(&self, ext: &str) -> Result<Box<dyn FileParser>, ImportError> {
        match ext {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xls" => Ok(Box::new(ExcelParser)),
            _ => Err(ImportError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> Result<RawSheet, ImportError> {
        let path = file_path.as_ref();
        self.parser_for(&file_extension(path))?.parse_path(path)
    }

    /// 解析上传内容（扩展名取自文件名）
    pub fn parse_named_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<RawSheet, ImportError> {
        self.parser_for(&file_extension(Path::new(file_name)))?
            .parse_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = csv_file(&["Item,Gudang X,Gudang Y", "TILE A,10,", "TILE B,2.5,abc"]);

        let sheet = CsvParser.parse_path(temp_file.path()).unwrap();

        assert_eq!(sheet.headers, vec!["Item", "Gudang X", "Gudang Y"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_number, 2);
        assert_eq!(sheet.rows[0].cells[1], QuantityCell::Text("10".to_string()));
        assert_eq!(sheet.rows[0].cells[2], QuantityCell::Empty);
    }

    #[test]
    fn test_csv_parser_bom_and_ragged_rows() {
        let sheet = CsvParser
            .parse_bytes("\u{feff}Item,W1,W2\nTILE A,1\n".as_bytes())
            .unwrap();
        assert_eq!(sheet.headers[0], "Item");
        assert_eq!(sheet.rows[0].cells.len(), 2);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_path(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let parser = UniversalFileParser;
        assert!(matches!(
            parser.parse_named_bytes("stok.txt", b"Item"),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
        let sheet = parser
            .parse_named_bytes("STOK.CSV", b"Item,W1\nTILE A,3\n")
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_excel_parser_rejects_garbage_bytes() {
        let result = ExcelParser.parse_bytes(b"not a workbook");
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_sheet_from_range_header_offset() {
        // 数据从 B2 开始：表头行视为空
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Item".to_string()));
        range.set_value((1, 2), Data::String("W1".to_string()));
        range.set_value((2, 1), Data::String("TILE A".to_string()));
        range.set_value((2, 2), Data::Int(4));

        let sheet = ExcelParser.sheet_from_range(&range).unwrap();
        assert!(sheet.headers.iter().all(|h| h.is_empty()));
        assert_eq!(sheet.headers.len(), 3);
        assert_eq!(sheet.rows[0].row_number, 2);
        assert_eq!(sheet.rows[0].cells[0], QuantityCell::Empty);
    }

    #[test]
    fn test_sheet_from_range_at_a1() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Item".to_string()));
        range.set_value((0, 1), Data::String("W1".to_string()));
        range.set_value((1, 0), Data::String("TILE A".to_string()));
        range.set_value((1, 1), Data::Float(4.0));

        let sheet = ExcelParser.sheet_from_range(&range).unwrap();
        assert_eq!(sheet.headers, vec!["Item", "W1"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].cells[1], QuantityCell::Number(4.0));
    }
}
