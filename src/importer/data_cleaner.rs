// ==========================================
// 陶瓷库存系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / BOM 去除 / NULL 标准化 / 单元格类型映射
// ==========================================

use crate::domain::import::QuantityCell;
use crate::importer::stock_importer_trait::DataCleaner as DataCleanerTrait;
use calamine::Data;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim_start_matches('\u{feff}').trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let cleaned = self.clean_text(&v);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
    }
}

impl DataCleaner {
    /// Excel 单元格 → QuantityCell
    ///
    /// # 映射
    /// - Int / Float → Number
    /// - String → Text（空白 → Empty）
    /// - Bool → Number(1 / 0)
    /// - 日期、时长、错误值 → Empty
    pub fn to_quantity_cell(&self, cell: &Data) -> QuantityCell {
        match cell {
            Data::Int(v) => QuantityCell::Number(*v as f64),
            Data::Float(v) => QuantityCell::Number(*v),
            Data::String(s) => QuantityCell::from(s.as_str()),
            Data::Bool(b) => QuantityCell::Number(if *b { 1.0 } else { 0.0 }),
            Data::Empty => QuantityCell::Empty,
            other => {
                tracing::debug!(cell = ?other, "不支持的单元格类型，按空值处理");
                QuantityCell::Empty
            }
        }
    }

    /// CSV 文本单元格 → QuantityCell
    pub fn text_to_quantity_cell(&self, value: &str) -> QuantityCell {
        QuantityCell::from(self.clean_text(value).as_str())
    }

    /// 商品列单元格 → 商品名（整数值不带小数点）
    pub fn cell_to_item(&self, cell: Option<&QuantityCell>) -> Option<String> {
        match cell? {
            QuantityCell::Empty => None,
            QuantityCell::Text(s) => self.normalize_null(Some(s.clone())),
            QuantityCell::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                Some(format!("{}", *n as i64))
            }
            QuantityCell::Number(n) => Some(n.to_string()),
        }
    }
}
