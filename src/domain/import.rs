// ==========================================
// 陶瓷库存系统 - 导入领域模型
// ==========================================
// 用途: 导入管道中间产物（表格解析 → ImportBatch → 对账事务）
// 生命周期: 仅在单次导入流程内，不落库
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单品单仓数量上限（i32 范围；任意多仓求和不会溢出 i64）
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

// ==========================================
// QuantityCell - 数量单元格原始值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuantityCell {
    Empty,
    Number(f64),
    Text(String),
}

impl QuantityCell {
    /// 数量强制转换（宽松策略：永不报错）
    ///
    /// # 规则
    /// - 数值 / 数值文本: 按浮点解析后向零截断
    /// - 空白 / 非数值 / NaN / 无穷: 0
    /// - 负数: 0（库存数量非负）
    /// - 超过 MAX_QUANTITY: 截到 MAX_QUANTITY
    pub fn coerce(&self) -> i64 {
        let value = match self {
            QuantityCell::Empty => return 0,
            QuantityCell::Number(v) => *v,
            QuantityCell::Text(raw) => match raw.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => return 0,
            },
        };

        if !value.is_finite() || value <= 0.0 {
            return 0;
        }

        value.trunc().min(MAX_QUANTITY as f64) as i64
    }

    pub fn is_blank(&self) -> bool {
        match self {
            QuantityCell::Empty => true,
            QuantityCell::Text(raw) => raw.trim().is_empty(),
            QuantityCell::Number(_) => false,
        }
    }
}

impl From<&str> for QuantityCell {
    fn from(raw: &str) -> Self {
        if raw.trim().is_empty() {
            QuantityCell::Empty
        } else {
            QuantityCell::Text(raw.to_string())
        }
    }
}

impl From<f64> for QuantityCell {
    fn from(value: f64) -> Self {
        QuantityCell::Number(value)
    }
}

impl From<i64> for QuantityCell {
    fn from(value: i64) -> Self {
        QuantityCell::Number(value as f64)
    }
}

// ==========================================
// ImportRow - 表格数据行（强类型）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub row_number: usize,        // 表格行号（含表头，从 1 开始）
    pub item: Option<String>,     // 原始商品名（Item 列）
    /// 与 ImportBatch::warehouse_names 一一对应；缺失列视为空
    pub quantities: Vec<QuantityCell>,
}

impl ImportRow {
    pub fn new(row_number: usize, item: Option<String>, quantities: Vec<QuantityCell>) -> Self {
        Self {
            row_number,
            item,
            quantities,
        }
    }

    pub fn quantity_at(&self, column: usize) -> i64 {
        self.quantities
            .get(column)
            .map(QuantityCell::coerce)
            .unwrap_or(0)
    }
}

// ==========================================
// ImportBatch - 单次导入批次（概念实体）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub warehouse_names: Vec<String>, // 仓库列（表头顺序）
    pub rows: Vec<ImportRow>,
}

impl ImportBatch {
    pub fn new(warehouse_names: Vec<String>) -> Self {
        Self {
            warehouse_names,
            rows: Vec::new(),
        }
    }

    /// 追加一行（行号按追加顺序自动生成）
    pub fn push_row<I, C>(&mut self, item: &str, quantities: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<QuantityCell>,
    {
        let row_number = self.rows.len() + 2;
        self.rows.push(ImportRow::new(
            row_number,
            Some(item.to_string()),
            quantities.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// 去重后的仓库名（保持首次出现顺序）
    pub fn distinct_warehouse_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.warehouse_names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub import_id: String,              // 本次导入 ID（日志关联）
    pub unique_items_count: usize,      // 去重后的规范商品数
    pub warehouse_names: Vec<String>,   // 被重置并重新写入的仓库
    pub rows_processed: usize,
    pub rows_skipped: usize,            // 商品名为空的行
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_quantity_cells() {
        assert_eq!(QuantityCell::Text("50".to_string()).coerce(), 50);
        assert_eq!(QuantityCell::Number(50.0).coerce(), 50);
        assert_eq!(QuantityCell::Empty.coerce(), 0);
        assert_eq!(QuantityCell::Text("abc".to_string()).coerce(), 0);
    }

    #[test]
    fn test_coerce_truncates_toward_zero() {
        assert_eq!(QuantityCell::Number(7.9).coerce(), 7);
        assert_eq!(QuantityCell::Text(" 12.99 ".to_string()).coerce(), 12);
        assert_eq!(QuantityCell::Text("1e3".to_string()).coerce(), 1000);
    }

    #[test]
    fn test_coerce_rejects_negative_and_non_finite() {
        assert_eq!(QuantityCell::Number(-4.0).coerce(), 0);
        assert_eq!(QuantityCell::Number(f64::NAN).coerce(), 0);
        assert_eq!(QuantityCell::Number(f64::INFINITY).coerce(), 0);
    }

    #[test]
    fn test_coerce_clamps_to_max_quantity() {
        assert_eq!(QuantityCell::Number(1e300).coerce(), MAX_QUANTITY);
        assert_eq!(QuantityCell::Text("1e300".to_string()).coerce(), MAX_QUANTITY);
        assert_eq!(QuantityCell::Number(MAX_QUANTITY as f64).coerce(), MAX_QUANTITY);
        assert_eq!(
            QuantityCell::Number(MAX_QUANTITY as f64 - 1.0).coerce(),
            MAX_QUANTITY - 1
        );
    }

    #[test]
    fn test_quantity_at_missing_column_is_zero() {
        let row = ImportRow::new(2, Some("TILE A".to_string()), vec![QuantityCell::Number(3.0)]);
        assert_eq!(row.quantity_at(0), 3);
        assert_eq!(row.quantity_at(5), 0);
    }

    #[test]
    fn test_distinct_warehouse_names_keeps_first_order() {
        let batch = ImportBatch::new(vec![
            "Gudang Y".to_string(),
            "Gudang X".to_string(),
            "Gudang Y".to_string(),
        ]);
        assert_eq!(batch.distinct_warehouse_names(), vec!["Gudang Y", "Gudang X"]);
    }
}
