// ==========================================
// 陶瓷库存系统 - 库存领域模型
// ==========================================
// 对齐: product / warehouse / stock_entry 表
// ==========================================

use crate::domain::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Product - 商品（按规范名唯一）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub canonical_name: String, // 规范名（normalize 输出，唯一键）
}

// ==========================================
// Warehouse - 仓库（按名称唯一）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
}

// ==========================================
// StockEntry - 单品单仓库存
// ==========================================
// 复合主键 (product_id, warehouse_id)；缺失记录等价于数量 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i64,
}

// ==========================================
// StockSummary - 库存快照（读模型，不落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub id: i64,
    pub canonical_name: String,
    pub category: Category,   // 读取时计算，不存储
    pub total_quantity: i64,  // 所有仓库数量之和
    /// 仓库名 → 数量；覆盖系统内全部仓库，无记录的仓库为 0
    pub per_warehouse: BTreeMap<String, i64>,
}

/// 库存快照过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuery {
    /// 名称关键字（大小写不敏感子串匹配）
    pub search: Option<String>,
    pub category: Option<Category>,
}

impl StockQuery {
    pub fn matches(&self, summary: &StockSummary) -> bool {
        if let Some(category) = self.category {
            if summary.category != category {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(keyword) if !keyword.is_empty() => summary
                .canonical_name
                .to_uppercase()
                .contains(&keyword.to_uppercase()),
            _ => true,
        }
    }
}
