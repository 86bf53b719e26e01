// ==========================================
// 陶瓷库存系统 - 领域类型定义
// ==========================================
// 职责: 商品分类标签（仅用于报表分组，不落库）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 商品分类 (Category)
// ==========================================
// 序列化格式: 与历史报表一致（前四个全大写，其余首字母大写）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "PINGUL")]
    Pingul, // 磨边条
    #[serde(rename = "LIST")]
    List, // 装饰线条
    #[serde(rename = "NAT")]
    Nat, // 填缝剂/瓷砖胶
    #[serde(rename = "STEPNOSING")]
    StepNosing, // 踏步砖
    #[serde(rename = "Sanitari")]
    Sanitari, // 卫浴/五金
    #[serde(rename = "Granit")]
    Granit, // 抛釉/花岗岩砖
    #[serde(rename = "Keramik")]
    Keramik, // 釉面砖
    #[serde(rename = "Lainnya")]
    Lainnya, // 其他（兜底）
}

impl Category {
    /// 全部分类，按规则链顺序排列（兜底分类在最后）
    pub const ALL: [Category; 8] = [
        Category::Pingul,
        Category::List,
        Category::Nat,
        Category::StepNosing,
        Category::Sanitari,
        Category::Granit,
        Category::Keramik,
        Category::Lainnya,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pingul => "PINGUL",
            Category::List => "LIST",
            Category::Nat => "NAT",
            Category::StepNosing => "STEPNOSING",
            Category::Sanitari => "Sanitari",
            Category::Granit => "Granit",
            Category::Keramik => "Keramik",
            Category::Lainnya => "Lainnya",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// 大小写不敏感解析（CLI/查询参数使用）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("未知分类: {}", s))
    }
}
