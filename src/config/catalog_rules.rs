// ==========================================
// 陶瓷库存系统 - 商品目录规则（名称规范化 + 分类）
// ==========================================
// 存储位置: 内置默认值；可被 config_kv（key='catalog_rules'）中的 JSON 整体覆盖
// 生命周期: 启动时加载一次，运行期只读
// ==========================================

use crate::domain::types::Category;
use serde::{Deserialize, Serialize};

// ==========================================
// CatalogRules - 规则总表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogRules {
    #[serde(default)]
    pub normalization: NormalizationRules,

    #[serde(default)]
    pub classification: ClassificationRules,
}

impl CatalogRules {
    /// 统一转大写（匹配在大写文本上进行）
    pub fn into_uppercase(self) -> Self {
        Self {
            normalization: self.normalization.into_uppercase(),
            classification: self.classification.into_uppercase(),
        }
    }

    /// 校验规则完整性
    ///
    /// # 返回
    /// - Err(String): 第一个发现的问题
    pub fn validate(&self) -> Result<(), String> {
        let n = &self.normalization;
        if n.canonical_finish.trim().is_empty() {
            return Err("canonical_finish 不能为空".to_string());
        }
        if let Some(bad) = n
            .strip_suffixes
            .iter()
            .chain(n.finish_variants.iter())
            .find(|t| t.trim().is_empty() || t.contains(char::is_whitespace))
        {
            return Err(format!("规范化 token 不能为空或包含空白: {:?}", bad));
        }
        if n
            .strip_suffixes
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&n.canonical_finish))
        {
            return Err("canonical_finish 不能同时是可剥离后缀".to_string());
        }

        for (idx, rule) in self.classification.rules.iter().enumerate() {
            if rule.any_of.is_empty() {
                return Err(format!("分类规则 #{} ({}) 没有匹配项", idx + 1, rule.category));
            }
            if rule.any_of.iter().any(|m| m.token().trim().is_empty()) {
                return Err(format!("分类规则 #{} ({}) 含空关键字", idx + 1, rule.category));
            }
        }
        Ok(())
    }
}

// ==========================================
// NormalizationRules - 名称规范化规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRules {
    /// 末尾等级/变体后缀（KW1、II 等），仅剥离位于名称末尾的整词
    pub strip_suffixes: Vec<String>,

    /// 表面处理描述的拼写变体（位于末尾时改写）
    pub finish_variants: Vec<String>,

    /// 表面处理描述的标准拼写
    pub canonical_finish: String,
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self {
            strip_suffixes: to_strings(&[
                "KW1-B", "KW2-B", "KW1-N", "KW1-G", "KW-1", "KW-2", "KW1", "KW2", "I", "II",
            ]),
            finish_variants: to_strings(&["GR", "GRIS"]),
            canonical_finish: "GRISS".to_string(),
        }
    }
}

impl NormalizationRules {
    fn into_uppercase(self) -> Self {
        Self {
            strip_suffixes: upper_all(self.strip_suffixes),
            finish_variants: upper_all(self.finish_variants),
            canonical_finish: self.canonical_finish.trim().to_uppercase(),
        }
    }
}

// ==========================================
// ClassificationRules - 有序分类规则链
// ==========================================
// 红线: 顺序即语义，首个命中的规则生效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRules {
    pub rules: Vec<CategoryRule>,

    /// 全部规则未命中时的分类
    #[serde(default = "default_fallback")]
    pub fallback: Category,
}

fn default_fallback() -> Category {
    Category::Lainnya
}

/// 单条分类规则：任一匹配项命中即归入该分类
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub any_of: Vec<KeywordMatcher>,
}

/// 关键字匹配方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", content = "token", rename_all = "snake_case")]
pub enum KeywordMatcher {
    /// 子串包含（默认方式）
    Contains(String),
    /// 以 “token + 空格” 开头
    StartsWithWord(String),
    /// 包含 “空格 + token + 空格”
    ContainsWord(String),
}

impl KeywordMatcher {
    pub fn token(&self) -> &str {
        match self {
            KeywordMatcher::Contains(t)
            | KeywordMatcher::StartsWithWord(t)
            | KeywordMatcher::ContainsWord(t) => t,
        }
    }

    /// 在已转大写的名称上判断是否命中
    pub fn is_match(&self, upper_name: &str) -> bool {
        match self {
            KeywordMatcher::Contains(t) => upper_name.contains(t.as_str()),
            KeywordMatcher::StartsWithWord(t) => upper_name
                .strip_prefix(t.as_str())
                .is_some_and(|rest| rest.starts_with(' ')),
            KeywordMatcher::ContainsWord(t) => upper_name.contains(&format!(" {} ", t)),
        }
    }

    fn into_uppercase(self) -> Self {
        match self {
            KeywordMatcher::Contains(t) => KeywordMatcher::Contains(t.to_uppercase()),
            KeywordMatcher::StartsWithWord(t) => KeywordMatcher::StartsWithWord(t.to_uppercase()),
            KeywordMatcher::ContainsWord(t) => KeywordMatcher::ContainsWord(t.to_uppercase()),
        }
    }
}

impl ClassificationRules {
    /// 关键字统一转大写
    pub fn into_uppercase(self) -> Self {
        Self {
            rules: self
                .rules
                .into_iter()
                .map(|rule| CategoryRule {
                    category: rule.category,
                    any_of: rule
                        .any_of
                        .into_iter()
                        .map(KeywordMatcher::into_uppercase)
                        .collect(),
                })
                .collect(),
            fallback: self.fallback,
        }
    }
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule {
                    category: Category::Pingul,
                    any_of: contains_any(PINGUL_TOKENS),
                },
                CategoryRule {
                    category: Category::List,
                    any_of: contains_any(LIST_TOKENS),
                },
                CategoryRule {
                    category: Category::Nat,
                    any_of: vec![
                        KeywordMatcher::StartsWithWord("AM".to_string()),
                        KeywordMatcher::ContainsWord("AM".to_string()),
                        KeywordMatcher::Contains("LEMKRA".to_string()),
                    ],
                },
                CategoryRule {
                    category: Category::StepNosing,
                    any_of: contains_any(STEPNOSING_TOKENS),
                },
                CategoryRule {
                    category: Category::Sanitari,
                    any_of: contains_any(SANITARI_TOKENS),
                },
                CategoryRule {
                    category: Category::Granit,
                    any_of: contains_any(GRANIT_TOKENS),
                },
                CategoryRule {
                    category: Category::Keramik,
                    any_of: contains_any(KERAMIK_TOKENS),
                },
            ],
            fallback: Category::Lainnya,
        }
    }
}

// ==========================================
// 内置关键字表
// ==========================================

const PINGUL_TOKENS: &[&str] = &["PINGUL", "PINGULAN", "GRAMETINDO"];

const LIST_TOKENS: &[&str] = &["LIST"];

const STEPNOSING_TOKENS: &[&str] = &["STEP", "STP", "STEPNOSING"];

// 卫浴五金：品牌 + 配件名
const SANITARI_TOKENS: &[&str] = &[
    "KRAN", "STOP KRAN", "AUGUSTO", "BRACHIO", "GRAVINO", "VILANOVA",
    "EXCEL", "SOBAR", "DEVEN", "HALMAR", "EINER", "CLASSIC", "FLEX",
    "ISCO", "SAVITAR", "APOLLO", "WALLSHOWER", "SHOWER", "HANDSHOWER",
    "ALPHARD", "HAWAI", "GENTONG", "COUPLING", "UNION", "SELANG", "BCP",
    "PEMBERSIH", "SARGOT", "AVOR", "SARINGAN", "HANDLE", "BOSSINI",
    "SAPHIRA", "ENGSEL", "KUNCI", "BOLZANO", "GRENDEL", "LAMPU", "RH",
    "KAPSTOCK", "TISSUE", "KORDEN", "BAUT", "KAPSTK", "FIONI", "BATHUB",
    "KAPS", "RAK", "KACA", "PISAU", "GERGAJI", "PENGUIN", "PROFIL", "PELAMPUNG",
    "WATERHEAT", "WTRHEAT", "WATER HEATER", "WATER HEAT", "PELOR", "GIGI",
    "TOILET", "COOKER", "KOMPOR", "KITCHEN", "ANGZDOOR", "PKM",
    "BELLEZA", "COSTO", "DUPON", "FIDEM", "HAND SHOW", "BATH+SHOW", "K DIND",
    "K DOUBLE", "K SHOW", "K TAMAN", "K WAST", "PLANGSET", "PLST+T", "RING H",
    "SHOW BIDET", "SHW TNG", "STOP K", "SABUN", "TS CAIR", "WAST +KAB+KC",
    "HANSA", "MOVE", "OULUSOLID", "SPC", "TASIN", "TOTO", "TRILLIUN", "TRISENSA",
    "VAPELY", "MAGNET", "SPRINGKNEE", "WASSER", "CABINET",
    "GERMANY", "IGM", "MASPION", "MERIDIAN", "OULU", "SOLID", "TUTUP", "HAK ANGIN",
];

// 抛釉/花岗岩砖品牌
const GRANIT_TOKENS: &[&str] = &[
    "ARNA 60/60", "RMN", "CERANOSA", "RUDY", "GRD", "PASADENA", "SANDIMAS",
    "ALTHEA", "HELA", "IMPERIAL", "MAXNUM", "MELIUZ", "PAVIA", "REXTON",
    "A&F", "CERA TILES", "CYAN", "GOLFGRES", "SMART TILES", "AMADEO", "COVE",
    "GRANIT88", "GROSETO", "QIAOHUI", "ZED", "GRANITO", "NIRO", "DECOGRESS",
    "INDECOR", "INDOGRES", "GRANIT", "CAVALLO", "CIMETRIC", "PEGASUS",
    "WHTHORSE", "D-EURO", "TOPFRES", "IKAD", "SUNPWR", "CAVALI", "CITIGRES",
    "ROTA", "SCAFATI", "PLATINUM", "CENTRO",
    "A&Y", "DECOGRES 60X60", "GOLGRES", "PORTINO", "SPEEDO", "TOPGRES", "TOSCANA",
    "DECOGRES 60/60", "WHTHRSE",
];

// 釉面砖品牌
const KERAMIK_TOKENS: &[&str] = &[
    "ARWANA", "UNO", "ALLEGRA", "ATENA", "BATIRUS", "CAKRA", "COLOSSAL",
    "CONCORD", "DIVA", "ENIGMA", "GRAND", "HABITAT", "HECTOR", "IKAD",
    "INDOTILE", "KIA", "LAGUNA", "LUNA", "MULIA", "MARINO", "MUSTIKA",
    "PASCAL", "PASOLA", "PICASSO", "RAMIRO", "REDHORSE", "REDLINE",
    "SANTALIA", "TERRA", "UNICERA", "VALENCIA", "ZEUS",
    "ARW", "GEMILANG", "PCSO",
];

fn to_strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn upper_all(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().map(|t| t.trim().to_uppercase()).collect()
}

fn contains_any(tokens: &[&str]) -> Vec<KeywordMatcher> {
    tokens
        .iter()
        .map(|t| KeywordMatcher::Contains(t.to_string()))
        .collect()
}
