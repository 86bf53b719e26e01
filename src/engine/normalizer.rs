// ==========================================
// 陶瓷库存系统 - 商品名称规范化引擎
// ==========================================
// 红线: 纯函数、全函数（任何输入都不失败）、幂等
// ==========================================
// 规则顺序:
// 1. 去首尾空白 + 转大写
// 2. 剥离末尾等级/变体后缀（整词匹配，仅末尾）
// 3. 末尾表面处理拼写变体 → 标准拼写
// 4. 压缩连续空白
// ==========================================

use crate::config::catalog_rules::NormalizationRules;
use std::collections::HashSet;
use std::sync::OnceLock;

// ==========================================
// NameNormalizer - 名称规范化器
// ==========================================
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    strip_suffixes: HashSet<String>,
    finish_variants: HashSet<String>,
    canonical_finish: String,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(&NormalizationRules::default())
    }
}

impl NameNormalizer {
    /// 从规则构建（规则内 token 统一按大写比较）
    pub fn new(rules: &NormalizationRules) -> Self {
        Self {
            strip_suffixes: rules
                .strip_suffixes
                .iter()
                .map(|t| t.trim().to_uppercase())
                .collect(),
            finish_variants: rules
                .finish_variants
                .iter()
                .map(|t| t.trim().to_uppercase())
                .collect(),
            canonical_finish: rules.canonical_finish.trim().to_uppercase(),
        }
    }

    /// 规范化商品名称
    ///
    /// # 说明
    /// - 后缀按整词剥离，重复剥离直到末尾不再是后缀（保证幂等）
    /// - 至少保留一个词，名称不会被剥离为空
    /// - 空白输入返回空串
    pub fn normalize(&self, raw: &str) -> String {
        let upper = raw.trim().to_uppercase();
        let mut tokens: Vec<&str> = upper.split_whitespace().collect();

        while tokens.len() > 1 {
            match tokens.last() {
                Some(last) if self.strip_suffixes.contains(*last) => {
                    tokens.pop();
                }
                _ => break,
            }
        }

        let mut canonical = tokens.join(" ");
        if let Some(last) = tokens.last() {
            if self.finish_variants.contains(*last) {
                let keep = canonical.len() - last.len();
                canonical.truncate(keep);
                canonical.push_str(&self.canonical_finish);
            }
        }
        canonical
    }
}

static DEFAULT_NORMALIZER: OnceLock<NameNormalizer> = OnceLock::new();

/// 使用内置规则规范化名称
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER
        .get_or_init(NameNormalizer::default)
        .normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_grade_suffix() {
        assert_eq!(normalize("TILE A KW1"), "TILE A");
        assert_eq!(normalize("  arwana 30x30 kw1-b "), "ARWANA 30X30");
        assert_eq!(normalize("GRANIT 60X60 II"), "GRANIT 60X60");
        assert_eq!(normalize("MULIA  BIANCO   I"), "MULIA BIANCO");
    }

    #[test]
    fn test_interior_suffix_untouched() {
        assert_eq!(normalize("KW1 TILE A"), "KW1 TILE A");
        assert_eq!(normalize("TIPI"), "TIPI");
        assert_eq!(normalize("TILE TIPI"), "TILE TIPI");
    }

    #[test]
    fn test_finish_variant_rewritten() {
        assert_eq!(normalize("TILE A GR"), "TILE A GRISS");
        assert_eq!(normalize("TILE A gris"), "TILE A GRISS");
        assert_eq!(normalize("TILE A GRIS KW2"), "TILE A GRISS");
        assert_eq!(normalize("TILE A GRISS"), "TILE A GRISS");
        // 非末尾或非整词不改写
        assert_eq!(normalize("GRIS TILE"), "GRIS TILE");
        assert_eq!(normalize("TILE NEGR"), "TILE NEGR");
    }

    #[test]
    fn test_total_on_edge_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("KW1"), "KW1");
        assert_eq!(normalize("GR"), "GRISS");
        assert_eq!(normalize("TILE\tA\nKW1"), "TILE A");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "TILE A KW1",
            "TILE A KW1 II",
            "tile a gris",
            "TILE A GR KW1",
            "  ROMAN   I  II I ",
            "KW1 KW2",
            "I",
            "AM 40 GREY",
            "PINGUL GRANIT KW-1",
            "X GRIS GR",
            "",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_custom_rules() {
        let rules = NormalizationRules {
            strip_suffixes: vec!["bs".to_string()],
            finish_variants: vec!["polish".to_string()],
            canonical_finish: "POLISHED".to_string(),
        };
        let normalizer = NameNormalizer::new(&rules);
        assert_eq!(normalizer.normalize("tile polish bs"), "TILE POLISHED");
        assert_eq!(normalizer.normalize("TILE A KW1"), "TILE A KW1");
    }
}
