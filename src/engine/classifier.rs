// ==========================================
// 陶瓷库存系统 - 商品分类引擎
// ==========================================
// 红线: 有序规则链，首个命中即返回；顺序即语义
// 红线: 规则在构建后只读，分类为纯函数
// ==========================================

use crate::config::catalog_rules::{CategoryRule, ClassificationRules};
use crate::domain::types::Category;
use std::sync::OnceLock;

// ==========================================
// CategoryClassifier - 分类器
// ==========================================
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
    fallback: Category,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(&ClassificationRules::default())
    }
}

impl CategoryClassifier {
    pub fn new(rules: &ClassificationRules) -> Self {
        let upper = rules.clone().into_uppercase();
        Self {
            rules: upper.rules,
            fallback: upper.fallback,
        }
    }

    /// 分类商品名称（大小写不敏感，无需预先规范化）
    pub fn classify(&self, name: &str) -> Category {
        let upper = name.trim().to_uppercase();
        self.rules
            .iter()
            .find(|rule| rule.any_of.iter().any(|m| m.is_match(&upper)))
            .map(|rule| rule.category)
            .unwrap_or(self.fallback)
    }
}

static DEFAULT_CLASSIFIER: OnceLock<CategoryClassifier> = OnceLock::new();

/// 使用内置规则分类
pub fn classify(name: &str) -> Category {
    DEFAULT_CLASSIFIER
        .get_or_init(CategoryClassifier::default)
        .classify(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::catalog_rules::KeywordMatcher;

    #[test]
    fn test_each_category() {
        assert_eq!(classify("PINGULAN 10X60"), Category::Pingul);
        assert_eq!(classify("list keramik hitam"), Category::List);
        assert_eq!(classify("AM 40 GREY"), Category::Nat);
        assert_eq!(classify("NAT AM 1KG"), Category::Nat);
        assert_eq!(classify("LEMKRA 200"), Category::Nat);
        assert_eq!(classify("STEP 30X30"), Category::StepNosing);
        assert_eq!(classify("TOTO CW421"), Category::Sanitari);
        assert_eq!(classify("WATER HEATER 10L"), Category::Sanitari);
        assert_eq!(classify("NIRO 60X60 WHITE"), Category::Granit);
        assert_eq!(classify("ARWANA 40X40"), Category::Keramik);
        assert_eq!(classify("XYZ 20X20"), Category::Lainnya);
        assert_eq!(classify(""), Category::Lainnya);
    }

    #[test]
    fn test_precedence_first_match_wins() {
        // PINGUL 先于 Granit
        assert_eq!(classify("PINGUL GRANIT 60X60"), Category::Pingul);
        // LIST 先于 Keramik
        assert_eq!(classify("LIST ARWANA"), Category::List);
        // IKAD 同时出现在 Granit 与 Keramik 词表，Granit 在前
        assert_eq!(classify("IKAD 40X40"), Category::Granit);
    }

    #[test]
    fn test_nat_word_boundary_only() {
        // AMADEO 以 AM 开头但不是独立词，落入 Granit
        assert_eq!(classify("AMADEO 60X60"), Category::Granit);
        assert_eq!(classify("GAMMA"), Category::Lainnya);
    }

    #[test]
    fn test_deterministic_and_total() {
        let names = ["TILE A", "PINGUL", "AM X", "ZEUS", "??", "  shower  "];
        for name in names {
            let first = classify(name);
            assert_eq!(classify(name), first);
            assert!(Category::ALL.contains(&first));
        }
    }

    #[test]
    fn test_vocabulary_order_does_not_change_tags() {
        let mut reversed = ClassificationRules::default();
        for rule in &mut reversed.rules {
            rule.any_of.reverse();
        }
        let forward = CategoryClassifier::default();
        let backward = CategoryClassifier::new(&reversed);

        let names = [
            "PINGUL GRANIT 60X60",
            "LIST ARWANA",
            "IKAD 40X40",
            "AMADEO 60X60",
            "NAT AM 1KG",
            "STEP NOSING 30X30",
            "TOTO CW421",
            "NIRO 60X60 WHITE",
            "ARWANA 40X40",
            "KLOSET DUDUK TOTO",
            "XYZ 20X20",
            "",
        ];
        for name in names {
            assert_eq!(backward.classify(name), forward.classify(name), "{}", name);
        }
    }

    #[test]
    fn test_custom_rules_lowercase_tokens() {
        let rules = ClassificationRules {
            rules: vec![CategoryRule {
                category: Category::Keramik,
                any_of: vec![KeywordMatcher::Contains("ubin".to_string())],
            }],
            fallback: Category::Lainnya,
        };
        let classifier = CategoryClassifier::new(&rules);
        assert_eq!(classifier.classify("Ubin Lantai"), Category::Keramik);
        assert_eq!(classifier.classify("PINGUL"), Category::Lainnya);
    }
}
