//! Segmentation vocabulary
//!
//! Built per registry snapshot, never shared between registries.

use std::collections::BTreeSet;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use log::warn;

use crate::category::Category;

/// Seed terms present in every vocabulary
pub const BUILTIN_TERMS: &[&str] = &[
    "涉黄", "涉政", "涉恐", "恶意辱骂", "虚假诈骗", "广告推广", "违禁词", "舆情极端",
    "黑名单词", "地图问题", "夜场招聘", "成人交友", "政治敏感", "台湾独立", "港独", "六四",
    "八九", "法轮大法", "暴力", "危险现场", "恐怖组织", "制造装置", "爆炸", "辱骂", "诈骗",
    "中奖", "转账", "投资理财", "零风险", "限时秒杀", "立即抢购", "全网最低价", "白粉批发",
    "军用枪械", "枪支", "毒品", "违禁物品", "社会不公", "民不聊生", "推翻暴政", "极端情绪",
];

#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: BTreeSet<String>,
    automaton: Option<AhoCorasick>,
}

impl Vocabulary {
    /// Seed terms, every category name, and every category keyword.
    pub fn build<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        let mut terms: BTreeSet<String> = BUILTIN_TERMS.iter().map(|t| t.to_string()).collect();
        for category in categories {
            terms.extend(category_terms(category));
        }
        Self::from_terms(terms)
    }

    /// Copy of this vocabulary with one more category's terms
    pub fn extended_with(&self, category: &Category) -> Self {
        let mut terms = self.terms.clone();
        terms.extend(category_terms(category));
        Self::from_terms(terms)
    }

    fn from_terms(terms: BTreeSet<String>) -> Self {
        let automaton = if terms.is_empty() {
            None
        } else {
            match AhoCorasickBuilder::new()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&terms)
            {
                Ok(automaton) => Some(automaton),
                Err(e) => {
                    warn!("Failed to build vocabulary automaton: {}", e);
                    None
                }
            }
        };

        Self { terms, automaton }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|s| s.as_str())
    }

    /// Leftmost-longest matcher over all terms (lowercase)
    pub fn automaton(&self) -> Option<&AhoCorasick> {
        self.automaton.as_ref()
    }
}

// The category name is kept whole regardless of length.
fn category_terms(category: &Category) -> impl Iterator<Item = String> + '_ {
    std::iter::once(category.name().to_lowercase()).chain(category.keywords().iter().cloned())
}
