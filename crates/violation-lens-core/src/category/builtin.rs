//! Builtin Category Definitions
//!
//! The default rule set. `reset_to_default` restores exactly these.

use serde::{Deserialize, Serialize};

/// Description used for categories that carry none and are not builtin.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown violation type";

/// Builtin violation categories
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "adult-content",
        description: "Pornographic, vulgar or sexually suggestive content",
        patterns: &[
            "涉黄",
            "涉.*?黄",
            "夜场招聘",
            "成人交友",
            "穿着暴露",
            "色情",
            "低俗",
            "不雅",
            "暴露",
            "性.*?描述",
            "招聘.*?美女",
            "交友.*?刺激",
            "私聊.*?微信",
            "porn",
            "nsfw",
            "sexually explicit",
            "adult dating",
        ],
        keywords: &[
            "色情", "黄色", "性感", "诱惑", "裸体", "暴露", "成人", "情色", "nude", "erotic",
        ],
    },
    BuiltinCategory {
        name: "political-sensitivity",
        description: "Politically sensitive content, including separatism",
        patterns: &[
            "涉政",
            "政治",
            "政府",
            "推翻.*?政权",
            "反抗",
            "政治敏感",
            "台湾独立",
            "港独",
            "六四",
            "八九",
            "法轮大法",
            "政府.*?腐败",
            "人民.*?反抗",
            "politically sensitive",
            "overthrow.*?regime",
        ],
        keywords: &[
            "政治", "政府", "官员", "党", "选举", "民主", "独立", "抗议", "separatist",
            "regime change",
        ],
    },
    BuiltinCategory {
        name: "terrorism",
        description: "Violence, terrorism or dangerous behaviour",
        patterns: &[
            "涉恐",
            "恐怖",
            "爆炸",
            "暴力",
            "危险现场",
            "袭击",
            "制造.*?装置",
            "恐怖组织",
            "暴力.*?袭击",
            "terror",
            "bomb",
            "explosive device",
        ],
        keywords: &[
            "恐怖", "暴力", "袭击", "爆炸", "武器", "杀害", "血腥", "massacre", "hostage",
        ],
    },
    BuiltinCategory {
        name: "abuse",
        description: "Personal attacks and malicious insults",
        patterns: &[
            "恶意辱骂",
            "辱骂",
            "废物",
            "垃圾",
            "全家.*?死",
            "骂人",
            "侮辱",
            "insult",
            "idiot",
        ],
        keywords: &["骂", "侮辱", "羞辱", "诽谤", "恶毒", "诅咒", "harass", "slur"],
    },
    BuiltinCategory {
        name: "fraud",
        description: "False information, scams and misleading promotion",
        patterns: &[
            "虚假诈骗",
            "诈骗",
            "中奖.*?万",
            "转账.*?手续费",
            "投资理财.*?零风险",
            "零风险.*?高回报",
            "虚假宣传",
            "误导",
            "scam",
            "win.*?prize",
            "won.*?prize",
            "advance fee",
        ],
        keywords: &[
            "诈骗", "欺骗", "虚假", "假冒", "伪造", "骗取", "fraud", "phishing", "lottery",
        ],
    },
    BuiltinCategory {
        name: "advertising",
        description: "Commercial advertising and marketing promotion",
        patterns: &[
            "广告推广",
            "限时秒杀",
            "立即抢购",
            "全网最低价",
            "马上下单",
            "限时优惠",
            "限时.*?秒杀",
            "全网.*?最低价",
            "立即.*?抢购",
            "flash sale",
            "limited time offer",
        ],
        keywords: &[
            "广告", "推广", "营销", "促销", "优惠", "折扣", "promo code", "coupon code",
        ],
    },
    BuiltinCategory {
        name: "prohibited-items",
        description: "Prohibited or controlled goods",
        patterns: &[
            "违禁",
            "白粉批发",
            "军用枪械",
            "枪支",
            "毒品",
            "违禁物品",
            "cocaine",
            "heroin",
            "firearms?",
        ],
        keywords: &["毒品", "枪支", "军火", "违禁", "管制", "narcotic", "contraband"],
    },
    BuiltinCategory {
        name: "extremism",
        description: "Extremist or inflammatory speech",
        patterns: &[
            "舆情极端",
            "社会不公",
            "民不聊生",
            "起来反抗",
            "推翻暴政",
            "极端情绪",
            "extremis[tm]",
            "violent uprising",
        ],
        keywords: &["极端", "激进", "偏激", "煽动", "仇恨", "radicalize", "hate speech"],
    },
    BuiltinCategory {
        name: "blacklist",
        description: "Blacklisted or banned terms",
        patterns: &[
            "黑名单",
            "台湾独立",
            "自由民主.*?台湾国",
            "港独运动",
            "香港不是中国",
            "blacklist",
        ],
        keywords: &["分裂", "颠覆", "反动", "邪教", "banned term"],
    },
    BuiltinCategory {
        name: "map-issues",
        description: "Incorrect maps or disputed territory",
        patterns: &[
            "地图问题",
            "边界",
            "国界",
            "领土",
            "地图.*?错误",
            "border dispute",
            "disputed territory",
            "incorrect map",
        ],
        keywords: &["地图", "边界", "领土", "主权", "sovereignty"],
    },
];

/// Static definition of a builtin category
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    pub name: &'static str,
    pub description: &'static str,
    /// Regular expressions, matched case-insensitively
    pub patterns: &'static [&'static str],
    /// Explicit keywords, on top of the ones derived from `patterns`
    pub keywords: &'static [&'static str],
}

/// Uncompiled category definition
///
/// Input to registry mutations and the unit of the rule-set file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryDef {
    pub fn new(name: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            patterns,
            keywords: Vec::new(),
            description: None,
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&BuiltinCategory> for CategoryDef {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            name: builtin.name.to_string(),
            patterns: builtin.patterns.iter().map(|s| s.to_string()).collect(),
            keywords: builtin.keywords.iter().map(|s| s.to_string()).collect(),
            description: Some(builtin.description.to_string()),
        }
    }
}

/// Look up a builtin category by name
pub fn builtin(name: &str) -> Option<&'static BuiltinCategory> {
    BUILTIN_CATEGORIES.iter().find(|b| b.name == name)
}

/// Description fallback: builtin description, else [`UNKNOWN_DESCRIPTION`]
pub fn default_description(name: &str) -> &'static str {
    builtin(name)
        .map(|b| b.description)
        .unwrap_or(UNKNOWN_DESCRIPTION)
}
