//! Keyword taxonomy for annotation summaries.

use crate::models::Category;

/// One taxonomy rule: a category claims a summary when any keyword appears in
/// the lowercased text.
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

/// Ordered rule table; earlier rules win. Code outranks Browsing so a coding
/// summary that mentions a browser still lands in Code, and Meeting outranks
/// Video so "video call" is a call.
pub const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Code,
        keywords: &[
            "coding",
            "programming",
            "ide",
            "cursor",
            "vscode",
            "terminal",
            "git",
            "commit",
            "debug",
            "python",
            "java",
            "javascript",
        ],
    },
    CategoryRule {
        category: Category::Meeting,
        keywords: &["zoom", "meeting", "call", "teams", "slack call", "conference"],
    },
    CategoryRule {
        category: Category::Documentation,
        keywords: &["documentation", "readme", "writing", "notes", "document"],
    },
    CategoryRule {
        category: Category::Email,
        keywords: &["email", "gmail", "outlook", "inbox"],
    },
    CategoryRule {
        category: Category::Browsing,
        keywords: &["browsing", "web", "chrome", "firefox", "safari", "browser"],
    },
    CategoryRule {
        category: Category::Video,
        keywords: &["youtube", "video", "watching", "netflix"],
    },
    CategoryRule {
        category: Category::Social,
        keywords: &["twitter", "facebook", "instagram", "linkedin", "social"],
    },
    CategoryRule {
        category: Category::Learning,
        keywords: &["tutorial", "learning", "course", "study", "research"],
    },
    CategoryRule {
        category: Category::Design,
        keywords: &["figma", "design", "photoshop", "illustrator"],
    },
];

/// Map a summary to its category: first rule with a substring match wins,
/// anything unmatched is Work.
pub fn categorize(summary: &str) -> Category {
    let lowered = summary.to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return rule.category;
        }
    }
    Category::Work
}
