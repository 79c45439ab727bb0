//! Filename-based classification.
//!
//! Both helpers walk a fixed, ordered keyword table and match lowercase
//! substrings of the filename. They are pure and deterministic.

/// Categories offered by the edit form.
pub const KNOWN_CATEGORIES: [&str; 6] = ["Transition", "Impact", "Ambience", "UI", "Foley", "Voice"];

/// Label used when a sound has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

struct Rule {
    keywords: &'static [&'static str],
    category: Option<&'static str>,
    tag: &'static str,
}

// Order matters: the first matching rule decides the category.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["whoosh", "transition", "swoosh"],
        category: Some("Transition"),
        tag: "transition",
    },
    Rule {
        keywords: &["hit", "impact", "boom"],
        category: Some("Impact"),
        tag: "impact",
    },
    Rule {
        keywords: &["ambient", "atmosphere", "bg"],
        category: Some("Ambience"),
        tag: "ambience",
    },
    Rule {
        keywords: &["click", "ui", "button"],
        category: Some("UI"),
        tag: "ui",
    },
    Rule {
        keywords: &["foley", "step"],
        category: Some("Foley"),
        tag: "foley",
    },
    Rule {
        keywords: &["voice", "vocal", "dialog"],
        category: None,
        tag: "voice",
    },
    Rule {
        keywords: &["riser", "rise", "build"],
        category: None,
        tag: "riser",
    },
];

fn matches(rule: &Rule, name_lower: &str) -> bool {
    rule.keywords.iter().any(|k| name_lower.contains(k))
}

/// Suggest a category for `file_name`, or `None` when no rule applies.
pub fn suggest_category(file_name: &str) -> Option<&'static str> {
    let name = file_name.to_lowercase();
    RULES
        .iter()
        .filter(|r| r.category.is_some())
        .find(|r| matches(r, &name))
        .and_then(|r| r.category)
}

/// Suggest tags for `file_name`: one per matching rule, in table order.
pub fn suggest_tags(file_name: &str) -> Vec<String> {
    let name = file_name.to_lowercase();
    RULES
        .iter()
        .filter(|r| matches(r, &name))
        .map(|r| r.tag.to_string())
        .collect()
}

/// Default display title: the filename without its last extension.
pub fn display_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            file_name[..dot].to_string()
        }
        _ => file_name.to_string(),
    }
}

/// Format seconds as `m:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
