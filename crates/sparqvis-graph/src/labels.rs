//! Node label resolution.
//!
//! Labels are chosen by a priority ladder:
//!
//! 1. The entity's own value when it is a literal
//! 2. A sibling column named after the entity field plus a conventional
//!    suffix (`sLabel`, `slabel`, `sName`, ...)
//! 3. The literal sibling column whose name scores highest against
//!    [`LABEL_KEYWORDS`], shortest value first on ties
//! 4. The extracted id

use sparqvis_core::{Row, TypedValue, extract_id};

/// Column-name suffixes that conventionally hold a label for the prefix field.
pub const LABEL_SUFFIXES: &[&str] = &[
    "Label",
    "Name",
    "Title",
    "Term",
    "Identifier",
    "Id",
    "Description",
];

/// Keywords that suggest a column holds human-readable text, with weights.
pub const LABEL_KEYWORDS: &[(&str, u32)] = &[
    ("label", 10),
    ("name", 10),
    ("title", 10),
    ("preflabel", 10),
    ("description", 6),
    ("comment", 6),
    ("summary", 6),
    ("caption", 6),
    ("definition", 6),
    ("abstract", 5),
    ("text", 5),
    ("symbol", 3),
    ("code", 3),
    ("accession", 3),
    ("identifier", 2),
    ("id", 1),
];

/// Resolve the display label for the entity bound to `field` in `row`.
pub fn resolve_label(row: &Row, field: &str, value: &TypedValue) -> String {
    if value.is_literal() {
        return value.value.clone();
    }

    if let Some(label) = suffixed_sibling(row, field) {
        return label;
    }

    if let Some(label) = best_keyword_sibling(row, field) {
        return label;
    }

    extract_id(value)
}

/// Step 2: `<field><Suffix>` or `<field><suffix>`.
fn suffixed_sibling(row: &Row, field: &str) -> Option<String> {
    for suffix in LABEL_SUFFIXES {
        for candidate in [
            format!("{field}{suffix}"),
            format!("{field}{}", lower_initial(suffix)),
        ] {
            if let Some(value) = row.get(&candidate) {
                if !value.value.trim().is_empty() {
                    return Some(value.value.clone());
                }
            }
        }
    }
    None
}

/// Step 3: highest keyword score among literal siblings.
fn best_keyword_sibling(row: &Row, field: &str) -> Option<String> {
    let mut best: Option<(u32, &str)> = None;

    // Sorted for a deterministic winner among equal score and length
    let mut columns: Vec<(&String, &TypedValue)> = row.iter().collect();
    columns.sort_by(|a, b| a.0.cmp(b.0));

    for (name, value) in columns {
        if name == field || !value.is_literal() || value.value.trim().is_empty() {
            continue;
        }
        let score = keyword_score(name);
        if score == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_score, best_value)) => {
                score > best_score
                    || (score == best_score && value.value.len() < best_value.len())
            }
        };
        if better {
            best = Some((score, value.value.as_str()));
        }
    }

    best.map(|(_, value)| value.to_string())
}

/// Highest keyword weight contained in a column name.
pub fn keyword_score(column: &str) -> u32 {
    let lower = column.to_lowercase();
    LABEL_KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, weight)| *weight)
        .max()
        .unwrap_or(0)
}

fn lower_initial(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, TypedValue)]) -> Row {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_literal_entity_is_its_own_label() {
        let value = TypedValue::literal("foo");
        let r = row(&[("o", value.clone())]);
        assert_eq!(resolve_label(&r, "o", &value), "foo");
    }

    #[test]
    fn test_suffixed_sibling() {
        let value = TypedValue::uri("http://x/A");
        let r = row(&[
            ("s", value.clone()),
            ("sLabel", TypedValue::literal("Alpha")),
            ("title", TypedValue::literal("Other")),
        ]);
        assert_eq!(resolve_label(&r, "s", &value), "Alpha");
    }

    #[test]
    fn test_lower_initial_suffix() {
        let value = TypedValue::uri("http://x/A");
        let r = row(&[("s", value.clone()), ("sname", TypedValue::literal("Alpha"))]);
        assert_eq!(resolve_label(&r, "s", &value), "Alpha");
    }

    #[test]
    fn test_suffix_priority_order() {
        let value = TypedValue::uri("http://x/A");
        let r = row(&[
            ("s", value.clone()),
            ("sId", TypedValue::literal("A-1")),
            ("sTitle", TypedValue::literal("The A")),
        ]);
        assert_eq!(resolve_label(&r, "s", &value), "The A");
    }

    #[test]
    fn test_keyword_sibling_highest_score() {
        let value = TypedValue::uri("http://x/A");
        let r = row(&[
            ("s", value.clone()),
            ("comment", TypedValue::literal("a long comment")),
            ("prefName", TypedValue::literal("Alpha")),
            ("code", TypedValue::literal("A")),
        ]);
        assert_eq!(resolve_label(&r, "s", &value), "Alpha");
    }

    #[test]
    fn test_keyword_tie_prefers_shortest() {
        let value = TypedValue::uri("http://x/A");
        let r = row(&[
            ("s", value.clone()),
            ("name", TypedValue::literal("Alphabetical")),
            ("title", TypedValue::literal("Alpha")),
        ]);
        assert_eq!(resolve_label(&r, "s", &value), "Alpha");
    }

    #[test]
    fn test_keyword_sibling_ignores_uris() {
        let value = TypedValue::uri("http://x/A");
        let r = row(&[
            ("s", value.clone()),
            ("name", TypedValue::uri("http://x/name")),
        ]);
        assert_eq!(resolve_label(&r, "s", &value), "A");
    }

    #[test]
    fn test_falls_back_to_id() {
        let value = TypedValue::uri("http://x/ns#Beta");
        let r = row(&[("s", value.clone()), ("p", TypedValue::literal("42"))]);
        assert_eq!(resolve_label(&r, "s", &value), "Beta");
    }

    #[test]
    fn test_keyword_score() {
        assert_eq!(keyword_score("itemLabel"), 10);
        assert_eq!(keyword_score("description"), 6);
        assert_eq!(keyword_score("geneSymbol"), 3);
        assert_eq!(keyword_score("value"), 0);
    }
}
