//! Pattern catalog — syntax-aware search/replace rules per file family.
//!
//! For every tracked rename, three fixed operation groups are derived
//! (markup, script, style). Each group pairs a file glob with a list of
//! regex rules. Derivation is deterministic: identical input always
//! produces byte-identical groups in the same order.
//!
//! The `regex` crate has no lookaround, so every generated expression
//! sticks to plain classes, literals, and a single capture group.

use serde::{Deserialize, Serialize};

use crate::core::tracker::RenameRecord;

/// A single search/replace rule. `from` is regex source text, `to` is a
/// replacement template (capture references expanded, `$$` is a literal `$`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub from: String,
    pub to: String,
}

/// A (file-glob, rule-list) pair targeting one syntax family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationGroup {
    pub files: String,
    pub patterns: Vec<Rule>,
}

/// The full pattern configuration, as persisted to the transient artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub operations: Vec<OperationGroup>,
}

pub const MARKUP_GLOB: &str = "**/*.html";
pub const SCRIPT_GLOB: &str = "**/*.js";
pub const STYLE_GLOB: &str = "**/*.css";

/// Regex metacharacters escaped before an identifier is embedded in a
/// search expression.
const META: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Escape regex metacharacters in an identifier for literal matching.
pub fn escape_identifier(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if META.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape `$` in replacement text so the identifier is inserted literally
/// even though templates support `$1`-style capture references.
pub fn escape_template(id: &str) -> String {
    id.replace('$', "$$")
}

/// Build the three fixed operation groups for a set of rename records.
/// Rules appear in record insertion order within each group.
pub fn config_for(records: &[RenameRecord]) -> PatternConfig {
    let mut markup = Vec::new();
    let mut script = Vec::new();
    let mut style = Vec::new();

    for record in records {
        let e = escape_identifier(&record.old_id);
        let n = escape_template(&record.new_id);

        // Markup: only the label-for attribute, in both quoting styles.
        // The element id attribute itself is left unmatched so the edit the
        // structural migration already made is not re-edited.
        markup.push(Rule {
            from: format!("for=\"{e}\""),
            to: format!("for=\"{n}\""),
        });
        markup.push(Rule {
            from: format!("for='{e}'"),
            to: format!("for='{n}'"),
        });

        // Script: DOM lookups, jQuery/Cypress selectors, then the generic
        // quoted forms. Specific call forms come first so the generic rules
        // see already-rewritten text and stay no-ops for those sites.
        script.push(Rule {
            from: format!("getElementById\\(\\s*['\"]{e}['\"]\\s*\\)"),
            to: format!("getElementById(\"{n}\")"),
        });
        script.push(Rule {
            from: format!("querySelector\\(\\s*['\"]#{e}['\"]\\s*\\)"),
            to: format!("querySelector(\"#{n}\")"),
        });
        script.push(Rule {
            from: format!("querySelectorAll\\(\\s*['\"]#{e}['\"]\\s*\\)"),
            to: format!("querySelectorAll(\"#{n}\")"),
        });
        script.push(Rule {
            from: format!("\\$\\(\\s*['\"]#{e}['\"]\\s*\\)"),
            to: format!("$$(\"#{n}\")"),
        });
        script.push(Rule {
            from: format!("jQuery\\(\\s*['\"]#{e}['\"]\\s*\\)"),
            to: format!("jQuery(\"#{n}\")"),
        });
        script.push(Rule {
            from: format!("cy\\.get\\(\\s*['\"]#{e}['\"]\\s*\\)"),
            to: format!("cy.get(\"#{n}\")"),
        });
        script.push(Rule {
            from: format!("\\(\\s*['\"]{e}['\"]\\s*\\)"),
            to: format!("(\"{n}\")"),
        });
        script.push(Rule {
            from: format!("['\"]#{e}['\"]"),
            to: format!("\"#{n}\""),
        });
        // Bare quoted id guarded by a preceding separator to cut down on
        // false positives against unrelated string literals.
        script.push(Rule {
            from: format!("([\\s=:,])['\"]{e}['\"]"),
            to: format!("${{1}}\"{n}\""),
        });

        // Style: hash selector and its quoted string form.
        style.push(Rule {
            from: format!("#{e}\\b"),
            to: format!("#{n}"),
        });
        style.push(Rule {
            from: format!("['\"]#{e}['\"]"),
            to: format!("\"#{n}\""),
        });
    }

    PatternConfig {
        name: "id-replacements".to_string(),
        operations: vec![
            OperationGroup {
                files: MARKUP_GLOB.to_string(),
                patterns: markup,
            },
            OperationGroup {
                files: SCRIPT_GLOB.to_string(),
                patterns: script,
            },
            OperationGroup {
                files: STYLE_GLOB.to_string(),
                patterns: style,
            },
        ],
    }
}

/// Remove escaping backslashes from regex source text.
fn unescape_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// The quote character class every script/style rule embeds around the id.
const QUOTE_CLASS: &str = "['\"]";

/// Recover the literal old identifier from a rule's search expression.
fn recover_old(from: &str) -> Option<String> {
    // Quoted forms: the id sits between two quote character classes.
    if from.matches(QUOTE_CLASS).count() >= 2 {
        let parts: Vec<&str> = from.split(QUOTE_CLASS).collect();
        let inner = parts.get(1)?;
        let inner = inner.strip_prefix('#').unwrap_or(inner);
        return Some(unescape_regex(inner));
    }
    // Attribute form: for="id" / for='id'
    if let Some(rest) = from.strip_prefix("for=") {
        let quote = rest.chars().next()?;
        if (quote != '"' && quote != '\'') || rest.len() < 2 || !rest.ends_with(quote) {
            return None;
        }
        return Some(unescape_regex(&rest[1..rest.len() - 1]));
    }
    // Hash selector form: #id\b
    if let Some(rest) = from.strip_prefix('#') {
        let rest = rest.strip_suffix("\\b").unwrap_or(rest);
        return Some(unescape_regex(rest));
    }
    None
}

/// Recover the literal new identifier from a rule's replacement template.
fn recover_new(to: &str) -> Option<String> {
    let literal = to.replace("$$", "$");
    // Double-quoted forms: take the first quoted token.
    if let Some(start) = literal.find('"') {
        let rest = &literal[start + 1..];
        let end = rest.find('"')?;
        let inner = &rest[..end];
        let inner = inner.strip_prefix('#').unwrap_or(inner);
        return Some(inner.to_string());
    }
    // Single-quoted attribute form.
    if let Some(start) = literal.find('\'') {
        let rest = &literal[start + 1..];
        let end = rest.find('\'')?;
        return Some(rest[..end].to_string());
    }
    // Hash selector form.
    if let Some(rest) = literal.strip_prefix('#') {
        return Some(rest.to_string());
    }
    None
}

/// Recover the (oldId, newId) pair from a rule's quoted tokens. Used to
/// attribute `replaced` audit entries after the configuration round-trips
/// through the transient artifact.
pub fn recover_pair(from: &str, to: &str) -> Option<(String, String)> {
    // Attribute replacements keep the quote style, so strip the prefix
    // before the quote scan sees `for=`.
    let old = recover_old(from)?;
    let new = recover_new(to.strip_prefix("for=").unwrap_or(to))?;
    Some((old, new))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(old: &str, new: &str) -> RenameRecord {
        RenameRecord {
            old_id: old.to_string(),
            new_id: new.to_string(),
        }
    }

    #[test]
    fn escape_identifier_covers_metacharacters() {
        assert_eq!(escape_identifier("a.b"), "a\\.b");
        assert_eq!(escape_identifier("x[1]"), "x\\[1\\]");
        assert_eq!(escape_identifier("plain-id"), "plain-id");
        assert_eq!(escape_identifier("a$b"), "a\\$b");
        assert_eq!(escape_identifier("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn escape_template_doubles_dollar() {
        assert_eq!(escape_template("a$b"), "a$$b");
        assert_eq!(escape_template("plain"), "plain");
    }

    #[test]
    fn config_has_three_groups_in_fixed_order() {
        let config = config_for(&[record("a", "b")]);
        assert_eq!(config.operations.len(), 3);
        assert_eq!(config.operations[0].files, MARKUP_GLOB);
        assert_eq!(config.operations[1].files, SCRIPT_GLOB);
        assert_eq!(config.operations[2].files, STYLE_GLOB);
        assert_eq!(config.operations[0].patterns.len(), 2);
        assert_eq!(config.operations[1].patterns.len(), 9);
        assert_eq!(config.operations[2].patterns.len(), 2);
    }

    #[test]
    fn config_is_deterministic() {
        let records = vec![record("a", "b"), record("c.d", "e")];
        let one = serde_json::to_string(&config_for(&records)).unwrap();
        let two = serde_json::to_string(&config_for(&records)).unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn markup_rules_only_match_label_for() {
        let config = config_for(&[record("old", "new")]);
        for rule in &config.operations[0].patterns {
            assert!(rule.from.starts_with("for="), "unexpected rule {}", rule.from);
        }
    }

    #[test]
    fn rules_embed_escaped_old_and_literal_new() {
        let config = config_for(&[record("a.b", "c")]);
        let markup = &config.operations[0].patterns[0];
        assert_eq!(markup.from, "for=\"a\\.b\"");
        assert_eq!(markup.to, "for=\"c\"");
    }

    #[test]
    fn every_generated_rule_round_trips_through_recover_pair() {
        let config = config_for(&[record("old-forge-id", "actual-button-id")]);
        for group in &config.operations {
            for rule in &group.patterns {
                let (old, new) = recover_pair(&rule.from, &rule.to)
                    .unwrap_or_else(|| panic!("no recovery for {}", rule.from));
                assert_eq!(old, "old-forge-id", "from: {}", rule.from);
                assert_eq!(new, "actual-button-id", "to: {}", rule.to);
            }
        }
    }

    #[test]
    fn recover_pair_handles_escaped_ids() {
        let config = config_for(&[record("a.b", "c$d")]);
        for group in &config.operations {
            for rule in &group.patterns {
                let (old, new) = recover_pair(&rule.from, &rule.to).unwrap();
                assert_eq!(old, "a.b", "from: {}", rule.from);
                assert_eq!(new, "c$d", "to: {}", rule.to);
            }
        }
    }

    #[test]
    fn separator_guard_keeps_capture_reference() {
        let config = config_for(&[record("old", "new")]);
        let guard = config.operations[1].patterns.last().unwrap();
        assert!(guard.from.starts_with("([\\s=:,])"));
        assert!(guard.to.starts_with("${1}"));
    }

    #[test]
    fn generated_expressions_compile() {
        let config = config_for(&[record("a.b[0]", "x")]);
        for group in &config.operations {
            for rule in &group.patterns {
                regex::Regex::new(&rule.from)
                    .unwrap_or_else(|e| panic!("{} failed to compile: {}", rule.from, e));
            }
        }
    }
}
