//! Pre-parse scan for duplicate sibling keys in the raw document text.
//!
//! Generic parsers keep only the last occurrence of a repeated mapping key,
//! so a duplicated block silently vanishes before any tree-level check can
//! see it. This pass walks the unparsed text with a stack of lexical scopes
//! (indentation column plus the keys seen so far) and flags a key that
//! repeats inside the same mapping block. Each list item opens a fresh
//! scope, so fields recurring across sibling list entries are not flagged.
//!
//! Known limitation: lines inside literal/folded block scalars are not
//! distinguished from plain lines, so `key:`-shaped text in a block scalar
//! can false-positive.

use crate::findings::Findings;
use std::collections::HashMap;

struct Scope {
    indent: usize,
    seen: HashMap<String, usize>,
}

impl Scope {
    fn new(indent: usize) -> Self {
        Self {
            indent,
            seen: HashMap::new(),
        }
    }
}

pub fn scan(text: &str, findings: &mut Findings) {
    // Root scope never pops; the len() > 1 guard below protects it.
    let mut scopes: Vec<Scope> = vec![Scope::new(0)];

    for (idx, raw_line) in text.lines().enumerate() {
        let lineno = idx + 1;
        let mut stripped = raw_line.trim_start();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        let mut indent = raw_line.chars().take_while(|c| c.is_whitespace()).count();

        // A list item opens a fresh mapping scope at this indent; the
        // remainder after the dash, if it is itself a `key: value` pair,
        // lives two columns deeper.
        if let Some(rest) = list_item_rest(stripped) {
            while scopes.len() > 1 && scopes.last().is_some_and(|s| s.indent >= indent) {
                scopes.pop();
            }
            scopes.push(Scope::new(indent));
            stripped = rest.trim_start();
            if stripped.is_empty() || !stripped.contains(':') {
                continue;
            }
            indent += 2;
        }

        if !stripped.contains(':') {
            continue;
        }
        let Some(key) = extract_key(stripped) else {
            continue;
        };
        if key.is_empty() || key.starts_with('{') {
            continue;
        }

        // Close deeper or sibling scopes that have ended.
        while scopes.len() > 1 && scopes.last().is_some_and(|s| s.indent >= indent) {
            scopes.pop();
        }

        let scope = scopes.last_mut().expect("root scope always present");
        match scope.seen.get(&key) {
            Some(&first) => findings.err(format!(
                "duplicate key (line {lineno}): '{key}' already declared at line {first} \
                 in the same mapping block; the later entry silently overwrites the earlier one"
            )),
            None => {
                scope.seen.insert(key, lineno);
            }
        }

        // An empty value position means the key opens a nested mapping.
        if stripped.trim_end().ends_with(':') {
            scopes.push(Scope::new(indent + 1));
        }
    }
}

/// Remainder after a list-item marker: a dash followed by whitespace.
fn list_item_rest(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    rest.chars().next().filter(|c| c.is_whitespace())?;
    Some(rest)
}

/// Extract the mapping key from a `key: value` line. Single- or
/// double-quoted keys may contain colons; surrounding quotes are stripped.
fn extract_key(line: &str) -> Option<String> {
    if let Some(key) = quoted_key(line) {
        return Some(key);
    }
    let (key, _) = line.split_once(':')?;
    Some(
        key.trim()
            .trim_matches(|c| c == '\'' || c == '"')
            .to_string(),
    )
}

fn quoted_key(line: &str) -> Option<String> {
    let quote = line.chars().next()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let rest = &line[1..];
    let close = rest.find(quote)?;
    if !rest[close + 1..].trim_start().starts_with(':') {
        return None;
    }
    Some(rest[..close].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_text(text: &str) -> Vec<String> {
        let mut findings = Findings::new();
        scan(text, &mut findings);
        findings.errors().to_vec()
    }

    #[test]
    fn flags_sibling_duplicate_and_names_both_lines() {
        let errors = scan_text("a: 1\nb: 2\na: 3\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'a'"));
        assert!(errors[0].contains("line 3"));
        assert!(errors[0].contains("line 1"));
    }

    #[test]
    fn repeated_field_across_list_items_is_not_a_duplicate() {
        let text = "suspects:\n  - id: one\n    alibi: home\n  - id: two\n    alibi: work\n";
        assert!(scan_text(text).is_empty());
    }

    #[test]
    fn duplicate_inside_one_list_item_is_flagged() {
        let text = "suspects:\n  - id: one\n    alibi: home\n    alibi: work\n";
        let errors = scan_text(text);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'alibi'"));
    }

    #[test]
    fn nested_mapping_keys_do_not_collide_with_outer_scope() {
        let text = "outer:\n  name: a\ninner:\n  name: b\n";
        assert!(scan_text(text).is_empty());
    }

    #[test]
    fn duplicate_nested_mapping_key_is_flagged_once() {
        let text = "evidence:\n  dna: {}\n  dna: {}\n";
        let errors = scan_text(text);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'dna'"));
    }

    #[test]
    fn quoted_keys_may_contain_colons() {
        let text = "timeline:\n  '10:28': seen leaving\n  \"10:45\": returned\n  '10:28': again\n";
        let errors = scan_text(text);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'10:28'"));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let text = "a: 1\n\n# a: commented, not a duplicate\nb: 2\n";
        assert!(scan_text(text).is_empty());
    }

    #[test]
    fn inline_flow_mapping_lines_are_ignored() {
        let text = "{a: 1}\n{a: 2}\n";
        assert!(scan_text(text).is_empty());
    }

    #[test]
    fn sibling_scope_closes_when_indentation_decreases() {
        // `name` under two different parents, then a true duplicate at root
        let text = "rooms:\n  name: hall\nvictim:\n  name: edwin\nrooms: again\n";
        let errors = scan_text(text);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'rooms'"));
    }

    #[test]
    fn inline_list_item_key_shares_scope_with_following_fields() {
        let text = "secrets:\n  - id: s1\n    id: s2\n";
        let errors = scan_text(text);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'id'"));
    }
}
