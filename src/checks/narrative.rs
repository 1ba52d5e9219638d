//! Narrative coherence heuristics.
//!
//! These encode authorial judgment rather than structural correctness, so
//! every finding here is a warning. They run last, over references the
//! earlier passes have already validated.

use crate::checks::suspects::Cast;
use crate::document::truthy;
use crate::findings::Findings;
use serde_json::{Map, Value};
use std::collections::HashSet;

pub fn check(tree: &Value, cast: &Cast, findings: &mut Findings) {
    let empty = Map::new();
    let evidence = tree
        .get("evidence")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let solution = tree
        .get("solution")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let suspects = tree
        .get("suspects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let killer = cast.killer.as_deref();

    // Key evidence that no trigger requires has no mechanical effect.
    let required_anywhere: HashSet<&str> = suspects
        .iter()
        .flat_map(|s| trigger_evidence(s))
        .collect();
    if let Some(keys) = solution.get("key_evidence").and_then(Value::as_array) {
        for item in keys.iter().filter_map(Value::as_str) {
            if !required_anywhere.contains(item) {
                findings.warn(format!(
                    "narrative: key_evidence '{item}' is never required by any suspect \
                     secret trigger; it may have no mechanical effect"
                ));
            }
        }
    }

    let killer_entry = killer.and_then(|k| {
        suspects
            .iter()
            .find(|s| s.get("id").and_then(Value::as_str) == Some(k))
    });
    if let (Some(killer_id), Some(entry)) = (killer, killer_entry) {
        // The smoking gun should connect to the killer mechanically.
        if let Some(loc) = tree.get("murderLocation").and_then(Value::as_str) {
            let scene_evidence: HashSet<&str> = evidence
                .get("physical_discovery")
                .and_then(|d| d.get(loc))
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if !scene_evidence.is_empty() {
                let tied = trigger_evidence(entry).any(|ev| scene_evidence.contains(ev));
                if !tied {
                    findings.warn(format!(
                        "narrative: killer '{killer_id}' has no secret triggered by murder \
                         scene evidence; the smoking gun may not connect to them mechanically"
                    ));
                }
            }
        }

        // Without a terminal confession the investigation has no climax.
        let has_terminal = secrets_of(entry).any(|s| {
            let id = s.get("id").and_then(Value::as_str).unwrap_or("");
            let text = s.get("text").and_then(Value::as_str).unwrap_or("");
            id.to_lowercase().contains("confession") || text.to_lowercase().contains("confess")
        });
        if !has_terminal {
            findings.warn(format!(
                "narrative: killer '{killer_id}' has no confession or terminal secret; \
                 the player may have no satisfying climax moment"
            ));
        }
    }

    let statements = evidence
        .get("initial_police_statements")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    for suspect in suspects {
        let Some(sid) = suspect.get("id").and_then(Value::as_str) else {
            continue;
        };
        if !statements.contains_key(sid) {
            findings.warn(format!(
                "narrative: suspect '{sid}' has no initial police statement"
            ));
        }
    }

    check_win_conditions(tree, killer, killer_entry, findings);
}

/// `win_conditions` should mention the killer somewhere in its text;
/// matched as a case-insensitive substring over the serialized structure.
fn check_win_conditions(
    tree: &Value,
    killer: Option<&str>,
    killer_entry: Option<&Value>,
    findings: &mut Findings,
) {
    let Some(wc) = tree.get("win_conditions") else {
        return;
    };
    if !truthy(Some(wc)) {
        return;
    }
    let Some(killer_id) = killer else {
        return;
    };
    let text = serde_json::to_string(wc).unwrap_or_default().to_lowercase();
    let killer_name = killer_entry
        .and_then(|e| e.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_lowercase();
    let id_mentioned = text.contains(&killer_id.to_lowercase());
    let name_mentioned = killer_name.is_empty() || text.contains(&killer_name);
    if !id_mentioned && !name_mentioned {
        findings.warn(format!(
            "narrative: win_conditions text doesn't mention killer '{killer_id}'; may be vague"
        ));
    }
}

fn secrets_of(suspect: &Value) -> impl Iterator<Item = &Value> {
    suspect
        .get("secrets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
}

fn trigger_evidence(suspect: &Value) -> impl Iterator<Item = &str> {
    secrets_of(suspect).flat_map(|s| {
        s.get("trigger")
            .and_then(|t| t.get("requiresEvidence"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(Value::as_str)
    })
}
