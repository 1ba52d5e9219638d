//! Suspect identity, solution role resolution, and flag coherence.

use crate::checks::map::MapGraph;
use crate::document::{lenient_str, truthy};
use crate::findings::Findings;
use serde_json::Value;

/// Sentinel meaning a solution role is intentionally unassigned.
pub const UNASSIGNED: &str = "none";

const RESISTANCE_LEVELS: &[&str] = &["low", "moderate", "high", "expert"];

/// Resolved suspect identities and solution roles, consumed by the evidence
/// and narrative passes.
#[derive(Debug, Default)]
pub struct Cast {
    pub suspect_ids: Vec<String>,
    pub killer: Option<String>,
    pub accomplice: String,
    pub silent_witness: String,
}

impl Cast {
    pub fn has_suspect(&self, id: &str) -> bool {
        self.suspect_ids.iter().any(|s| s == id)
    }
}

pub fn check(tree: &Value, map: &MapGraph, findings: &mut Findings) -> Cast {
    let suspects = tree
        .get("suspects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let suspect_ids: Vec<String> = suspects
        .iter()
        .filter_map(|s| s.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    // The solution may be a bare killer id or a structured object.
    let solution = tree.get("solution");
    let (killer, accomplice, silent_witness) = match solution {
        Some(Value::Object(obj)) => (
            obj.get("killer").and_then(Value::as_str).map(str::to_string),
            role_or_unassigned(obj.get("accomplice")),
            role_or_unassigned(obj.get("silent_witness")),
        ),
        Some(Value::String(s)) => (Some(s.clone()), UNASSIGNED.into(), UNASSIGNED.into()),
        _ => (None, UNASSIGNED.into(), UNASSIGNED.into()),
    };

    let cast = Cast {
        suspect_ids,
        killer,
        accomplice,
        silent_witness,
    };

    match &cast.killer {
        Some(k) if !cast.has_suspect(k) => {
            findings.err(format!("solution: killer '{k}' not found in suspects list"));
        }
        None => findings.err("solution: no killer declared"),
        _ => {}
    }
    if cast.accomplice != UNASSIGNED && !cast.has_suspect(&cast.accomplice) {
        findings.err(format!(
            "solution: accomplice '{}' not found in suspects list",
            cast.accomplice
        ));
    }
    if cast.silent_witness != UNASSIGNED && !cast.has_suspect(&cast.silent_witness) {
        findings.err(format!(
            "solution: silent witness '{}' not found in suspects list",
            cast.silent_witness
        ));
    }

    for suspect in suspects {
        let Some(sid) = suspect.get("id").and_then(Value::as_str) else {
            findings.err("suspects: entry without a string 'id' field");
            continue;
        };

        if let Some(loc) = suspect.get("currentLocation").and_then(Value::as_str) {
            if !map.has_room(loc) {
                findings.err(format!("suspect '{sid}': currentLocation '{loc}' not in map"));
            }
        }

        check_role_flag(
            suspect,
            sid,
            "isGuilty",
            "killer",
            cast.killer.as_deref() == Some(sid),
            findings,
        );
        check_role_flag(
            suspect,
            sid,
            "isAccomplice",
            "accomplice",
            cast.accomplice == sid,
            findings,
        );
        check_role_flag(
            suspect,
            sid,
            "isSilentWitness",
            "silent_witness",
            cast.silent_witness == sid,
            findings,
        );

        if !truthy(suspect.get("alibi")) {
            findings.warn(format!("suspect '{sid}': missing alibi field"));
        }
        if !truthy(suspect.get("secrets")) {
            findings.warn(format!(
                "suspect '{sid}': has no secrets defined; may be a dead end for players"
            ));
        }
        if let Some(level) = suspect.get("resistance_level") {
            if truthy(Some(level)) {
                let text = lenient_str(level);
                if !RESISTANCE_LEVELS.contains(&text.as_str()) {
                    findings.warn(format!(
                        "suspect '{sid}': unrecognised resistance_level '{text}' \
                         (expected: low/moderate/high/expert)"
                    ));
                }
            }
        }
    }

    cast
}

fn role_or_unassigned(v: Option<&Value>) -> String {
    v.and_then(Value::as_str).unwrap_or(UNASSIGNED).to_string()
}

/// A flag counts as set only when it is boolean `true`; it must agree with
/// the role assignment in both directions.
fn check_role_flag(
    suspect: &Value,
    sid: &str,
    flag: &str,
    role: &str,
    holds_role: bool,
    findings: &mut Findings,
) {
    let flagged = suspect.get(flag).and_then(Value::as_bool).unwrap_or(false);
    if holds_role && !flagged {
        findings.err(format!(
            "suspect '{sid}': is the solution {role} but {flag} is not true"
        ));
    }
    if !holds_role && flagged {
        findings.err(format!(
            "suspect '{sid}': {flag} is true but is not the solution {role}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::map;
    use serde_json::json;

    fn run(tree: &Value) -> (Cast, Vec<String>, Vec<String>) {
        let mut findings = Findings::new();
        let graph = map::check(tree, &mut findings);
        let mut findings = Findings::new(); // discard map findings
        let cast = check(tree, &graph, &mut findings);
        let (errors, warnings) = findings.into_parts();
        (cast, errors, warnings)
    }

    fn base_suspect(id: &str) -> Value {
        json!({
            "id": id,
            "alibi": "somewhere else",
            "secrets": [{"id": "s1"}],
            "resistance_level": "low"
        })
    }

    #[test]
    fn unknown_role_ids_error_per_role() {
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [base_suspect("mara")],
            "solution": {"killer": "ghost", "accomplice": "phantom", "silent_witness": "none"}
        });
        let (_, errors, _) = run(&tree);
        assert!(errors.iter().any(|e| e.contains("killer 'ghost' not found")));
        assert!(errors.iter().any(|e| e.contains("accomplice 'phantom' not found")));
        assert!(!errors.iter().any(|e| e.contains("silent witness")));
    }

    #[test]
    fn none_sentinel_is_not_resolved_as_an_id() {
        let mut killer = base_suspect("mara");
        killer["isGuilty"] = json!(true);
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [killer],
            "solution": {"killer": "mara", "accomplice": "none", "silent_witness": "none"}
        });
        let (_, errors, _) = run(&tree);
        assert!(errors.is_empty(), "unexpected: {errors:?}");
    }

    #[test]
    fn bare_scalar_solution_is_the_killer_id() {
        let mut killer = base_suspect("mara");
        killer["isGuilty"] = json!(true);
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [killer],
            "solution": "mara"
        });
        let (cast, errors, _) = run(&tree);
        assert_eq!(cast.killer.as_deref(), Some("mara"));
        assert!(errors.is_empty(), "unexpected: {errors:?}");
    }

    #[test]
    fn flag_without_role_and_role_without_flag_both_error() {
        let mut bystander = base_suspect("finn");
        bystander["isGuilty"] = json!(true);
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [base_suspect("mara"), bystander],
            "solution": {"killer": "mara"}
        });
        let (_, errors, _) = run(&tree);
        assert!(errors
            .iter()
            .any(|e| e.contains("'mara': is the solution killer but isGuilty is not true")));
        assert!(errors
            .iter()
            .any(|e| e.contains("'finn': isGuilty is true but is not the solution killer")));
    }

    #[test]
    fn non_boolean_flag_counts_as_unset() {
        let mut killer = base_suspect("mara");
        killer["isGuilty"] = json!("yes");
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [killer],
            "solution": {"killer": "mara"}
        });
        let (_, errors, _) = run(&tree);
        assert!(errors
            .iter()
            .any(|e| e.contains("is the solution killer but isGuilty is not true")));
    }

    #[test]
    fn current_location_must_resolve_to_a_room() {
        let mut s = base_suspect("mara");
        s["isGuilty"] = json!(true);
        s["currentLocation"] = json!("cellar");
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [s],
            "solution": {"killer": "mara"}
        });
        let (_, errors, _) = run(&tree);
        assert!(errors
            .iter()
            .any(|e| e.contains("currentLocation 'cellar' not in map")));
    }

    #[test]
    fn soft_gaps_are_warnings_only() {
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [{"id": "mara", "isGuilty": true, "resistance_level": "impossible"}],
            "solution": {"killer": "mara"}
        });
        let (_, errors, warnings) = run(&tree);
        assert!(errors.is_empty(), "unexpected: {errors:?}");
        assert!(warnings.iter().any(|w| w.contains("missing alibi")));
        assert!(warnings.iter().any(|w| w.contains("has no secrets defined")));
        assert!(warnings
            .iter()
            .any(|w| w.contains("unrecognised resistance_level 'impossible'")));
    }

    #[test]
    fn suspect_without_id_errors_and_is_skipped() {
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [{"name": "Nameless", "isGuilty": true}],
            "solution": {"killer": "mara"}
        });
        let (cast, errors, _) = run(&tree);
        assert!(cast.suspect_ids.is_empty());
        assert!(errors
            .iter()
            .any(|e| e.contains("entry without a string 'id' field")));
        // the flag check for the malformed entry is skipped
        assert!(!errors.iter().any(|e| e.contains("isGuilty is true")));
    }

    #[test]
    fn missing_solution_reports_no_killer() {
        let tree = json!({
            "map": {"hall": {}},
            "suspects": [base_suspect("mara")]
        });
        let (cast, errors, _) = run(&tree);
        assert!(cast.killer.is_none());
        assert!(errors.iter().any(|e| e.contains("no killer declared")));
    }
}
