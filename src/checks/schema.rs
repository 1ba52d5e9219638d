//! Required top-level keys and recommended sub-fields.

use crate::findings::Findings;
use serde_json::Value;

const REQUIRED_TOP_LEVEL: &[&str] = &[
    "id",
    "name",
    "description",
    "victim",
    "murderTime",
    "murderLocation",
    "evidence",
    "solution",
    "suspects",
    "settings",
];

const VICTIM_RECOMMENDED: &[&str] = &["name", "id", "avatar"];

const POINT_SYSTEM_FIELDS: &[&str] = &[
    "question_cost",
    "search_cost",
    "correct_deduction_reward",
    "key_evidence_reward",
];

pub fn check(tree: &Value, findings: &mut Findings) {
    for field in REQUIRED_TOP_LEVEL {
        if tree.get(field).is_none() {
            findings.err(format!("schema: missing required top-level field '{field}'"));
        }
    }

    if let Some(victim) = tree.get("victim").and_then(Value::as_object) {
        for field in VICTIM_RECOMMENDED {
            if !victim.contains_key(*field) {
                findings.warn(format!("schema: victim missing recommended field '{field}'"));
            }
        }
    }

    if let Some(points) = tree.get("point_system").and_then(Value::as_object) {
        for field in POINT_SYSTEM_FIELDS {
            if !points.contains_key(*field) {
                findings.warn(format!("schema: point_system missing field '{field}'"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn each_missing_required_field_is_its_own_error() {
        let mut findings = Findings::new();
        check(&json!({"id": "c1", "name": "Case"}), &mut findings);
        assert_eq!(findings.errors().len(), REQUIRED_TOP_LEVEL.len() - 2);
        assert!(findings.errors()[0].contains("'description'"));
    }

    #[test]
    fn victim_and_point_system_fields_are_warnings_only() {
        let tree = json!({
            "victim": {"name": "Edwin Marsh"},
            "point_system": {"question_cost": 5}
        });
        let mut findings = Findings::new();
        check(&tree, &mut findings);
        let warnings = findings.warnings();
        assert!(warnings.iter().any(|w| w.contains("victim missing recommended field 'avatar'")));
        assert!(warnings.iter().any(|w| w.contains("point_system missing field 'search_cost'")));
    }
}
