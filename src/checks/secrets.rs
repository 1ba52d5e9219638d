//! Secret trigger dependency resolution.
//!
//! A trigger may require flat references (physical evidence, digital logs,
//! footage, rooms) and other secrets, gated by a pressure threshold.

use crate::checks::map::MapGraph;
use crate::document::lenient_str;
use crate::findings::Findings;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Pressure thresholds above this are likely unreachable within the
/// interrogation point budget.
const PRESSURE_CEILING: f64 = 80.0;

pub fn check(tree: &Value, map: &MapGraph, findings: &mut Findings) {
    let empty = Map::new();
    let evidence = tree
        .get("evidence")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    // Flat reference ids the runtime can resolve without dot-notation.
    let mut valid_flat: HashSet<&str> = HashSet::new();
    for section in ["physical_evidence", "digital_logs", "footage"] {
        if let Some(ids) = evidence.get(section).and_then(Value::as_object) {
            valid_flat.extend(ids.keys().map(String::as_str));
        }
    }
    valid_flat.extend(map.rooms().iter().map(String::as_str));

    let suspects = tree
        .get("suspects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let all_secret_ids: HashSet<&str> = suspects
        .iter()
        .flat_map(secrets_of)
        .filter_map(|s| s.get("id").and_then(Value::as_str))
        .collect();

    for suspect in suspects {
        let Some(sid) = suspect.get("id").and_then(Value::as_str) else {
            continue; // already reported by the suspects pass
        };
        for secret in secrets_of(suspect) {
            let Some(sec_id) = secret.get("id").and_then(Value::as_str) else {
                findings.err(format!("suspect '{sid}': secret without a string 'id' field"));
                continue;
            };
            let trigger = secret.get("trigger").and_then(Value::as_object);

            for req in trigger_list(trigger, "requiresEvidence") {
                match req.as_str() {
                    Some(r) if r.contains('.') => findings.err(format!(
                        "suspect '{sid}' secret '{sec_id}': requiresEvidence uses \
                         dot-notation '{r}'; use requiresSecrets for secret cross-references"
                    )),
                    Some(r) if !valid_flat.contains(r) => findings.err(format!(
                        "suspect '{sid}' secret '{sec_id}': requiresEvidence references \
                         undeclared ID '{r}'"
                    )),
                    Some(_) => {}
                    None => findings.err(format!(
                        "suspect '{sid}' secret '{sec_id}': requiresEvidence references \
                         undeclared ID '{}'",
                        lenient_str(req)
                    )),
                }
            }

            let required_secrets = trigger_list(trigger, "requiresSecrets");
            for req in &required_secrets {
                let known = req.as_str().is_some_and(|r| all_secret_ids.contains(r));
                if !known {
                    findings.err(format!(
                        "suspect '{sid}' secret '{sec_id}': requiresSecrets references \
                         unknown secret ID '{}'",
                        lenient_str(req)
                    ));
                }
            }
            // Self-reference is an additional hard error regardless of
            // resolution, reported once per secret.
            if required_secrets.iter().any(|r| r.as_str() == Some(sec_id)) {
                findings.err(format!(
                    "suspect '{sid}' secret '{sec_id}': requiresSecrets references itself; \
                     circular dependency"
                ));
            }

            if let Some(mp) = trigger.and_then(|t| t.get("minPressure")) {
                match mp.as_f64() {
                    None => findings.err(format!(
                        "suspect '{sid}' secret '{sec_id}': minPressure must be a number, \
                         got '{}'",
                        lenient_str(mp)
                    )),
                    Some(p) if p > PRESSURE_CEILING => findings.warn(format!(
                        "suspect '{sid}' secret '{sec_id}': minPressure={p} is very high; \
                         may be unreachable within point budget"
                    )),
                    Some(_) => {}
                }
            }
        }
    }

    check_pressure_ordering(suspects, findings);
}

/// A dependent secret whose threshold is not strictly above its
/// prerequisite's can unlock before the prerequisite does.
fn check_pressure_ordering(suspects: &[Value], findings: &mut Findings) {
    for suspect in suspects {
        let Some(sid) = suspect.get("id").and_then(Value::as_str) else {
            continue;
        };

        let mut thresholds: HashMap<&str, f64> = HashMap::new();
        for secret in secrets_of(suspect) {
            let Some(sec_id) = secret.get("id").and_then(Value::as_str) else {
                continue;
            };
            let mp = secret
                .get("trigger")
                .and_then(|t| t.get("minPressure"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            thresholds.insert(sec_id, mp);
        }

        for secret in secrets_of(suspect) {
            let Some(sec_id) = secret.get("id").and_then(Value::as_str) else {
                continue;
            };
            let sec_mp = thresholds.get(sec_id).copied().unwrap_or(0.0);
            let trigger = secret.get("trigger").and_then(Value::as_object);
            for req in trigger_list(trigger, "requiresSecrets") {
                let Some(req_id) = req.as_str() else { continue };
                // Prerequisites held by other suspects have no threshold here.
                let Some(&req_mp) = thresholds.get(req_id) else {
                    continue;
                };
                if sec_mp <= req_mp {
                    findings.warn(format!(
                        "suspect '{sid}' secret '{sec_id}' (minPressure={sec_mp}) requires \
                         secret '{req_id}' (minPressure={req_mp}) but has equal or lower \
                         pressure; '{req_id}' may never unlock first"
                    ));
                }
            }
        }
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

fn trigger_list<'a>(trigger: Option<&'a Map<String, Value>>, key: &str) -> Vec<&'a Value> {
    trigger
        .and_then(|t| t.get(key))
        .and_then(Value::as_array)
        .map(|a| a.iter().collect())
        .unwrap_or_default()
}
