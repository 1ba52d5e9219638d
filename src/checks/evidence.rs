//! Evidence cross-references: discovery placement, interactables,
//! key evidence, location lists, and DNA profiles.

use crate::checks::map::MapGraph;
use crate::checks::suspects::Cast;
use crate::document::{lenient_str, value_type_name};
use crate::findings::Findings;
use serde_json::{Map, Value};
use std::collections::HashSet;

pub fn check(tree: &Value, map: &MapGraph, cast: &Cast, findings: &mut Findings) {
    let empty = Map::new();
    let evidence = tree
        .get("evidence")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let physical = evidence
        .get("physical_evidence")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let physical_ids: HashSet<&str> = physical.keys().map(String::as_str).collect();

    check_discovery(evidence, &physical_ids, map, findings);
    check_interactables(tree, &physical_ids, findings);
    check_discoverability(evidence, physical, findings);
    check_key_evidence(tree, &physical_ids, findings);
    check_locations(evidence, map, findings);
    check_dna(tree, evidence, map, cast, findings);
}

fn check_discovery(
    evidence: &Map<String, Value>,
    physical_ids: &HashSet<&str>,
    map: &MapGraph,
    findings: &mut Findings,
) {
    let Some(discovery) = evidence.get("physical_discovery").and_then(Value::as_object) else {
        return;
    };
    for (room_id, listed) in discovery {
        if !map.has_room(room_id) {
            findings.err(format!(
                "evidence: physical_discovery references non-existent room '{room_id}'"
            ));
        }
        let Some(items) = listed.as_array() else {
            findings.err(format!(
                "evidence: physical_discovery['{room_id}'] must be a list, got {}",
                value_type_name(listed)
            ));
            continue;
        };
        for item in items {
            let declared = item.as_str().is_some_and(|id| physical_ids.contains(id));
            if !declared {
                findings.err(format!(
                    "evidence: physical_discovery room '{room_id}' references undeclared evidence '{}'",
                    lenient_str(item)
                ));
            }
        }
    }
}

fn check_interactables(tree: &Value, physical_ids: &HashSet<&str>, findings: &mut Findings) {
    let Some(rooms) = tree.get("map").and_then(Value::as_object) else {
        return;
    };
    for (room_id, room_info) in rooms {
        let Some(items) = room_info
            .get("interactables")
            .and_then(Value::as_array)
        else {
            continue;
        };
        for item in items {
            let Some(eid) = item.get("evidence_id").and_then(Value::as_str) else {
                continue;
            };
            if !eid.is_empty() && !physical_ids.contains(eid) {
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unnamed");
                findings.err(format!(
                    "map: interactable '{name}' in '{room_id}' has evidence_id '{eid}' \
                     not in physical_evidence"
                ));
            }
        }
    }
}

/// Every declared item must be placed in some discovery room, or players
/// can never find it.
fn check_discoverability(
    evidence: &Map<String, Value>,
    physical: &Map<String, Value>,
    findings: &mut Findings,
) {
    let mut discoverable: HashSet<&str> = HashSet::new();
    if let Some(discovery) = evidence.get("physical_discovery").and_then(Value::as_object) {
        for listed in discovery.values() {
            if let Some(items) = listed.as_array() {
                discoverable.extend(items.iter().filter_map(Value::as_str));
            }
        }
    }
    for ev_id in physical.keys() {
        if !discoverable.contains(ev_id.as_str()) {
            findings.warn(format!(
                "evidence: '{ev_id}' is declared in physical_evidence but not listed in any \
                 physical_discovery room; players can never find it"
            ));
        }
    }
}

fn check_key_evidence(tree: &Value, physical_ids: &HashSet<&str>, findings: &mut Findings) {
    let Some(keys) = tree
        .get("solution")
        .and_then(Value::as_object)
        .and_then(|s| s.get("key_evidence"))
        .and_then(Value::as_array)
    else {
        return;
    };
    for item in keys {
        let declared = item.as_str().is_some_and(|id| physical_ids.contains(id));
        if !declared {
            findings.err(format!(
                "solution: key_evidence '{}' not declared in physical_evidence",
                lenient_str(item)
            ));
        }
    }
}

fn check_locations(evidence: &Map<String, Value>, map: &MapGraph, findings: &mut Findings) {
    let Some(locations) = evidence.get("all_locations").and_then(Value::as_array) else {
        return;
    };
    for loc in locations {
        let known = loc.as_str().is_some_and(|l| map.has_room(l));
        if !known {
            findings.err(format!(
                "evidence: all_locations contains non-existent room '{}'",
                lenient_str(loc)
            ));
        }
    }
}

fn check_dna(
    tree: &Value,
    evidence: &Map<String, Value>,
    map: &MapGraph,
    cast: &Cast,
    findings: &mut Findings,
) {
    // Known profiles: suspect ids, the literal "victim", the victim's id and
    // first name token (both case-folded).
    let mut known: HashSet<String> = cast.suspect_ids.iter().cloned().collect();
    known.insert("victim".to_string());
    let victim = tree.get("victim");
    if let Some(id) = victim.and_then(|v| v.get("id")).and_then(Value::as_str) {
        if !id.is_empty() {
            known.insert(id.to_lowercase());
        }
    }
    if let Some(name) = victim.and_then(|v| v.get("name")).and_then(Value::as_str) {
        if let Some(first) = name.split_whitespace().next() {
            known.insert(first.to_lowercase());
        }
    }

    let dna = evidence.get("dna").and_then(Value::as_object);
    if let Some(dna) = dna {
        for (room_id, profiles) in dna {
            if !map.has_room(room_id) {
                findings.err(format!("dna: references non-existent room '{room_id}'"));
            }
            let Some(names) = profiles.as_array() else {
                findings.err(format!(
                    "dna: entry for room '{room_id}' must be a list (got {}); a stray \
                     non-list key may have been added inside the dna block by mistake",
                    value_type_name(profiles)
                ));
                continue;
            };
            for name in names {
                let recognised = name.as_str().is_some_and(|n| known.contains(n));
                if !recognised {
                    findings.warn(format!(
                        "dna: unknown profile '{}' in room '{room_id}'",
                        lenient_str(name)
                    ));
                }
            }
        }
    }

    // The killer leaving no trace at the scene may be deliberate (gloves,
    // staged scene), so this stays a warning.
    let murder_loc = tree.get("murderLocation").and_then(Value::as_str);
    if let (Some(loc), Some(killer)) = (murder_loc, cast.killer.as_deref()) {
        let present = dna
            .and_then(|d| d.get(loc))
            .and_then(Value::as_array)
            .is_some_and(|names| names.iter().any(|n| n.as_str() == Some(killer)));
        if !present {
            findings.warn(format!(
                "evidence: killer '{killer}' has no DNA at murder location '{loc}'; \
                 may be intentional (gloves etc.) but worth confirming"
            ));
        }
    }
}
