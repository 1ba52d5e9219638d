//! Room graph integrity: declared rooms, adjacency, reachability.

use crate::document::lenient_str;
use crate::findings::Findings;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Declared rooms in document order plus validated adjacency. A room value
/// may be a descriptor object with `connects_to` or a bare connection list.
#[derive(Debug, Default)]
pub struct MapGraph {
    rooms: Vec<String>,
    adjacency: HashMap<String, Vec<String>>,
}

impl MapGraph {
    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    pub fn has_room(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    fn neighbors(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterative depth-first reachability.
    fn reachable_from<'a>(&'a self, start: &'a str) -> HashSet<&'a str> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for neighbor in self.neighbors(node) {
                stack.push(neighbor);
            }
        }
        visited
    }
}

pub fn check(tree: &Value, findings: &mut Findings) -> MapGraph {
    let mut graph = MapGraph::default();

    let Some(rooms) = tree.get("map").and_then(Value::as_object) else {
        findings.err("map: no 'map' key defined");
        return graph;
    };

    graph.rooms = rooms.keys().cloned().collect();

    for (room_id, room_info) in rooms {
        let connects: Vec<&Value> = match room_info {
            Value::Object(obj) => obj
                .get("connects_to")
                .and_then(Value::as_array)
                .map(|a| a.iter().collect())
                .unwrap_or_default(),
            Value::Array(arr) => arr.iter().collect(),
            _ => Vec::new(),
        };

        let mut valid = Vec::new();
        for target in connects {
            match target.as_str() {
                Some(t) if graph.rooms.iter().any(|r| r == t) => valid.push(t.to_string()),
                _ => findings.err(format!(
                    "map: room '{room_id}' connects_to non-existent room '{}'",
                    lenient_str(target)
                )),
            }
        }
        graph.adjacency.insert(room_id.clone(), valid);
    }

    // One-way edges are flagged on the declaring side only.
    for room_id in &graph.rooms {
        for target in graph.neighbors(room_id) {
            if !graph.neighbors(target).iter().any(|r| r == room_id) {
                findings.warn(format!(
                    "map: '{room_id}' -> '{target}' is one-way (no return connection)"
                ));
            }
        }
    }

    // Every room should be reachable from the first declared one.
    if let Some(start) = graph.rooms.first() {
        let reachable = graph.reachable_from(start);
        for room in &graph.rooms {
            if !reachable.contains(room.as_str()) {
                findings.warn(format!(
                    "map: room '{room}' is unreachable from '{start}'; players may be stranded"
                ));
            }
        }
    }

    if let Some(loc) = tree.get("murderLocation").and_then(Value::as_str) {
        if !graph.has_room(loc) {
            findings.err(format!("map: murderLocation '{loc}' not found in map rooms"));
        }
    }

    graph
}
