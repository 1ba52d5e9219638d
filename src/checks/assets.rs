//! Avatar and room image existence under the static asset root.
//!
//! Asset declarations are optional; only declared paths are probed.

use crate::findings::Findings;
use serde_json::Value;
use std::path::Path;

pub fn check(tree: &Value, assets_root: &Path, findings: &mut Findings) {
    if let Some(avatar) = tree
        .get("victim")
        .and_then(|v| v.get("avatar"))
        .and_then(Value::as_str)
    {
        probe(assets_root, avatar, "victim avatar", findings);
    }

    if let Some(suspects) = tree.get("suspects").and_then(Value::as_array) {
        for suspect in suspects {
            let Some(sid) = suspect.get("id").and_then(Value::as_str) else {
                continue;
            };
            if let Some(avatar) = suspect.get("avatar").and_then(Value::as_str) {
                probe(
                    assets_root,
                    avatar,
                    &format!("suspect '{sid}' avatar"),
                    findings,
                );
            }
        }
    }

    if let Some(rooms) = tree.get("map").and_then(Value::as_object) {
        for (room_id, room_info) in rooms {
            if let Some(image) = room_info.get("image").and_then(Value::as_str) {
                probe(
                    assets_root,
                    image,
                    &format!("room '{room_id}' image"),
                    findings,
                );
            }
        }
    }
}

fn probe(root: &Path, asset_path: &str, context: &str, findings: &mut Findings) {
    if asset_path.is_empty() {
        return;
    }
    let full = root.join(asset_path.trim_start_matches('/'));
    if !full.exists() {
        findings.err(format!(
            "resource: {context} '{asset_path}' not found at {}",
            full.display()
        ));
    }
}
