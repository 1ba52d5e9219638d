//! Check passes over a case document.
//!
//! ## Check map
//! - `duplicates.rs` - pre-parse duplicate sibling key scan over raw text.
//! - `schema.rs` - required top-level fields and recommended sub-fields.
//! - `map.rs` - room graph integrity, reachability, murder location.
//! - `suspects.rs` - suspect identity, solution roles, flag coherence.
//! - `evidence.rs` - evidence cross-references and DNA profiles.
//! - `secrets.rs` - secret trigger dependency resolution.
//! - `assets.rs` - avatar and room image existence.
//! - `narrative.rs` - design-smell heuristics, warnings only.
//!
//! ## Conventions
//! - Passes run in dependency order over one immutable tree.
//! - A malformed sub-item records its finding and skips only itself;
//!   sibling checks and later passes always run to completion.

pub mod assets;
pub mod duplicates;
pub mod evidence;
pub mod map;
pub mod narrative;
pub mod schema;
pub mod secrets;
pub mod suspects;

use crate::findings::Findings;
use serde_json::Value;
use std::path::Path;

/// Run every tree-level pass. The raw-text duplicate scan is separate
/// because it must see the document before parsing.
pub fn run(tree: &Value, assets_root: &Path, findings: &mut Findings) {
    schema::check(tree, findings);
    let graph = map::check(tree, findings);
    let cast = suspects::check(tree, &graph, findings);
    evidence::check(tree, &graph, &cast, findings);
    secrets::check(tree, &graph, findings);
    assets::check(tree, assets_root, findings);
    narrative::check(tree, &cast, findings);
}
