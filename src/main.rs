mod checks;
mod cli;
mod config;
mod document;
mod findings;
mod report;

use anyhow::Result;
use clap::Parser;
use std::path::Path;

use crate::cli::Cli;
use crate::config::Config;
use crate::document::CaseFormat;
use crate::findings::Findings;
use crate::report::VerifyReport;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(root) = cli.assets_root {
        cfg.assets_root = root;
    }
    let case_path = cfg.resolve_case_path(cli.case.as_deref());
    let report = verify_case(&case_path, &cfg)?;
    report::print_report(cli.json, &report)
}

/// Full verification pipeline: raw-text scan, parse, tree-level passes.
/// Missing files and parse failures are fatal; everything else accumulates
/// into the report.
fn verify_case(path: &Path, cfg: &Config) -> Result<VerifyReport> {
    let raw = document::read_raw(path)?;
    let mut findings = Findings::new();
    checks::duplicates::scan(&raw, &mut findings);
    let tree = document::parse(&raw, CaseFormat::from_path(path))?;
    checks::run(&tree, &cfg.assets_root, &mut findings);
    Ok(VerifyReport::new(&tree, findings))
}
