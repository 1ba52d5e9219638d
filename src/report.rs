//! Verification report rendering: human-readable text or a JSON envelope.

use crate::findings::Findings;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct VerifyReport {
    pub case_name: String,
    pub case_id: String,
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl VerifyReport {
    pub fn new(tree: &Value, findings: Findings) -> Self {
        let case_name = tree
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        let case_id = tree
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let passed = findings.passed();
        let (errors, warnings) = findings.into_parts();
        Self {
            case_name,
            case_id,
            passed,
            errors,
            warnings,
        }
    }
}

pub fn print_report(json: bool, report: &VerifyReport) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: report
            })?
        );
        return Ok(());
    }

    let bar = "=".repeat(55);
    println!();
    println!("{bar}");
    println!("  Verification Report: {} ({})", report.case_name, report.case_id);
    println!("{bar}");
    println!();

    if report.errors.is_empty() {
        println!("PASSED: no critical errors.");
    } else {
        println!("FAILED: {} error(s)", report.errors.len());
        println!();
        for e in &report.errors {
            println!("  [ERR] {e}");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{} warning(s):", report.warnings.len());
        println!();
        for w in &report.warnings {
            println!("  [WRN] {w}");
        }
    }

    if report.errors.is_empty() && report.warnings.is_empty() {
        println!();
        println!("  everything looks clean.");
    }

    println!();
    println!("{bar}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_reads_name_and_id_from_tree() {
        let mut findings = Findings::new();
        findings.warn("minor");
        let tree = json!({"name": "Harbor Lights", "id": "harbor_lights"});
        let report = VerifyReport::new(&tree, findings);
        assert_eq!(report.case_name, "Harbor Lights");
        assert_eq!(report.case_id, "harbor_lights");
        assert!(report.passed);
        assert_eq!(report.warnings, ["minor"]);
    }

    #[test]
    fn unnamed_case_falls_back_to_placeholders() {
        let report = VerifyReport::new(&json!({}), Findings::new());
        assert_eq!(report.case_name, "Unknown");
        assert_eq!(report.case_id, "unknown");
    }

    #[test]
    fn errors_fail_the_report() {
        let mut findings = Findings::new();
        findings.err("broken");
        let report = VerifyReport::new(&json!({}), findings);
        assert!(!report.passed);
    }
}
