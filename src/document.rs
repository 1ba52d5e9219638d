//! Case document loading and the generic parsed tree.
//!
//! The document is deliberately dynamically shaped: a room value may be a
//! descriptor object or a bare connection list, optional sections come and
//! go per case. Everything downstream traverses one `serde_json::Value`
//! tree with tolerant accessors instead of a rigid schema; YAML input is
//! parsed with `serde_yaml` and converted into the same JSON value shape so
//! the checks only ever see one representation. Mapping key order is
//! preserved from the source, which matters: the first declared room seeds
//! reachability and finding order must be stable across runs.

use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFormat {
    Yaml,
    Json,
}

impl CaseFormat {
    /// Format selection by file extension: `.yaml`/`.yml` parse as YAML,
    /// everything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                CaseFormat::Yaml
            }
            _ => CaseFormat::Json,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CaseFormat::Yaml => "YAML",
            CaseFormat::Json => "JSON",
        }
    }
}

/// Fatal conditions: no partial report is produced for these.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("case file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Read the whole document into memory before any processing.
pub fn read_raw(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        return Err(CaseError::NotFound(path.to_path_buf()).into());
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse raw text into the generic tree.
pub fn parse(raw: &str, format: CaseFormat) -> Result<Value, CaseError> {
    let parse_err = |message: String| CaseError::Parse {
        format: format.name(),
        message,
    };
    match format {
        CaseFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string()))?;
            serde_json::to_value(yaml).map_err(|e| parse_err(e.to_string()))
        }
        CaseFormat::Json => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
    }
}

pub fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a scalar for a finding message: strings unquoted, everything else
/// in its JSON form.
pub fn lenient_str(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Tolerant presence test: absent, null, empty string/list/object and
/// `false`/`0` all count as unset.
pub fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
