//! Verifier configuration.
//!
//! Explicit configuration passed into the entry point instead of
//! process-wide defaults: the default case path, the fallback extensions
//! probed when it does not exist, and the static asset root used by the
//! asset existence check. An optional TOML file overrides the defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Case file used when no path is given on the command line.
    pub case_path: PathBuf,
    /// Extensions probed, in order, when `case_path` does not exist.
    pub fallback_extensions: Vec<String>,
    /// Root directory avatar and room image paths resolve under.
    pub assets_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_path: PathBuf::from("data/cases/case.yaml"),
            fallback_extensions: vec!["yml".to_string(), "json".to_string()],
            assets_root: PathBuf::from("public"),
        }
    }
}

impl Config {
    /// Load configuration. An explicitly named file must exist; the implicit
    /// `caselint.toml` in the working directory is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from("caselint.toml"),
        };
        if !path.exists() {
            if explicit.is_some() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Resolve the case path to verify. An explicit CLI argument wins as-is;
    /// otherwise the configured path is used, swapping in each fallback
    /// extension in order when the primary file is missing. Falls back to
    /// the primary path when nothing exists so the not-found error names it.
    pub fn resolve_case_path(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(p) = cli_arg {
            return p.to_path_buf();
        }
        if self.case_path.exists() {
            return self.case_path.clone();
        }
        for ext in &self.fallback_extensions {
            let candidate = self.case_path.with_extension(ext);
            if candidate.exists() {
                return candidate;
            }
        }
        self.case_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let cfg = Config::default();
        assert_eq!(cfg.assets_root, PathBuf::from("public"));
        assert_eq!(cfg.fallback_extensions, ["yml", "json"]);
    }

    #[test]
    fn toml_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("caselint.toml");
        fs::write(
            &path,
            "case_path = \"cases/pilot.yaml\"\nassets_root = \"static\"\n",
        )
        .unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.case_path, PathBuf::from("cases/pilot.yaml"));
        assert_eq!(cfg.assets_root, PathBuf::from("static"));
        // untouched field keeps its default
        assert_eq!(cfg.fallback_extensions, ["yml", "json"]);
    }

    #[test]
    fn explicit_config_must_exist() {
        assert!(Config::load(Some(Path::new("/no/such/caselint.toml"))).is_err());
    }

    #[test]
    fn cli_argument_wins_without_probing() {
        let cfg = Config::default();
        let picked = cfg.resolve_case_path(Some(Path::new("/tmp/whatever.yaml")));
        assert_eq!(picked, PathBuf::from("/tmp/whatever.yaml"));
    }

    #[test]
    fn probes_fallback_extensions_in_order() {
        let tmp = TempDir::new().unwrap();
        let json = tmp.path().join("case.json");
        fs::write(&json, "{}").unwrap();

        let cfg = Config {
            case_path: tmp.path().join("case.yaml"),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_case_path(None), json);
    }

    #[test]
    fn missing_everything_returns_primary_path() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config {
            case_path: tmp.path().join("case.yaml"),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_case_path(None), tmp.path().join("case.yaml"));
    }
}
