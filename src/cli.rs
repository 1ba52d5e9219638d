use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "caselint", version, about = "Integrity checker for mystery case files")]
pub struct Cli {
    /// Path to the case file (YAML or JSON). Defaults to the configured
    /// case path, probing fallback extensions when it does not exist.
    pub case: Option<PathBuf>,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, help = "Path to a caselint.toml configuration file")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Static asset root for avatar and room image checks")]
    pub assets_root: Option<PathBuf>,
}
