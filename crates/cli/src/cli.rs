use std::path::PathBuf;

use clap::Parser;

/// Security baseline generator.
///
/// Collects every rule carrying a keyword tag and writes a baseline YAML
/// file under the build directory. With `--tailor`, walks the rules
/// interactively and stores organization-defined values as custom rules.
#[derive(Parser, Debug)]
#[command(
    name = "hardening-cli",
    about = "Given a keyword tag, generate a baseline YAML file containing rules with the tag"
)]
pub struct CliArgs {
    /// Keyword tag to collect rules containing the tag
    #[arg(short, long, required_unless_present_any = ["list_tags", "controls"])]
    pub keyword: Option<String>,

    /// List the available keyword tags to search for
    #[arg(short, long)]
    pub list_tags: bool,

    /// Report 800-53 controls that no rule covers
    #[arg(short, long)]
    pub controls: bool,

    /// Control baseline level checked by --controls: low, moderate or high
    #[arg(long)]
    pub level: Option<String>,

    /// Customize the baseline to your organization's values
    #[arg(short, long)]
    pub tailor: bool,

    /// Path to config file (default: ~/.config/hardening-cli/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Project root holding rules/, custom/, includes/ and VERSION.yaml
    #[arg(long, env = "HARDENING_ROOT")]
    pub root: Option<PathBuf>,

    /// Base rules directory (default: <root>/rules)
    #[arg(long, env = "HARDENING_RULES_DIR")]
    pub rules_dir: Option<PathBuf>,

    /// Custom overlay directory (default: <root>/custom/rules)
    #[arg(long, env = "HARDENING_CUSTOM_DIR")]
    pub custom_dir: Option<PathBuf>,

    /// Includes directory with mscp-data.yaml and 800-53_baselines.yaml
    #[arg(long, env = "HARDENING_INCLUDES_DIR")]
    pub includes_dir: Option<PathBuf>,

    /// Output directory for generated baselines (default: <root>/build/baselines)
    #[arg(long, env = "HARDENING_BUILD_DIR")]
    pub build_dir: Option<PathBuf>,
}
