mod cli;
mod config;
mod terminal;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use tracing::{info, warn};

use hardening_rules::baseline::{append_authors, tailored_title, Baseline, ProjectData, VersionInfo};
use hardening_rules::benchmark::Benchmark;
use hardening_rules::controls::{missing_controls, ControlCatalog};
use hardening_rules::loader::{CorpusLoader, OverlayStore};
use hardening_rules::tags::{filter, tags_of};
use hardening_rules::tailoring::TailoringSession;

use crate::cli::CliArgs;
use crate::config::{CliConfig, ProjectPaths};
use crate::terminal::{ask_file_name, ask_text, Terminal};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let mut terminal = Terminal::new();

    // Load config
    let config = CliConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let paths = config.resolve_paths(&args)?;

    let loader = CorpusLoader::new(paths.rules_dir.clone(), paths.custom_dir.clone());
    let corpus = loader
        .load()
        .with_context(|| format!("failed to load rules from {}", paths.rules_dir.display()))?;
    let failures = corpus.failures().count();
    if failures > 0 {
        warn!(failures, "some rule documents were skipped");
        terminal.print_error(&format!(
            "{} rule document(s) could not be loaded; set RUST_LOG=warn for details",
            failures
        ))?;
    }

    if args.list_tags {
        terminal.print_tags(&tags_of(&corpus.rules))?;
        return Ok(());
    }

    if args.controls {
        let level = config.resolve_control_level(args.level.as_deref());
        let catalog = ControlCatalog::load(&paths.control_baselines())
            .context("failed to load 800-53 baselines")?;
        let Some(required) = catalog.level(&level) else {
            bail!("unknown control level '{}' (expected low, moderate or high)", level);
        };
        terminal.print_missing_controls(&level, &missing_controls(required, &corpus.rules))?;
        return Ok(());
    }

    let Some(keyword) = args.keyword.as_deref() else {
        bail!("a keyword is required");
    };

    let found = filter(&corpus.rules, keyword);
    if found.is_empty() {
        terminal.print_info("No rules found for the keyword provided. Available tags:")?;
        terminal.print_tags(&tags_of(&corpus.rules))?;
        return Ok(());
    }

    generate(&args, &paths, keyword, found, &mut terminal)
}

fn generate(
    args: &CliArgs,
    paths: &ProjectPaths,
    keyword: &str,
    rules: Vec<hardening_rules::schema::RuleRecord>,
    terminal: &mut Terminal,
) -> Result<()> {
    let project = ProjectData::load(&paths.project_data()).context("failed to load project data")?;
    let version = VersionInfo::load(&paths.version_file).context("failed to load version info")?;

    let benchmark = Benchmark::from_keyword(keyword);
    let authors = project.authors_for(keyword);
    let title = project.title_for(keyword, args.tailor);

    fs::create_dir_all(&paths.build_dir)
        .with_context(|| format!("failed to create {}", paths.build_dir.display()))?;

    let (file_name, rules, authors, tailored) = if args.tailor {
        let name = ask_file_name(
            terminal,
            &format!(
                "Enter a name for your tailored benchmark or press Enter for default ({}): ",
                keyword
            ),
            keyword,
        )?;
        let author_name = ask_text(terminal, "Enter your name: ", None)?;
        let author_org = ask_text(terminal, "Enter your organization: ", None)?;

        let store = OverlayStore::new(paths.custom_dir.clone());
        let outcome = TailoringSession::new(&store, terminal, benchmark.clone())
            .run(&rules)
            .context("tailoring session aborted")?;
        info!(
            included = outcome.included.len(),
            changes = outcome.changes.len(),
            "tailoring complete"
        );

        let tailored = tailored_title(keyword, &name);
        let authors = append_authors(&authors, &author_name, &author_org);
        (name, outcome.included, authors, Some(tailored))
    } else {
        (keyword.to_string(), rules, authors, None)
    };

    let baseline = Baseline::compose(
        &rules,
        &benchmark,
        &version,
        &authors,
        &title,
        tailored.as_deref(),
    );

    let output = paths.build_dir.join(format!("{}.yaml", file_name));
    fs::write(&output, baseline.render())
        .with_context(|| format!("failed to write baseline to {}", output.display()))?;
    info!(path = %output.display(), rules = rules.len(), "baseline written");
    terminal.print_info(&format!("Baseline written to {}", output.display()))?;
    Ok(())
}
