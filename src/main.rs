use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iocraft::prelude::*;

use replay_board::app::App;
use replay_board::color::ColorDepth;
use replay_board::config::loader;
use replay_board::config::types::AppConfig;
use replay_board::engine::{Engine, EngineHandle, Event, GitHubEngine, Request, StubEngine};
use replay_board::filter::FilterSpec;
use replay_board::github::parse::parse_issues;
use replay_board::list::write_listing;
use replay_board::query::{Endpoint, parse_query};
use replay_board::summary::IssueSummary;
use replay_board::theme::Palette;
use replay_board::types::{IssueState, RepoRef};

#[derive(Parser)]
#[command(
    name = "replay-board",
    version,
    about = "Browse GitHub issues that carry a replay"
)]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    /// Only show issues from this organization.
    #[arg(long)]
    org: Option<String>,

    /// Only show issues from this repository (`name` or `owner/name`).
    #[arg(long)]
    repo: Option<String>,

    /// Required label; repeat for several. Replaces the configured labels.
    #[arg(short, long = "label", value_name = "LABEL")]
    labels: Vec<String>,

    /// Show closed issues instead of open ones.
    #[arg(long)]
    closed: bool,

    /// Fetch from a server exposing `/api/search` and `/api/issues`.
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Serve issues from a JSON file instead of the network.
    #[arg(long, value_name = "PATH")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Query string or page URL carrying `org` / `repo` parameters.
    #[arg(value_name = "QUERY")]
    query: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the matching issues and exit.
    List,
}

/// Initial filters: config defaults, then the query string, then flags.
fn initial_filters(cli: &Cli, config: &AppConfig) -> Result<FilterSpec> {
    let mut spec = config.defaults.initial_filters();

    if let Some(ref query) = cli.query {
        let params = parse_query(query).with_context(|| format!("parsing query {query:?}"))?;
        spec = spec.with_query(&params);
    }

    if !cli.labels.is_empty() {
        spec = FilterSpec::new(cli.labels.iter().cloned(), &spec.org, &spec.repo, spec.state);
    }
    if cli.closed {
        spec = spec.toggle_issue_state(IssueState::Closed);
    }
    if let Some(ref org) = cli.org {
        spec = spec.toggle_repo(&spec.repo, org);
    }
    if let Some(ref repo) = cli.repo {
        spec = match repo.split_once('/') {
            Some(_) => {
                let parsed = RepoRef::from_full_name(repo)
                    .with_context(|| format!("invalid --repo {repo:?}: expected owner/name"))?;
                spec.toggle_repo(&parsed.name, &parsed.owner)
            }
            None => spec.toggle_repo(repo, &spec.org),
        };
    }
    Ok(spec)
}

fn load_fixture(path: &Path) -> Result<StubEngine> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing JSON from {}", path.display()))?;
    Ok(StubEngine {
        issues: parse_issues(values),
        fail_with: None,
    })
}

/// Fetch once and print the filtered issues.
fn run_list(engine: &EngineHandle, spec: &FilterSpec, config: &AppConfig) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    engine.send(Request::FetchIssues {
        endpoint: Endpoint::for_filters(spec),
        filters: spec.clone(),
        force: false,
        reply_tx: tx,
    });
    match rx.recv().context("engine stopped before replying")? {
        Event::IssuesFetched { issues, .. } => {
            let matching = spec.apply(&issues);
            let summary = IssueSummary::build(&matching, spec);
            let mut out = std::io::stdout().lock();
            write_listing(&mut out, &matching, &summary, &config.defaults.date_format)?;
            out.flush()?;
            Ok(())
        }
        Event::FetchError { context, message } => {
            anyhow::bail!("failed to load ({context}): {message}")
        }
    }
}

fn main() -> Result<()> {
    // Install a panic hook that writes to a file, since the fullscreen TUI
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Load config.
    let mut config = loader::load_config(cli.config.as_deref())?;
    if let Some(ref base) = cli.api_base {
        config.source.api_base = Some(base.clone());
    }
    let filters = initial_filters(&cli, &config)?;

    // Install the rustls CryptoProvider before any TLS client is constructed.
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install default CryptoProvider"))?;

    // Dropping `engine_handle` at the end of `main` closes the sender
    // channel, signalling the engine to shut down.
    let (engine_handle, source_label) = match cli.fixture {
        Some(ref path) => (
            load_fixture(path)?.start(),
            format!("fixture {}", path.display()),
        ),
        None => {
            let label = config
                .source
                .api_base
                .clone()
                .unwrap_or_else(|| config.source.host.clone());
            (GitHubEngine::new(config.clone()).start(), label)
        }
    };

    tracing::info!(source = %source_label, ?filters, "replay-board starting");

    if matches!(cli.command, Some(Commands::List)) {
        return run_list(&engine_handle, &filters, &config);
    }

    let palette = Palette::resolve(&config.theme, ColorDepth::detect());

    // Enter fullscreen TUI (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(
                config: &config,
                engine: &engine_handle,
                palette: &palette,
                initial_filters: &filters,
                source_label: source_label.as_str(),
            )
        }
        .fullscreen(),
    )?;

    Ok(())
}
