//! LabPlan - RF test-lab planner
//!
//! A CLI tool that runs the lab analysis pipeline over a machine
//! configuration, writes a planning report, and optionally pushes the
//! configuration to the lab agents.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, invalid options, report write, etc.)
//!   2 - Distribution ran and at least one agent did not accept the config

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use labplan::analysis::AnalysisPipeline;
use labplan::cli::{Args, OutputFormat};
use labplan::config::{Config, DEFAULT_CONFIG_FILE};
use labplan::distribute::{AgentFilter, ConfigDistributor, HttpAgentPusher};
use labplan::models::MachineConfig;
use labplan::report::{self, PlanReport, ReportMetadata};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is loaded first so its `verbose` setting can pick the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(&args));

    info!("LabPlan v{}", env!("CARGO_PKG_VERSION"));
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => warn!("No config file found, planning with built-in defaults"),
    }
    debug!("Arguments: {:?}", args);

    match run_plan(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Planning failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .labplan.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", DEFAULT_CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to describe your lab, bands and agents.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Run analysis, report and distribution. Returns exit code (0 or 2).
async fn run_plan(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let options = config.analysis_options();
    let identity = &config.machine.identity;
    if !args.quiet {
        println!("🔬 Planning lab: {} ({})", identity.name, identity.location);
    }

    let analysis = AnalysisPipeline::new()
        .run(&options)
        .context("Analysis pipeline failed")?;

    let machine = config.machine.with_bands(&analysis.bands);
    let filter = agent_filter(&args);

    let distribution = if args.dry_run {
        handle_dry_run(&machine, filter.as_ref());
        None
    } else if config.distribution.enabled {
        Some(distribute(&machine, filter.as_ref(), &config, args.quiet).await?)
    } else {
        None
    };

    let duration = start_time.elapsed().as_secs_f64();
    let report = PlanReport {
        metadata: ReportMetadata::for_machine(&machine.identity, duration),
        options,
        analysis,
        distribution,
    };

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    std::fs::write(&config.general.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.general.output))?;

    if !args.quiet {
        print_summary(&report);
        println!("\n✅ Plan complete! Report saved to: {}", config.general.output);
    }

    let failed = report.failed_agents();
    if failed > 0 {
        eprintln!(
            "\n⛔ {} agent(s) did not accept the config. Failing (exit code 2).",
            failed
        );
        return Ok(2);
    }

    Ok(0)
}

fn print_summary(report: &PlanReport) {
    let summary = &report.analysis.ports.summary;

    println!("\n📊 Plan Summary:");
    println!("   FDM bands: {}", report.analysis.fdm.bands.len());
    println!("   TDM/UXG scenarios: {}", report.analysis.tdm_uxg.channels.len());
    println!(
        "   Cooling: {:.2} tons hardware + {:.2} tons lab = {:.2} tons",
        summary.total_hw_cooling_tons,
        summary.lab_cooling_req_tons,
        summary.total_overall_cooling_req_tons
    );
    if let Some(ref results) = report.distribution {
        let delivered = results.values().filter(|ok| **ok).count();
        println!("   Agents: {}/{} delivered", delivered, results.len());
    }
}

fn agent_filter(args: &Args) -> Option<AgentFilter> {
    let filter = AgentFilter {
        ids: args.agents.clone().unwrap_or_default(),
        protocol: args.protocol.clone(),
    };
    (!filter.is_empty()).then_some(filter)
}

/// Handle --dry-run: list the agents that would receive the config.
fn handle_dry_run(machine: &MachineConfig, filter: Option<&AgentFilter>) {
    let targets = ConfigDistributor::targets(machine, filter);

    println!("\n🔍 Dry run: no config will be pushed.\n");
    if targets.is_empty() {
        println!("   No agents match.");
    } else {
        for agent in &targets {
            println!("     📡 {} [{}] {}", agent.id, agent.protocol, agent.endpoint);
        }
        println!("\n   Total: {} agents", targets.len());
    }
}

/// Push the populated machine config to the selected agents.
async fn distribute(
    machine: &MachineConfig,
    filter: Option<&AgentFilter>,
    config: &Config,
    quiet: bool,
) -> Result<BTreeMap<String, bool>> {
    let timeout = Duration::from_secs(config.distribution.timeout_seconds);
    let http = HttpAgentPusher::new(timeout).context("Failed to create HTTP client")?;

    let mut distributor = ConfigDistributor::new(vec![Box::new(http)]);
    if !quiet {
        println!("📡 Pushing config to agents...");
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} agents")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        distributor = distributor.with_progress(pb);
    }

    Ok(distributor.distribute(machine, filter).await)
}

/// Load configuration from file or use defaults.
///
/// Also returns the path the config came from, `None` for built-in defaults.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, Some(config_path.clone())));
    }

    // Try default location
    Ok(match Config::load_default()? {
        Some(config) => (config, Some(PathBuf::from(DEFAULT_CONFIG_FILE))),
        None => (Config::default(), None),
    })
}
