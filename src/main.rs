//! ActionLens - AI-powered action items from tabular business data
//!
//! A CLI tool that loads CSV/TSV datasets, computes descriptive
//! analytics (summary, KPIs, trends) and uses an LLM to synthesize
//! prioritized business action items.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (load, config, backend failure, etc.)

mod analytics;
mod cli;
mod config;
mod dataset;
mod error;
mod llm;
mod models;
mod report;
mod synth;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::ProgressBar;
use models::{AnalysisReport, Priority, ReportMetadata};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading flags (OPENAI_API_KEY, OLLAMA_URL)
    dotenv::dotenv().ok();

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

    // Initialize logging
    init_logging(&args);

    info!("ActionLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    if let Err(e) = run_analysis(args).await {
        error!("Analysis failed: {}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .actionlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".actionlens.toml");

    if path.exists() {
        eprintln!("⚠️  .actionlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .actionlens.toml")?;

    println!("✅ Created .actionlens.toml with default settings.");
    println!("   Edit it to customize model, backend, report sections, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow.
async fn run_analysis(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let dataset_path = args.dataset_path().to_path_buf();

    // Step 1: Load the dataset
    println!("📂 Loading dataset: {}", dataset_path.display());
    let load_options = dataset::LoadOptions::from(&config.loader);
    let dataset = dataset::load_dataset(&dataset_path, &load_options)?;
    info!(
        "Loaded {} rows x {} columns",
        dataset.row_count(),
        dataset.column_count()
    );

    // Step 2: Compute analytics
    println!("🔬 Computing analytics...");
    let engine = analytics::AnalyticsEngine::new();
    let analytics = engine.analyze(&dataset, config.loader.preview_rows);

    // Step 3: Synthesize action items (unless --no-actions)
    let (action_plan, model_used) = if args.no_actions {
        println!("⏭️  Skipping action synthesis (--no-actions)");
        (None, "none".to_string())
    } else {
        println!("🤖 Synthesizing action items...");
        println!("   Model: {}", config.model.name);
        println!("   Backend: {}", config.model.backend);
        println!("   Timeout: {}s", config.model.timeout_seconds);

        let client = llm::build_client(&config.model)?;
        let synthesizer = synth::ActionSynthesizer::new(client);
        let model_used = synthesizer.model().to_string();

        let spinner = make_spinner(args.quiet);
        let plan = synthesizer.synthesize(&analytics, &args.context).await;
        spinner.finish_and_clear();

        if let Some(ref note) = plan.note {
            println!("⚠️  {}", note);
        }

        (Some(plan), model_used)
    };

    // Step 4: Build the report
    println!("\n📝 Generating report...");

    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        source_file: dataset_path.display().to_string(),
        generated_at: Utc::now(),
        model_used,
        rows: analytics.summary.rows,
        columns: analytics.summary.columns,
        duration_seconds: duration,
    };

    let analysis_report = AnalysisReport {
        metadata,
        analytics,
        action_plan,
    };

    // Step 5: Render and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&analysis_report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&analysis_report, &config.report)
        }
    };

    let output_path = std::path::Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Analysis Summary:");
    println!(
        "   Rows: {} | Columns: {}",
        analysis_report.metadata.rows, analysis_report.metadata.columns
    );
    if let Some(ref plan) = analysis_report.action_plan {
        println!("   Action items: {}", plan.action_items.len());
        println!(
            "   - 🔴 High: {} | 🟡 Medium: {} | 🟢 Low: {}",
            plan.priority_count(Priority::High),
            plan.priority_count(Priority::Medium),
            plan.priority_count(Priority::Low)
        );
    }
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Create a progress spinner for the synthesis wait, hidden in quiet mode.
fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Waiting for the model...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .actionlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
