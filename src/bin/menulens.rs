//! CLI binary for menulens.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and prints the analyzed menu.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use menulens::{analyze_menu_file, format_krw, AnalysisConfig, MenuItem};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a menu photo (card output to stdout)
  menulens menu.jpg

  # JSON output for scripting
  menulens --json menu.jpg > menu.json

  # Write the JSON result to a file
  menulens menu.jpg -o menu.json

  # Convert prices into a different currency
  menulens --target USD menu.jpg

  # Use a specific model
  menulens --model gemini-2.5-pro menu.jpg

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        Google Gemini API key (required)
  MENULENS_MODEL        Override the vision model ID
  MENULENS_TARGET       Override the target currency code

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Analyze:       menulens menu.jpg
"#;

/// Analyze a restaurant menu photo with a Vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "menulens",
    version,
    about = "Read a menu photo with a Vision LLM: Korean names, descriptions, converted prices",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the menu photo (JPEG, PNG, WebP, …).
    input: PathBuf,

    /// Write the JSON result to this file instead of stdout.
    #[arg(short, long, env = "MENULENS_OUTPUT")]
    output: Option<PathBuf>,

    /// Gemini API key; falls back to the GEMINI_API_KEY variable.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Vision model ID.
    #[arg(long, env = "MENULENS_MODEL", default_value = "gemini-2.5-flash")]
    model: String,

    /// 3-letter currency code prices are converted into.
    #[arg(long, env = "MENULENS_TARGET", default_value = "KRW")]
    target: String,

    /// Per-HTTP-call timeout in seconds.
    #[arg(long, env = "MENULENS_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Cap on concurrent rate lookups.
    #[arg(short, long, env = "MENULENS_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Output structured JSON instead of the card view.
    #[arg(long, env = "MENULENS_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "MENULENS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MENULENS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "MENULENS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Run analysis ─────────────────────────────────────────────────────
    let show_spinner = !cli.quiet && !cli.no_progress && !cli.json;
    let spinner = show_spinner.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Reading {}…", cli.input.display()));
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = analyze_menu_file(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let items = result.context("Menu analysis failed")?;

    // ── Output ───────────────────────────────────────────────────────────
    if let Some(ref path) = cli.output {
        let json = serde_json::to_string_pretty(&items).context("Failed to serialize result")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{} {} items → {}",
                green("✔"),
                items.len(),
                bold(&path.display().to_string())
            );
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(&items).context("Failed to serialize result")?;
        println!("{json}");
    } else {
        print_cards(&items, &config.target_currency)?;
        if !cli.quiet {
            eprintln!("{} {} items", green("✔"), items.len());
        }
    }

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .model(cli.model.clone())
        .target_currency(cli.target.to_ascii_uppercase())
        .api_timeout_secs(cli.api_timeout)
        .concurrency(cli.concurrency);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Card-style terminal rendering, one block per dish.
fn print_cards(items: &[MenuItem], target: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if items.is_empty() {
        writeln!(out, "{}", dim("No menu items recognised in this photo."))?;
        return Ok(());
    }

    for item in items {
        writeln!(out, "{}  {}", bold(&item.korean_name), dim(&item.name))?;
        if !item.description.is_empty() {
            writeln!(out, "  {}", item.description)?;
        }
        match (item.price, item.converted_price) {
            (Some(price), Some(converted)) => {
                let original = match item.currency.as_deref() {
                    Some(code) => format!("{price} {code}"),
                    None => price.to_string(),
                };
                let converted = if target == "KRW" {
                    format_krw(converted)
                } else {
                    format!("{converted} {target}")
                };
                writeln!(out, "  {}  {}", cyan(&converted), dim(&format!("({original})")))?;
            }
            (Some(price), None) => {
                let original = match item.currency.as_deref() {
                    Some(code) => format!("{price} {code}"),
                    None => price.to_string(),
                };
                writeln!(out, "  {}", cyan(&original))?;
            }
            (None, _) => {}
        }
        writeln!(out)?;
    }

    Ok(())
}
