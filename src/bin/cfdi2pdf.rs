//! CLI binary for redoc-cfdi2pdf.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to a `ClientConfig` + `ConversionOptions`, runs one conversion
//! and writes the PDF.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use redoc_cfdi2pdf::{
    ClientConfig, ConversionOptions, ConversionResult, RedocClient, Substitutions,
    DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes factura.pdf next to the XML)
  cfdi2pdf factura.xml

  # Choose the output path and a rendering style
  cfdi2pdf factura.xml -o out/factura.pdf --style-pdf modern

  # Attach an addenda with placeholder substitutions (applied in order)
  cfdi2pdf factura.xml --addenda addenda.xml \
      --replace '{{ORDEN}}=PO-1024' --replace '{{PROVEEDOR}}=4411'

  # Read the CFDI from stdin and print metadata as JSON
  cat factura.xml | cfdi2pdf - -o factura.pdf --json

ENVIRONMENT VARIABLES:
  REDOC_API_KEY   API key sent as X-Redoc-Api-Key
  REDOC_API_URL   Conversion endpoint (default https://api.redoc.mx/cfdis/convert)
  RUST_LOG        Log filter, overrides --verbose/--quiet
"#;

/// Convert CFDI XML invoices to PDF using the redoc.mx API.
#[derive(Parser, Debug)]
#[command(
    name = "cfdi2pdf",
    version,
    about = "Convert CFDI XML invoices to PDF using the redoc.mx API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// CFDI XML file path, or `-` to read from stdin.
    input: String,

    /// Write the PDF here. Default: input with a .pdf extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// redoc.mx API key.
    #[arg(long, env = "REDOC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Conversion endpoint URL.
    #[arg(long, env = "REDOC_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Rendering style selector passed to the service.
    #[arg(long)]
    style_pdf: Option<String>,

    /// Addenda XML fragment to attach.
    #[arg(long)]
    addenda: Option<PathBuf>,

    /// Addenda substitution KEY=VALUE; repeatable, applied in order.
    #[arg(long = "replace", value_name = "KEY=VALUE", value_parser = parse_key_val, requires = "addenda")]
    replacements: Vec<(String, String)>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Print result metadata as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client and document ────────────────────────────────────────
    let config = ClientConfig::builder(cli.api_key.clone())
        .base_url(cli.api_url.clone())
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;
    let client = RedocClient::from_config(config).context("Failed to create client")?;

    let mut cfdi = if cli.input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read CFDI from stdin")?;
        client.cfdi().from_bytes(buf)
    } else {
        client.cfdi().from_file(&cli.input)
    };

    if let Some(ref path) = cli.addenda {
        let substitutions = if cli.replacements.is_empty() {
            None
        } else {
            Some(cli.replacements.iter().cloned().collect::<Substitutions>())
        };
        cfdi.set_addenda_with(client.addenda().from_file(path), substitutions);
    }

    let options = ConversionOptions {
        style_pdf: cli.style_pdf.clone(),
        addenda: None,
    };
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));

    // ── Run conversion ───────────────────────────────────────────────────
    let spinner = show_progress.then(|| spinner(&cli.input));
    let outcome = cfdi.to_pdf_file(&output_path, &options);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let result = outcome.context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_summary(&result, &output_path))
                .context("Failed to serialise metadata")?
        );
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}  {} pages  {}ms  →  {}",
            green("✔"),
            result.total_pages(),
            result.total_time_ms(),
            bold(&output_path.display().to_string()),
        );
        eprintln!("   {}", dim(&format!("transaction {}", result.transaction_id())));
    }

    Ok(())
}

fn spinner(input: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Converting");
    bar.set_message(if input == "-" { "stdin".to_string() } else { input.to_string() });
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn json_summary(result: &ConversionResult, output: &Path) -> serde_json::Value {
    serde_json::json!({
        "output": output.display().to_string(),
        "bytes": result.payload().len(),
        "transaction_id": result.transaction_id(),
        "total_pages": result.total_pages(),
        "total_time_ms": result.total_time_ms(),
        "metadata": result.metadata(),
    })
}

/// `input.xml` → `input.pdf`; stdin → `document.pdf`.
fn default_output(input: &str) -> PathBuf {
    if input == "-" {
        PathBuf::from("document.pdf")
    } else {
        Path::new(input).with_extension("pdf")
    }
}

/// Parse `--replace KEY=VALUE`. Only the first `=` splits; keys may not be empty.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
