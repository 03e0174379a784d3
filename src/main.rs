use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, KeyEncoding};
use core_types::{SignedRequest, SigningInput};
use request_signer::{
    RequestSigner, SIGNATURE_HEADER, SigningKey, TIMESTAMP_HEADER, canonical_message,
    normalize_path,
};
use std::path::PathBuf;

/// The main entry point for the Wallasign command-line tool.
fn main() -> Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    if let Some(encoding) = cli.key_encoding {
        config.signing.key_encoding = encoding;
    }

    // Held until exit so buffered file logs get flushed.
    let _log_guard = configuration::init_tracing(&config.logging)
        .context("Failed to initialise logging")?;
    tracing::debug!(key_encoding = ?config.signing.key_encoding, "Configuration loaded.");

    // Execute the appropriate command
    match cli.command {
        Commands::Sign(args) => handle_sign(args, &config),
        Commands::Verify(args) => handle_verify(args, &config),
        Commands::Message(args) => {
            println!("{}", handle_message(&args));
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Signs marketplace API requests with the web client's HMAC-SHA256 scheme.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `signing.key_encoding` from the configuration.
    #[arg(long, global = true, value_enum)]
    key_encoding: Option<KeyEncoding>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a request and print its signature headers.
    Sign(SignArgs),
    /// Check a signature against a request.
    Verify(VerifyArgs),
    /// Print the canonical message a request is signed over.
    Message(MessageArgs),
}

#[derive(Parser)]
struct SignArgs {
    /// The request path, with or without a query string (e.g., "/api/v3/general/search").
    #[arg(long)]
    url: String,

    /// The HTTP method, used exactly as given (e.g., "GET").
    #[arg(long)]
    method: String,

    /// Milliseconds since the Unix epoch. Defaults to now.
    #[arg(long)]
    timestamp: Option<u64>,

    /// Print the signed request as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct VerifyArgs {
    #[arg(long)]
    url: String,

    #[arg(long)]
    method: String,

    /// The timestamp the signature was computed for, in milliseconds.
    #[arg(long)]
    timestamp: u64,

    /// The base64 signature to check.
    #[arg(long)]
    signature: String,
}

#[derive(Parser)]
struct MessageArgs {
    #[arg(long)]
    url: String,

    #[arg(long)]
    method: String,

    #[arg(long)]
    timestamp: u64,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn build_signer(config: &Config) -> Result<RequestSigner> {
    let key = SigningKey::from_settings(&config.signing)
        .context("Invalid signing key")?;
    Ok(RequestSigner::new(key))
}

/// The handler for the `sign` command.
fn handle_sign(args: SignArgs, config: &Config) -> Result<()> {
    let signer = build_signer(config)?;

    let input = match args.timestamp {
        Some(timestamp_ms) => SigningInput::new(args.url, args.method, timestamp_ms),
        None => SigningInput::now(args.url, args.method)?,
    };
    let signed = signer.sign_input(&input);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&signed)?);
    } else {
        println!("{}", render_table(&signed));
    }

    Ok(())
}

/// The handler for the `verify` command.
fn handle_verify(args: VerifyArgs, config: &Config) -> Result<()> {
    let signer = build_signer(config)?;

    signer
        .verify(&args.url, &args.method, args.timestamp, &args.signature)
        .with_context(|| {
            format!(
                "Verification failed for {} {} at {}",
                args.method, args.url, args.timestamp
            )
        })?;

    println!("Signature OK");
    Ok(())
}

/// The handler for the `message` command. Needs no key.
fn handle_message(args: &MessageArgs) -> String {
    canonical_message(&args.method, normalize_path(&args.url), args.timestamp)
}

fn render_table(signed: &SignedRequest) -> Table {
    let timestamp = signed.timestamp_ms.to_string();
    let rows = [
        ("Method", signed.method.as_str()),
        ("Signed path", signed.path.as_str()),
        ("Message", signed.message.as_str()),
        (SIGNATURE_HEADER, signed.signature.as_str()),
        (TIMESTAMP_HEADER, timestamp.as_str()),
    ];

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![field, value]);
    }
    table
}
