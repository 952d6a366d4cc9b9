//! Withle CLI - catalog loading and memorial proxies
//!
//! # Main Commands
//!
//! ```bash
//! withle serve                      # Start HTTP server (port 3000)
//! withle load data/detail_information.csv   # Load catalog, output JSON
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! withle parse data/file.csv        # Raw rows as JSON (encoding check)
//! withle chat "안녕"                 # One-shot persona chat
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use withle::catalog::{load_catalog, LoadOptions, Profile};
use withle::chat;
use withle::parser::{parse_line, resolve_encoding, split_rows};

#[derive(Parser)]
#[command(name = "withle")]
#[command(about = "Pet funeral home catalog backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog CSV and output normalized listings as JSON
    Load {
        /// Input CSV file
        input: PathBuf,

        /// Column profile: detail (curated sheet) or public (open data)
        #[arg(short, long, default_value = "detail")]
        profile: String,

        /// Fixed enrichment seed (reproducible output)
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and output raw rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send one message through the memorial chat persona
    Chat {
        /// The message to send
        message: String,

        /// Pet name for the persona prompt
        #[arg(long, default_value = chat::PET_NAME)]
        pet: String,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load {
            input,
            profile,
            seed,
            output,
        } => cmd_load(&input, &profile, seed, output.as_deref()),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Chat { message, pet } => cmd_chat(&message, &pet).await,

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_load(
    input: &Path,
    profile: &str,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = Profile::from_name(profile)
        .ok_or_else(|| format!("Unknown profile '{}' (expected detail|public)", profile))?;

    eprintln!("📄 Loading catalog: {}", input.display());
    let catalog = load_catalog(input, &LoadOptions { profile, seed })?;

    eprintln!("   Encoding: {}{}",
        catalog.info.encoding,
        if catalog.info.encoding_fallback { " (EUC-KR fallback)" } else { "" }
    );
    eprintln!("   Profile: {}", catalog.info.profile);
    eprintln!("   Columns: {}", catalog.info.headers.join(", "));
    eprintln!(
        "✅ {} listings ({} rows dropped)",
        catalog.homes.len(),
        catalog.info.dropped_rows
    );

    let json = serde_json::to_string_pretty(&catalog.homes)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let bytes = fs::read(input)?;
    let decoded = resolve_encoding(&bytes);
    eprintln!("   Encoding: {}", decoded.encoding);

    let rows: Vec<Vec<String>> = split_rows(&decoded.text)
        .into_iter()
        .map(parse_line)
        .collect();
    eprintln!("✅ Parsed {} rows", rows.len());

    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_chat(message: &str, pet: &str) -> Result<(), Box<dyn std::error::Error>> {
    let persona = chat::system_prompt(pet);
    let reply = chat::respond(message, Some(&persona)).await?;
    println!("{}", reply);
    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    withle::server::start_server(port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
