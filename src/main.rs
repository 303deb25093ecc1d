//! charcard CLI - command-line tool for character cards embedded in PNGs.
//!
//! This is the main entry point for the charcard command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use charcard::prelude::*;

/// charcard - read and embed character cards in PNG images
#[derive(Parser)]
#[command(name = "charcard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    scan: ScanArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScanArgs {
    /// Skip tEXt chunks whose CRC does not match
    #[arg(long, global = true, env = "CHARCARD_VERIFY_CRC", value_parser = FalseyValueParser::new())]
    verify_crc: bool,

    /// Try later chunks with the same keyword when a payload fails to decode
    #[arg(
        long,
        global = true,
        env = "CHARCARD_RETRY_AFTER_DECODE_FAILURE",
        value_parser = FalseyValueParser::new()
    )]
    retry_after_decode_failure: bool,
}

impl ScanArgs {
    fn options(&self) -> ScanOptions {
        ScanOptions::default()
            .with_crc_check(self.verify_crc)
            .with_retry_after_decode_failure(self.retry_after_decode_failure)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the embedded card as JSON
    Extract {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Which card to look for
        #[arg(short, long, value_enum, default_value_t = CardKind::Any)]
        card: CardKind,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a V3 card split into summary fields and data
    Split {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Also write the data object to this file
        #[arg(short, long)]
        data_out: Option<PathBuf>,
    },

    /// List the chunks of a PNG file
    Chunks {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Embed a card JSON file into a PNG
    Embed {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Card JSON file
        #[arg(short = 'j', long)]
        card_json: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Convention to embed under
        #[arg(short, long, value_enum, default_value_t = CardKind::V3)]
        card: CardKind,
    },

    /// Report which PNGs under a directory carry cards
    Scan {
        /// Directory to search recursively
        #[arg(short, long, env = "CHARCARD_SCAN_DIR")]
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CardKind {
    V2,
    V3,
    Any,
}

impl CardKind {
    fn version(self) -> Option<CardVersion> {
        match self {
            CardKind::V2 => Some(CardVersion::V2),
            CardKind::V3 => Some(CardVersion::V3),
            CardKind::Any => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.scan.options();

    match cli.command {
        Commands::Extract { input, card, output } => {
            cmd_extract(&input, card, output.as_deref(), &options)?;
        }
        Commands::Split { input, data_out } => {
            cmd_split(&input, data_out.as_deref(), &options)?;
        }
        Commands::Chunks { input } => {
            cmd_chunks(&input, options.verify_crc)?;
        }
        Commands::Embed {
            input,
            card_json,
            output,
            card,
        } => {
            cmd_embed(&input, &card_json, &output, card)?;
        }
        Commands::Scan { dir } => {
            cmd_scan(&dir, &options)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_extract(
    input: &Path,
    kind: CardKind,
    output: Option<&Path>,
    options: &ScanOptions,
) -> Result<()> {
    let card = match kind.version() {
        Some(version) => read_card_with(input, version, options)
            .context("Failed to read PNG file")?
            .map(|document| Card { version, document }),
        None => read_any(input, options).context("Failed to read PNG file")?,
    };

    let Some(card) = card else {
        anyhow::bail!("No character card found in {}", input.display());
    };

    info!(version = %card.version, "found character card");
    let json = serde_json::to_string_pretty(&card.document)?;

    match output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output file")?;
            eprintln!("Character card ({}) saved to {}", card.version, path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_split(input: &Path, data_out: Option<&Path>, options: &ScanOptions) -> Result<()> {
    let document = read_card_with(input, CardVersion::V3, options)
        .context("Failed to read PNG file")?
        .with_context(|| format!("No V3 character card found in {}", input.display()))?;

    let (summary, data) = partition_v3_keys(&document).into_parts();

    println!("Summary:");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("\nData:");
    println!("{}", serde_json::to_string_pretty(&data)?);

    if let Some(path) = data_out {
        if data.as_object().is_some_and(|fields| fields.is_empty()) {
            warn!("card has no data object, writing {{}}");
        }
        fs::write(path, serde_json::to_string_pretty(&data)?)
            .context("Failed to write data file")?;
        eprintln!("Data exported to {}", path.display());
    }

    Ok(())
}

fn cmd_chunks(input: &Path, verify_crc: bool) -> Result<()> {
    let mut reader = ChunkReader::open(input).context("Failed to open PNG file")?;

    let mut count = 0;
    let mut bad_crcs = 0;
    while let Some(chunk) = reader.next_chunk().context("Failed to read chunk")? {
        let crc_ok = chunk.crc_matches();
        if !crc_ok {
            bad_crcs += 1;
        }

        let detail = match chunk.chunk_type() {
            ChunkType::IHDR => ImageHeader::parse(chunk.data())
                .map(|header| header.to_string())
                .unwrap_or_else(|e| e.to_string()),
            ChunkType::TEXT => match TextChunk::parse(chunk.data()) {
                Ok(text) => {
                    let marker = CardVersion::from_keyword(text.keyword())
                        .map(|version| format!(" [{} card]", version))
                        .unwrap_or_default();
                    format!("{} ({} bytes){}", text.keyword(), text.text().len(), marker)
                }
                Err(e) => format!("malformed: {}", e),
            },
            _ => String::new(),
        };

        println!(
            "{:<6} {:>10} {:08x} {} {}",
            chunk.chunk_type().to_string(),
            chunk.data().len(),
            chunk.declared_crc(),
            if crc_ok { "ok " } else { "BAD" },
            detail
        );
        count += 1;
    }

    println!("\nTotal: {} chunks ({} bad CRC)", count, bad_crcs);

    if verify_crc && bad_crcs > 0 {
        anyhow::bail!("{} chunk(s) failed CRC verification", bad_crcs);
    }

    Ok(())
}

fn cmd_embed(input: &Path, card_json: &Path, output: &Path, kind: CardKind) -> Result<()> {
    let version = kind
        .version()
        .context("Choose v2 or v3 when embedding a card")?;

    let png = fs::read(input).context("Failed to read input PNG")?;
    let json = fs::read(card_json).context("Failed to read card JSON")?;
    let document: Value = serde_json::from_slice(&json).context("Card file is not valid JSON")?;

    let embedded = embed_card(&png, version, &document).context("Failed to embed card")?;
    fs::write(output, embedded).context("Failed to write output PNG")?;

    println!(
        "Embedded {} card into {} -> {}",
        version,
        input.display(),
        output.display()
    );

    Ok(())
}

fn cmd_scan(dir: &Path, options: &ScanOptions) -> Result<()> {
    let paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_png(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    println!("Scanning {} PNG files under {}...", paths.len(), dir.display());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(PathBuf, charcard::card::Result<Option<Card>>)> = paths
        .into_par_iter()
        .map(|path| {
            let result = read_any(&path, options);
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let total = results.len();
    let mut v2 = 0;
    let mut v3 = 0;
    let mut errors = 0;
    for (path, result) in results {
        match result {
            Ok(Some(card)) => {
                match card.version {
                    CardVersion::V2 => v2 += 1,
                    CardVersion::V3 => v3 += 1,
                }
                println!(
                    "{}  {}  {}",
                    card.version,
                    path.display(),
                    card_name(&card).unwrap_or("<unnamed>")
                );
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error: {:#}", anyhow::Error::new(e));
                errors += 1;
            }
        }
    }

    println!(
        "\nScanned {} files in {:?}: {} V3, {} V2, {} without card ({} errors)",
        total,
        start.elapsed(),
        v3,
        v2,
        total - v2 - v3 - errors,
        errors
    );

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// V3 cards keep the name under `data`, V2 cards at the top level.
fn card_name(card: &Card) -> Option<&str> {
    card.document
        .pointer("/data/name")
        .or_else(|| card.document.get("name"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> ScanOptions {
        let mut argv = vec!["charcard", "chunks", "-i", "card.png"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().scan.options()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    // One test owns both variables so parallel tests never see them change.
    #[test]
    fn test_scan_flags_from_env() {
        for value in ["1", "true", "yes", "on"] {
            std::env::set_var("CHARCARD_VERIFY_CRC", value);
            assert!(parse(&[]).verify_crc, "{}", value);
        }
        for value in ["0", "false", "no", "off", ""] {
            std::env::set_var("CHARCARD_VERIFY_CRC", value);
            assert!(!parse(&[]).verify_crc, "{:?}", value);
        }
        std::env::remove_var("CHARCARD_VERIFY_CRC");
        assert!(!parse(&[]).verify_crc);
        assert!(parse(&["--verify-crc"]).verify_crc);

        std::env::set_var("CHARCARD_RETRY_AFTER_DECODE_FAILURE", "1");
        let options = parse(&[]);
        std::env::remove_var("CHARCARD_RETRY_AFTER_DECODE_FAILURE");
        assert!(options.retry_after_decode_failure);
        assert!(!options.verify_crc);
        assert!(parse(&["--retry-after-decode-failure"]).retry_after_decode_failure);
    }
}
