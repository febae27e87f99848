//! paper-podcast - Prepare paper text for summarization and podcast narration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docprep::text::{artifact_stem, summary_file_name};
use docprep::{
    BlockSequence, Pipeline, PrepConfig, PreparedDocument, SummaryStrategy, decode_page,
    extract_keywords, sanitize_filename, split_pages,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "paper-podcast")]
#[command(
    about = "Prepare paper text for summarization and podcast narration",
    long_about = "Strips the references section from extracted pages, splits the text into \
                  overlapping chunks for a summarizer, and formats summaries for text-to-speech"
)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prepare extracted page text for the summarizer (prints JSON)
    Prepare {
        /// Page text files in page order. A single file may hold all pages separated by form feeds.
        /// The summary file is named after the first one.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Submission strategy (default from config)
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Target chunk size in characters (default from config)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Overlap between chunks in characters (default from config)
        #[arg(long)]
        overlap: Option<usize>,

        /// Keep the references section
        #[arg(long)]
        keep_references: bool,
    },
    /// Format text for text-to-speech (prints JSON with text, slug and artifact name)
    Speech {
        /// Text file to format, or "-" for stdin
        input: PathBuf,
    },
    /// Print a filesystem-safe name for the given text
    Slug {
        /// Text to convert
        text: String,
    },
    /// List the most frequent keywords of a text file
    Keywords {
        /// Text file to analyse
        input: PathBuf,

        /// Maximum number of keywords
        #[arg(short, long, default_value_t = 10)]
        max: usize,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write the default configuration file if none exists
    Init,
    /// Set default chunk size
    SetChunkSize {
        /// Characters per chunk
        value: usize,
    },
    /// Set default overlap
    SetOverlap {
        /// Characters shared by consecutive chunks
        value: usize,
    },
    /// Set default submission strategy
    SetStrategy {
        #[arg(value_enum)]
        value: StrategyArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    /// Whole document in one submission
    Stuff,
    /// Chunk, summarize each, combine
    MapReduce,
}

impl From<StrategyArg> for SummaryStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Stuff => SummaryStrategy::Stuff,
            StrategyArg::MapReduce => SummaryStrategy::MapReduce,
        }
    }
}

/// JSON emitted by the `prepare` command.
#[derive(Serialize)]
struct PrepareReport {
    /// Where the summary of this document is stored
    summary_file: String,
    #[serde(flatten)]
    document: PreparedDocument,
}

impl PrepareReport {
    /// Name the summary after the first input file.
    fn new(files: &[PathBuf], document: PreparedDocument) -> Self {
        let stem = files
            .first()
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            summary_file: summary_file_name(&stem),
            document,
        }
    }
}

/// JSON emitted by the `speech` command.
#[derive(Serialize)]
struct SpeechReport {
    text: String,
    slug: String,
    artifact: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match &args.command {
        Commands::Prepare {
            files,
            strategy,
            chunk_size,
            overlap,
            keep_references,
        } => {
            let mut config = PrepConfig::load().context("Failed to load configuration")?;
            if let Some(size) = chunk_size {
                config.chunk_size = *size;
            }
            if let Some(overlap) = overlap {
                config.overlap = *overlap;
            }
            let strategy = strategy.map(SummaryStrategy::from).unwrap_or(config.strategy);
            handle_prepare(&config, files, strategy, !keep_references)
        }
        Commands::Speech { input } => handle_speech(input),
        Commands::Slug { text } => {
            println!("{}", sanitize_filename(text));
            Ok(())
        }
        Commands::Keywords { input, max } => {
            let text = read_text(input)?;
            for keyword in extract_keywords(&text, *max) {
                println!("{}", keyword);
            }
            Ok(())
        }
        Commands::Config { action } => handle_config_command(action),
    }
}

/// Initialize env_logger; RUST_LOG overrides the default level.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn handle_prepare(
    config: &PrepConfig,
    files: &[PathBuf],
    strategy: SummaryStrategy,
    remove_references: bool,
) -> Result<()> {
    let pipeline = Pipeline::new(config).context("Invalid preparation settings")?;
    let blocks = read_pages(files)?;

    debug!(
        "Read {} page(s) from {} file(s)",
        blocks.len(),
        files.len()
    );

    let document = pipeline.prepare(blocks, strategy, remove_references);

    if remove_references && !document.references_removed {
        warn!("No references section found; using the full text");
    }

    let report = PrepareReport::new(files, document);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn handle_speech(input: &Path) -> Result<()> {
    let config = PrepConfig::load().context("Failed to load configuration")?;
    let pipeline = Pipeline::new(&config).context("Invalid speech settings")?;

    let text = read_text(input)?;
    let output = pipeline.speech(&text);

    let report = SpeechReport {
        artifact: artifact_stem(&text, chrono::Local::now().naive_local()),
        text: output.text,
        slug: output.slug,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Read page files in order, decoding each as UTF-8.
fn read_pages(files: &[PathBuf]) -> Result<BlockSequence> {
    let mut blocks = BlockSequence::new();

    for path in files {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let page = decode_page(bytes, &path.display().to_string())?;

        // A single pdftotext-style dump carries its pages separated by form feeds
        if files.len() == 1 && page.content.contains('\x0c') {
            let pages = split_pages(&page.content);
            info!("Split {} into {} page(s)", path.display(), pages.len());
            blocks.extend(pages);
        } else {
            blocks.push(page);
        }
    }

    Ok(blocks)
}

/// Read a UTF-8 text file, or stdin when the path is "-".
fn read_text(input: &Path) -> Result<String> {
    let bytes = if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?
    };

    let page = decode_page(bytes, &input.display().to_string())?;
    Ok(page.content)
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = PrepConfig::load()?;
            let path = PrepConfig::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            let path = PrepConfig::config_path()?;
            if path.exists() {
                println!("Config already exists: {}", path.display());
            } else {
                PrepConfig::default().save()?;
                println!("Wrote default config to {}", path.display());
            }
        }
        ConfigAction::SetChunkSize { value } => {
            let mut config = PrepConfig::load()?;
            config.chunk_size = *value;
            config.validate()?;
            config.save()?;
            println!("Default chunk size set to: {}", value);
        }
        ConfigAction::SetOverlap { value } => {
            let mut config = PrepConfig::load()?;
            config.overlap = *value;
            config.validate()?;
            config.save()?;
            println!("Default overlap set to: {}", value);
        }
        ConfigAction::SetStrategy { value } => {
            let mut config = PrepConfig::load()?;
            config.strategy = (*value).into();
            config.save()?;
            println!("Default strategy set to: {:?}", config.strategy);
        }
    }
    Ok(())
}
