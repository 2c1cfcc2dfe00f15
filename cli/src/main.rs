//! pdfcontext CLI - extract and query PDF paragraphs, images and tables

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfcontext::{ContentKind, ExtractedDocument, Extraction, JsonFormat, Pdfcontext};

const DEFAULT_INPUT: &str = "example.pdf";
const DEFAULT_QUERY: &str = "a loop where you know the number of times it will run";

#[derive(Parser)]
#[command(name = "pdfcontext")]
#[command(version)]
#[command(about = "Extract PDF paragraphs, images and tables, described by nearby text", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract content and print the sectioned report (or JSON)
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the whole result as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON (with --json)
        #[arg(long, requires = "json")]
        compact: bool,

        /// Search sorted paragraph bottoms when describing images and tables
        #[arg(long)]
        sorted_bottoms: bool,

        /// Header/footer band as a fraction of page height
        #[arg(long, value_name = "RATIO", default_value_t = 0.05)]
        margin: f32,

        /// Skip images and tables
        #[arg(long)]
        text_only: bool,

        /// Extract pages in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Index the document and print the best match for a query
    Query {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Which collection to search
        #[arg(short, long, value_enum, default_value = "txt")]
        kind: KindArg,

        /// Query text
        #[arg(value_name = "QUERY", default_value = DEFAULT_QUERY)]
        query: String,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum KindArg {
    /// Text paragraphs
    Txt,
    /// Images, searched by description
    Img,
    /// Tables, searched by description
    Tbl,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Txt => ContentKind::Text,
            KindArg::Img => ContentKind::Image,
            KindArg::Tbl => ContentKind::Table,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            json,
            compact,
            sorted_bottoms,
            margin,
            text_only,
            parallel,
        }) => {
            let mut builder = Pdfcontext::new().with_margin_ratio(margin);
            if sorted_bottoms {
                builder = builder.sorted_bottoms();
            }
            if text_only {
                builder = builder.text_only();
            }
            if parallel {
                builder = builder.parallel();
            }
            let format = match (json, compact) {
                (false, _) => None,
                (true, false) => Some(JsonFormat::Pretty),
                (true, true) => Some(JsonFormat::Compact),
            };
            cmd_extract(&input, output.as_deref(), builder, format)
        }
        Some(Commands::Query { input, kind, query }) => cmd_query(&input, kind.into(), &query),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
            cmd_extract(&input, None, Pdfcontext::new(), None)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Extract with a spinner on stderr.
fn extract_with_spinner(
    input: &Path,
    builder: Pdfcontext,
) -> Result<Extraction, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", input.display()));

    let result = builder.extract(input);
    pb.finish_and_clear();

    let extraction = result?;
    log::info!(
        "{}: {} paragraphs, {} images, {} tables",
        input.display(),
        extraction.document.texts.len(),
        extraction.document.images.len(),
        extraction.document.tables.len()
    );
    Ok(extraction)
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    builder: Pdfcontext,
    json: Option<JsonFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = extract_with_spinner(input, builder)?;

    let rendered = match json {
        Some(format) => extraction.to_json(format)?,
        None => extraction.to_text()?,
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn cmd_query(input: &Path, kind: ContentKind, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = extract_with_spinner(input, Pdfcontext::new())?;
    let message = extraction.answer(kind, query)?;
    println!("{}", message);
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = extract_with_spinner(input, Pdfcontext::new())?;
    let doc: &ExtractedDocument = extraction.document();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref version) = doc.info.pdf_version {
        println!("{}: PDF {}", "Format".bold(), version);
    }
    println!("{}: {}", "Pages".bold(), doc.info.page_count);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let undescribed = doc.images.iter().filter(|i| !i.has_description()).count()
        + doc.tables.iter().filter(|t| !t.has_description()).count();

    println!("{}: {}", "Paragraphs".bold(), doc.texts.len());
    println!("{}: {}", "Images".bold(), doc.images.len());
    println!("{}: {}", "Tables".bold(), doc.tables.len());
    if undescribed > 0 {
        println!(
            "{}: {}",
            "Without description".yellow().bold(),
            undescribed
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfcontext".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF paragraph, image and table extraction");
    println!();
    println!("License: MIT");
}
