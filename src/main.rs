use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use saltmatch::catalog::Catalog;
use saltmatch::config::{Config, OcrBackend};
use saltmatch::ocr::traits::OcrService;

/// saltmatch: find an inexpensive generic equivalent for a branded medicine.
///
/// Matches a branded product's salt composition against a generic catalog,
/// by active ingredient and dose first and by name second.
#[derive(Parser)]
#[command(name = "saltmatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a label is normalized into tokens and ingredients
    Normalize {
        /// Raw label text, e.g. "Paracetamol Tablets IP 500mg"
        label: String,
    },

    /// Score one generic label against one branded label
    Score {
        /// Branded salt composition
        branded: String,
        /// Generic label
        generic: String,
    },

    /// Rank generic candidates for a salt composition
    Match {
        /// Salt composition, e.g. "Amoxycillin (500mg) + Clavulanic Acid (125mg)"
        salt: String,

        /// How many candidates to show (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Find a branded product by name
    Search {
        /// Name or part of a name (case-insensitive)
        name: String,
    },

    /// Find a branded product by name and its best generic alternative
    Lookup {
        /// Name or part of a name (case-insensitive)
        name: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read package photos with OCR and find generic alternatives
    Scan {
        /// Image files to read
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Number of images to read in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show catalog and OCR configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("saltmatch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Normalize { label } => {
            let normalized = saltmatch::matching::normalize::normalize(&label);
            saltmatch::output::terminal::display_normalized(&label, &normalized);
        }

        Commands::Score { branded, generic } => {
            let weights = saltmatch::matching::similarity::SimilarityWeights::default();
            let breakdown =
                saltmatch::matching::similarity::score_breakdown(&branded, &generic, &weights);
            saltmatch::output::terminal::display_breakdown(
                &branded,
                &generic,
                &breakdown,
                config.threshold,
            );
        }

        Commands::Match { salt, top } => {
            let catalog = load_catalog(&config)?;
            let prepared = saltmatch::identify::prepare_salt_composition(&salt);
            let ranked = saltmatch::matching::selector::rank_candidates(
                &prepared,
                &catalog.generics,
                Some(top),
            );
            saltmatch::output::terminal::display_ranked(&salt, &ranked, config.threshold);
        }

        Commands::Search { name } => {
            let catalog = load_catalog(&config)?;
            match catalog.search_by_name(&name) {
                Some(product) => saltmatch::output::terminal::display_product(product),
                None => println!("No medicine found matching \"{name}\"."),
            }
        }

        Commands::Lookup { name, json } => {
            let catalog = load_catalog(&config)?;
            let Some(report) =
                saltmatch::pipeline::lookup::lookup_by_name(&catalog, &name, config.threshold)
            else {
                println!("No medicine found matching \"{name}\".");
                return Ok(());
            };

            if json {
                println!("{}", saltmatch::output::to_json(&report)?);
            } else {
                saltmatch::output::terminal::display_report(&report, config.threshold);
            }
        }

        Commands::Scan {
            images,
            concurrency,
            json,
        } => {
            config.require_ocr()?;
            let catalog = load_catalog(&config)?;
            let ocr = create_ocr(&config)?;

            info!(images = images.len(), concurrency, "Reading package photos");

            let lookups = saltmatch::pipeline::lookup::lookup_images(
                ocr.as_ref(),
                &catalog,
                &images,
                config.threshold,
                concurrency,
            )
            .await;

            let mut reports = Vec::new();
            for lookup in lookups {
                match lookup.outcome {
                    Ok(Some(report)) => {
                        if !json {
                            saltmatch::output::terminal::display_report(&report, config.threshold);
                        }
                        reports.push(report);
                    }
                    Ok(None) => eprintln!(
                        "\n{} {}: no catalog product matched the package text",
                        "Warning:".yellow(),
                        lookup.image.display()
                    ),
                    Err(e) => eprintln!(
                        "\n{} {}: {e:#}",
                        "Error:".red(),
                        lookup.image.display()
                    ),
                }
            }

            if json {
                println!("{}", saltmatch::output::to_json(&reports)?);
                return Ok(());
            }

            println!("\n{}", "Scan complete.".bold());
            println!("  Images read: {}", images.len());
            println!("  Products identified: {}", reports.len());
        }

        Commands::Status => {
            saltmatch::status::show(&config)?;
        }
    }

    Ok(())
}

/// Validate the catalog paths and load both catalogs.
fn load_catalog(config: &Config) -> Result<Catalog> {
    config.require_catalog()?;
    info!("Loading catalog...");
    Catalog::load(&config.medicines_path, &config.generics_path)
}

/// Create the OCR backend selected by the configuration.
fn create_ocr(config: &Config) -> Result<Box<dyn OcrService>> {
    match config.ocr_backend {
        OcrBackend::Process => {
            info!(command = %config.ocr_command, "Using process OCR backend");
            Ok(Box::new(
                saltmatch::ocr::process::ProcessOcr::from_command_line(&config.ocr_command)?,
            ))
        }
        OcrBackend::Http => {
            info!(url = %config.ocr_url, "Using HTTP OCR backend");
            Ok(Box::new(saltmatch::ocr::http::HttpOcr::new(
                config.ocr_url.clone(),
            )))
        }
    }
}
