use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use rcg_l10n::error::{L10nError, Result};
use rcg_l10n::logging;
use rcg_l10n::model::config::{HeaderTemplate, ProjectConfig};
use rcg_l10n::model::language;
use rcg_l10n::protocol;
use rcg_l10n::services::{pipeline, storage::CatalogLayout};

/// Converts the game's localization document to gettext catalogs and back.
#[derive(Debug, Parser)]
#[command(name = "rcg-l10n", version, about, propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Project configuration (JSON)
    #[arg(short, long, global = true, env = "RCG_L10N_CONFIG", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write or update catalogs from the document
    Extract {
        /// Source localization document
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,

        /// Catalog root directory
        #[arg(short, long, default_value = "translation", value_hint = ValueHint::DirPath)]
        output: PathBuf,

        /// Language codes to process (default: every target language)
        #[arg(short, long = "language", value_delimiter = ',')]
        languages: Vec<String>,

        /// Also write a .pot template per category
        #[arg(long)]
        templates: bool,
    },

    /// Apply reviewed catalog translations to the document
    Pack {
        /// Source localization document
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,

        /// Catalog root directory
        #[arg(short, long, default_value = "translation", value_hint = ValueHint::DirPath)]
        input: PathBuf,

        /// Output document (default: translation.json beside the source)
        #[arg(short = 'O', long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Language codes to process (default: every target language)
        #[arg(short, long = "language", value_delimiter = ',')]
        languages: Vec<String>,
    },

    /// Count record states in existing catalogs
    Stats {
        /// Source localization document
        #[arg(value_hint = ValueHint::FilePath)]
        document: PathBuf,

        /// Catalog root directory
        #[arg(short, long, default_value = "translation", value_hint = ValueHint::DirPath)]
        input: PathBuf,

        /// Language codes to process (default: every target language)
        #[arg(short, long = "language", value_delimiter = ',')]
        languages: Vec<String>,
    },

    /// Answer JSON requests on stdin, one per line
    Serve,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::default(),
    };

    match cli.command {
        Command::Extract {
            document: source,
            output,
            languages,
            templates,
        } => {
            let layout = CatalogLayout::new(output, config.catalog_extension.as_str());
            let header = HeaderTemplate::now(&config);
            let languages = language::resolve_targets(&languages);

            let report = pipeline::extract_document(&source, &layout, &header, &languages, templates)?;
            tracing::info!(
                catalogs = report.items.len(),
                templates = report.templates.len(),
                failed = report.failed,
                "extract finished"
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Pack {
            document: source,
            input,
            output,
            languages,
        } => {
            let layout = CatalogLayout::new(input, config.catalog_extension.as_str());
            let languages = language::resolve_targets(&languages);

            let report = pipeline::pack_document(&source, output.as_deref(), &layout, &languages)?;
            tracing::info!(
                applied = report.applied,
                unknown_keys = report.unknown_keys,
                failed = report.failed,
                output = %report.output.display(),
                "pack finished"
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Stats {
            document: source,
            input,
            languages,
        } => {
            let layout = CatalogLayout::new(input, config.catalog_extension.as_str());
            let languages = language::resolve_targets(&languages);
            let report = pipeline::stats_document(&source, &layout, &languages)?;

            let json = serde_json::to_string_pretty(&report)?;
            writeln!(io::stdout(), "{json}").map_err(|e| L10nError::io("<stdout>", e))?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Serve => {
            serve(&config);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn serve(config: &ProjectConfig) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = protocol::handle(&line, config);

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
