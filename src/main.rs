use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use trip_wizard::config::CONFIG;
use trip_wizard::{default_catalog, logger, Catalog, Intent, LogSubmitter, WizardSession};

#[derive(Parser)]
#[command(name = "trip-wizard")]
#[command(about = "Drives the trip planning wizard from JSON intents.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Catalog YAML to load instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Runs one wizard session, reading intents from a file or stdin
    Play {
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Checks a catalog and prints what it offers
    Catalog,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = CONFIG.log_level.as_deref().unwrap_or("info");
    logger::init_logger(log_level);

    let catalog_path = cli.catalog.or_else(|| CONFIG.catalog_path.clone());
    let catalog = load_catalog(catalog_path.as_deref())?;
    let source = catalog_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());

    match cli.command {
        Some(Commands::Catalog) => describe_catalog(&catalog, &source),
        Some(Commands::Play { script }) => play(catalog, script.as_deref(), &source),
        None => play(catalog, None, &source),
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Arc<Catalog>> {
    match path {
        Some(path) => {
            let catalog = Catalog::from_file(path).with_context(|| format!("loading catalog {}", path.display()))?;
            Ok(Arc::new(catalog))
        }
        None => Ok(default_catalog()),
    }
}

fn describe_catalog(catalog: &Catalog, source: &str) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Catalog: {}", source)?;
    for category in catalog.categories() {
        let skip = if category.skippable { ", skippable" } else { "" };
        writeln!(out, "  {} ({}): {} places{}", category.label, category.key, category.places.len(), skip)?;
    }
    for region in catalog.region_names() {
        let city = catalog
            .region_detail(region)
            .and_then(|r| r.suggested_city.as_deref())
            .unwrap_or("-");
        writeln!(out, "  region {}: {} sub-places, suggests {}", region, catalog.sub_places(region).len(), city)?;
    }
    writeln!(out, "  {} experience categories", catalog.experience_categories().len())?;
    writeln!(out, "  {} countries of residence", catalog.countries().len())?;
    Ok(())
}

fn play(catalog: Arc<Catalog>, script: Option<&Path>, source: &str) -> anyhow::Result<()> {
    let input: Box<dyn BufRead> = match script {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => {
            logger::print_banner(source);
            Box::new(BufReader::new(io::stdin()))
        }
    };

    let mut session = WizardSession::new(catalog, Box::new(LogSubmitter));
    let mut out = io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string(&session.render())?)?;

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let intent: Intent = match serde_json::from_str(line) {
            Ok(intent) => intent,
            Err(e) => {
                log::error!("Line {}: not a valid intent: {}", number + 1, e);
                let report = serde_json::json!({ "error": "bad_intent", "detail": e.to_string() });
                writeln!(out, "{}", report)?;
                continue;
            }
        };

        match session.dispatch(intent) {
            Ok(update) => writeln!(out, "{}", serde_json::to_string(&update)?)?,
            Err(e) => writeln!(out, "{}", e.to_json())?,
        }
    }

    log::debug!("Session {} finished on {:?}", session.id(), session.current_step());
    Ok(())
}
