//! binary spacing tool
//!
//! Takes a font file, respaces its Latin letters with the chosen method and
//! writes a new TrueType font.

use std::path::{Path, PathBuf};

use clap::Parser;
use font_spacing::{FontDocument, SpacingConfig, SpacingMethod, SpacingSettings};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    #[arg(short, long)]
    path: PathBuf,

    /// The output font file
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// original, proportional or topological
    #[arg(short, long, default_value_t = SpacingMethod::Original)]
    method: SpacingMethod,

    /// JSON file with settings for each method, keyed by method name
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Family name written to the output font
    #[arg(long)]
    family_name: Option<String>,

    /// Print the current master measurements as settings JSON
    #[arg(long)]
    measure: bool,

    /// Print the measured vertical metrics and average side bearing as JSON
    #[arg(long)]
    metrics: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(&args.path)
        .map_err(|e| format!("could not read '{}': {e}", args.path.display()))?;
    let mut font = FontDocument::load(&data)?;

    if args.measure {
        let settings = SpacingSettings::measure(&font)?;
        println!("{}", serde_json::to_string_pretty(&settings)?);
    }
    if args.metrics {
        let report = json!({
            "metrics": font.metrics(),
            "averageSideBearing": font.average_side_bearing(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let Some(output_file) = &args.output_file else {
        if !(args.measure || args.metrics) {
            return Err("nothing to do: pass --output-file, --measure or --metrics".into());
        }
        return Ok(());
    };

    if args.method != SpacingMethod::Original {
        let settings = settings_for(args.method, args.settings.as_deref(), &font)?;
        let report = font.apply(args.method, &settings);
        log::info!(
            "{} spacing set {} of {} characters",
            args.method,
            report.num_at_target(),
            report.len()
        );
    }

    let family = match &args.family_name {
        Some(family) => family.clone(),
        None => default_family(&args.path),
    };
    let spaced = font.export(&family)?;
    std::fs::write(output_file, spaced)
        .map_err(|e| format!("could not write '{}': {e}", output_file.display()))?;
    Ok(())
}

/// Settings from the settings file, or measured from the font when the file
/// has none for `method`.
fn settings_for(
    method: SpacingMethod,
    path: Option<&Path>,
    font: &FontDocument,
) -> Result<SpacingSettings, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("could not read '{}': {e}", path.display()))?;
            SpacingConfig::from_json(&json)?
        }
        None => SpacingConfig::default(),
    };
    let configured = match method {
        SpacingMethod::Original => None,
        SpacingMethod::Proportional => config.proportional,
        SpacingMethod::Topological => config.topological,
    };
    match configured {
        Some(settings) => Ok(settings),
        None => Ok(SpacingSettings::measure(font)?),
    }
}

fn default_family(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
