use clap::Parser;
use nccmatch::io::load_gray_image;
use nccmatch::{Located, Match, MatchConfig, Matcher, NccMatchError, Raster, ScaleResult, Template};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "NccMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Mode {
    #[default]
    Matches,
    Exists,
    Position,
    Scale,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    min_threshold: f32,
    max_matches: usize,
    exist_threshold: f32,
    position_threshold: f32,
    scale_range: [f64; 2],
    scale_step: f64,
    parallel: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            min_threshold: cfg.min_threshold,
            max_matches: cfg.max_matches,
            exist_threshold: cfg.exist_threshold,
            position_threshold: cfg.position_threshold,
            scale_range: [cfg.scale_range.0, cfg.scale_range.1],
            scale_step: cfg.scale_step,
            parallel: cfg.parallel,
        }
    }
}

impl From<MatchConfigJson> for MatchConfig {
    fn from(value: MatchConfigJson) -> Self {
        Self {
            min_threshold: value.min_threshold,
            max_matches: value.max_matches,
            exist_threshold: value.exist_threshold,
            position_threshold: value.position_threshold,
            scale_range: (value.scale_range[0], value.scale_range[1]),
            scale_step: value.scale_step,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    template_path: String,
    output_path: Option<String>,
    mode: Mode,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    score: f32,
}

impl From<Match> for MatchRecord {
    fn from(value: Match) -> Self {
        Self {
            x: value.center.x,
            y: value.center.y,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct PositionRecord {
    x: f32,
    y: f32,
    score: f32,
}

impl From<Located> for PositionRecord {
    fn from(value: Located) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct ScaleRecord {
    scale: Option<f64>,
    x: Option<usize>,
    y: Option<usize>,
    score: f32,
}

impl From<ScaleResult> for ScaleRecord {
    fn from(value: ScaleResult) -> Self {
        Self {
            scale: value.scale,
            x: value.position.map(|p| p.x),
            y: value.position.map(|p| p.y),
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum Output {
    Matches {
        matches: Vec<MatchRecord>,
    },
    Exists {
        exists: bool,
    },
    Position {
        found: bool,
        best: Option<PositionRecord>,
        best_score: f32,
    },
    Scale(ScaleRecord),
}

fn run(matcher: &Matcher, mode: &Mode, image: &Raster) -> Result<Output, NccMatchError> {
    let view = image.view();
    let output = match mode {
        Mode::Matches => Output::Matches {
            matches: matcher
                .find_matches(view)?
                .into_iter()
                .map(MatchRecord::from)
                .collect(),
        },
        Mode::Exists => Output::Exists {
            exists: matcher.match_exists(view)?,
        },
        Mode::Position => match matcher.best_position(view) {
            Ok(located) => Output::Position {
                found: true,
                best_score: located.score,
                best: Some(located.into()),
            },
            Err(NccMatchError::NoMatchFound { best_score, .. }) => Output::Position {
                found: false,
                best: None,
                best_score,
            },
            Err(err) => return Err(err),
        },
        Mode::Scale => Output::Scale(matcher.find_scale(view)?.into()),
    };
    Ok(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("nccmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.template_path.is_empty() {
        return Err("image_path and template_path must be set in the config".into());
    }

    let match_cfg = MatchConfig::from(config.match_cfg);
    match_cfg.validate()?;

    let image = load_gray_image(&config.image_path)?;
    let template = load_gray_image(&config.template_path)?;
    tracing::info!(
        image_width = image.width(),
        image_height = image.height(),
        template_width = template.width(),
        template_height = template.height(),
        "inputs loaded"
    );

    let matcher = Matcher::from_template(&Template::from_raster(template)).with_config(match_cfg);
    let plan = matcher.plan();
    tracing::info!(
        template_mean = plan.mean(),
        template_flat = plan.is_flat(),
        "template planned"
    );
    let output = run(&matcher, &config.mode, &image)?;
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
