mod context;
mod render;

use std::{future::Future, io, path::Path, str::FromStr, time::Duration};

use anyhow::Context as _;
use clap::{App, Arg, ArgMatches};
use life_common::Config;
use life_engine::{seed, Grid, Pattern};
use tracing::{debug, info, warn};

use crate::{context::Context, render::Renderer};

const DEFAULT_LOG_FILTER: &str = "life_driver=info,life_engine=info,life_common=info";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] render::Error),
    #[error(transparent)]
    Engine(#[from] life_engine::Error),
    #[error(transparent)]
    Config(#[from] life_common::config::Error),
    #[error("step task failed")]
    Join(#[from] tokio::task::JoinError),
    #[error("grid is still out on the step worker")]
    StepInFlight,
    #[error("could not read pattern file {path}")]
    PatternFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    init_tracing(matches.value_of("log").unwrap_or(DEFAULT_LOG_FILTER))?;
    debug!("starting");

    let config = build_config(&matches)?;
    info!(
        rows = config.rows,
        cols = config.cols,
        frame_interval_ms = config.frame_interval.as_millis() as u64,
        background = config.background,
        "configured"
    );

    let grid = create_grid(&config, matches.value_of("pattern"))?;
    let mut context = Context::new(&config, grid, Renderer::new(std::io::stdout()))?;

    info!("running");
    tokio::select! {
        result = context.run() => result?,
        _ = interrupted(tokio::signal::ctrl_c()) => {
            info!("interrupted");
        }
    }
    info!(generation = %context.generation(), "stopped");

    Ok(())
}

/// Resolves on Ctrl-C. Without a signal handler it never resolves, so the run
/// continues until its generation limit.
async fn interrupted(signal: impl Future<Output = io::Result<()>>) {
    if let Err(error) = signal.await {
        warn!(%error, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn cli() -> App<'static, 'static> {
    App::new("life")
        .about("Conway's Game of Life on a torus, drawn in the terminal")
        .arg(
            Arg::with_name("rows")
                .long("rows")
                .takes_value(true)
                .help("number of rows on the board [default: 25]"),
        )
        .arg(
            Arg::with_name("cols")
                .long("cols")
                .takes_value(true)
                .help("number of columns on the board [default: 25]"),
        )
        .arg(
            Arg::with_name("frame-interval")
                .long("frame-interval")
                .takes_value(true)
                .help("milliseconds between frames [default: 75]"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("seed for the random starting board"),
        )
        .arg(
            Arg::with_name("fill-rate")
                .long("fill-rate")
                .takes_value(true)
                .help("chance of a cell starting alive [default: 0.5]"),
        )
        .arg(
            Arg::with_name("generations")
                .long("generations")
                .takes_value(true)
                .help("stop after this many generations"),
        )
        .arg(
            Arg::with_name("pattern")
                .long("pattern")
                .takes_value(true)
                .help("start from a built-in pattern (block, blinker, glider) or a plaintext pattern file"),
        )
        .arg(
            Arg::with_name("background")
                .long("background")
                .help("advance generations on a background worker"),
        )
        .arg(
            Arg::with_name("query")
                .long("query")
                .takes_value(true)
                .help("parameters as a URL query string, e.g. frameInterval=40&rows=30; flags win"),
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .takes_value(true)
                .help("tracing filter directives"),
        )
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    // frames own stdout
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::EnvFilter::try_new(filter)
                    .with_context(|| format!("invalid log filter {:?}", filter))?,
            ),
    )?;
    Ok(())
}

fn build_config(matches: &ArgMatches<'_>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    if let Some(query) = matches.value_of("query") {
        config.apply_query(query)?;
    }
    if let Some(rows) = value_of(matches, "rows")? {
        config.rows = rows;
    }
    if let Some(cols) = value_of(matches, "cols")? {
        config.cols = cols;
    }
    if let Some(ms) = value_of(matches, "frame-interval")? {
        config.frame_interval = Duration::from_millis(ms);
    }
    if let Some(seed) = value_of(matches, "seed")? {
        config.seed = Some(seed);
    }
    if let Some(fill_rate) = value_of(matches, "fill-rate")? {
        config.fill_rate = fill_rate;
    }
    if let Some(generations) = value_of(matches, "generations")? {
        config.generations = Some(generations);
    }
    config.background |= matches.is_present("background");
    config.validate()?;
    Ok(config)
}

fn value_of<T>(matches: &ArgMatches<'_>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .map(|raw| {
            raw.parse()
                .with_context(|| format!("invalid value {:?} for --{}", raw, name))
        })
        .transpose()
}

fn create_grid(config: &Config, pattern: Option<&str>) -> Result<Grid> {
    let (rows, cols) = (config.rows, config.cols);
    let grid = match pattern {
        None => Grid::new(rows, cols, seed::random(config.fill_rate, config.seed))?,
        Some(name) => {
            let pattern = match Pattern::builtin(name) {
                Some(pattern) => pattern,
                None => load_pattern(name)?,
            };
            info!(pattern = pattern.name(), "placing pattern");
            Grid::new(rows, cols, pattern.place_centered(rows, cols))?
        }
    };
    debug!(population = grid.population(), "created board");
    Ok(grid)
}

fn load_pattern(path: &str) -> Result<Pattern> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::PatternFile {
        path: path.to_string(),
        source,
    })?;
    let name = Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path);
    Ok(Pattern::parse(name, &text)?)
}
