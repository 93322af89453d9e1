use std::{str::FromStr, time::Duration};

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("invalid value {value:?} for parameter {key}")]
    InvalidParam { key: String, value: String },
    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    EmptyDimension { rows: usize, cols: usize },
    #[error("fill rate must be within [0, 1], got {0}")]
    FillRate(f64),
    #[error("board of {rows}x{cols} exceeds {max} cells")]
    TooManyCells { rows: usize, cols: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the driver needs to know before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub frame_interval: Duration,
    /// Seed for the initial board; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub fill_rate: f64,
    /// Stop after this many generations; `None` runs until interrupted.
    pub generations: Option<u64>,
    /// Advance on the background step worker instead of inline.
    pub background: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 25,
            cols: 25,
            frame_interval: Duration::from_millis(Self::DEFAULT_FRAME_INTERVAL_MS),
            seed: None,
            fill_rate: 0.5,
            generations: None,
            background: false,
        }
    }
}

impl Config {
    pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 75;
    /// Largest board `validate` accepts.
    pub const MAX_CELLS: usize = 1 << 24;

    /// Applies `key=value` pairs from a query string.
    ///
    /// Accepts a bare query (`frameInterval=40&rows=30`) or a whole URL, in
    /// which case only the part between `?` and `#` is read. Keys and values
    /// are form-urlencoded (`%XX` escapes, `+` for space). Unknown keys are
    /// ignored; a known key with an unparsable value is an error. Keys without
    /// a value are skipped.
    pub fn apply_query(&mut self, query: &str) -> Result<()> {
        let query = match query.find('?') {
            Some(start) => &query[start + 1..],
            None => query,
        };
        let query = query.split('#').next().unwrap_or_default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let (key, value) = (key.as_ref(), value.as_ref());
            if value.is_empty() {
                continue;
            }
            match key {
                "frameInterval" => {
                    self.frame_interval = Duration::from_millis(parse(key, value)?)
                }
                "rows" => self.rows = parse(key, value)?,
                "cols" => self.cols = parse(key, value)?,
                "seed" => self.seed = Some(parse(key, value)?),
                "fillRate" => self.fill_rate = parse(key, value)?,
                "generations" => self.generations = Some(parse(key, value)?),
                _ => {
                    warn!(key, "ignoring unknown parameter");
                    continue;
                }
            }
            debug!(key, value, "applied parameter");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::EmptyDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(0.0..=1.0).contains(&self.fill_rate) {
            return Err(Error::FillRate(self.fill_rate));
        }
        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells <= Self::MAX_CELLS => Ok(()),
            _ => Err(Error::TooManyCells {
                rows: self.rows,
                cols: self.cols,
                max: Self::MAX_CELLS,
            }),
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidParam {
        key: key.to_string(),
        value: value.to_string(),
    })
}
