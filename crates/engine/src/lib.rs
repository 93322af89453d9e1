mod grid;
pub mod pattern;
pub mod seed;
pub mod worker;

pub use grid::Grid;
pub use pattern::Pattern;
pub use worker::{PendingStep, StepWorker};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("grid dimensions must be non-zero, got {rows}x{cols}")]
    EmptyDimension { rows: usize, cols: usize },
    #[error("grid of {rows}x{cols} cells is too large")]
    TooLarge { rows: usize, cols: usize },
    #[error("unexpected {found:?} at line {line}, column {column} of pattern {name:?}")]
    InvalidPatternCell {
        name: String,
        line: usize,
        column: usize,
        found: char,
    },
    #[error("could not spawn step worker")]
    WorkerSpawn(#[source] std::io::Error),
    #[error("step worker went away before finishing the step")]
    WorkerGone,
}

pub type Result<T> = std::result::Result<T, Error>;
