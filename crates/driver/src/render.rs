use std::io::Write;

use life_common::Generation;
use life_engine::Grid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not write frame")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// cursor home, then clear screen
const CLEAR: &str = "\x1b[H\x1b[2J";
// every cell is outlined; live cells are filled in
const STROKE: &str = "[]";
const FILL: &str = "██";

/// Draws whole frames of a grid onto a text surface.
pub struct Renderer<W> {
    out: W,
    clear: bool,
    frame: String,
}

impl<W: Write> Renderer<W> {
    /// Renderer for a terminal; each frame replaces the previous one.
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear: true,
            frame: String::new(),
        }
    }

    /// Renderer that appends frames one after another.
    #[cfg(test)]
    pub fn plain(out: W) -> Self {
        Self {
            clear: false,
            ..Self::new(out)
        }
    }

    pub fn render(&mut self, grid: &Grid, generation: Generation) -> Result<()> {
        self.frame.clear();
        if self.clear {
            self.frame.push_str(CLEAR);
        }
        for row in grid.cells().chunks(grid.cols()) {
            for &alive in row {
                self.frame.push_str(if alive { FILL } else { STROKE });
            }
            self.frame.push('\n');
        }
        self.frame.push_str(&format!(
            "generation {} | population {}\n",
            generation,
            grid.population()
        ));

        self.out.write_all(self.frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
