use std::fmt;

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::{Error, Result};

/// Conway's Game of Life on a torus of `rows x cols` cells.
///
/// Cells live in two equal buffers. [`Grid::step`] writes the next generation
/// into the back buffer and then flips which buffer is visible, so readers
/// between steps always see one complete generation.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    // double buffering
    cells_a: Cells,
    cells_b: Cells,
    active: Active,
}

// which buffer is visible
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Active {
    A,
    B,
}

impl Active {
    fn swap(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl Grid {
    /// Creates a grid, asking `init` for the state of every cell in row-major order.
    pub fn new<F>(rows: usize, cols: usize, mut init: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> bool,
    {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimension { rows, cols });
        }
        // coordinates are wrapped as i64, so every index must fit in one
        let len = rows
            .checked_mul(cols)
            .filter(|&len| len <= i64::MAX as usize)
            .ok_or(Error::TooLarge { rows, cols })?;

        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|(row, col)| init(row, col))
            .collect();
        debug!(rows, cols, "created grid");

        Ok(Self {
            rows,
            cols,
            cells_a: Cells { rows, cols, cells },
            cells_b: Cells {
                rows,
                cols,
                cells: vec![false; len],
            },
            active: Active::A,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Visible generation, row-major.
    pub fn cells(&self) -> &[bool] {
        self.inner_active().cells()
    }

    /// State of the cell at `(row, col)` after wrapping both coordinates onto the torus.
    pub fn is_alive(&self, row: i64, col: i64) -> bool {
        self.inner_active().cell_at(row, col)
    }

    pub fn population(&self) -> usize {
        self.cells().iter().filter(|&&alive| alive).count()
    }

    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells()
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(move |(index, _)| (index / cols, index % cols))
    }

    /// Advances every cell by one generation (B3/S23).
    ///
    /// Neighbors are read only from the visible buffer; results go to the back
    /// buffer, which becomes visible once every cell is done.
    ///
    /// All eight offsets are counted even when they wrap onto the same cell, so
    /// on grids with a side of 1 or 2 a single cell can contribute several
    /// times (a lone cell on a 1x1 grid sees itself eight times).
    pub fn step(&mut self) {
        let (front, back) = self.buffers_mut();
        for (index, next) in back.cells.iter_mut().enumerate() {
            let (row, col) = (index / front.cols, index % front.cols);
            *next = next_state(front.cells[index], front.live_neighbors(row, col));
        }
        self.active = self.active.swap();
        trace!(population = self.population(), "advanced one generation");
    }

    /// Same as [`Grid::step`], then reports completion on `done`.
    ///
    /// A receiver that has already gone away is not an error.
    pub fn step_and_signal(&mut self, done: &Sender<()>) {
        self.step();
        if done.send(()).is_err() {
            trace!("nobody waiting for step completion");
        }
    }

    fn inner_active(&self) -> &Cells {
        match self.active {
            Active::A => &self.cells_a,
            Active::B => &self.cells_b,
        }
    }

    // (visible, back)
    fn buffers_mut(&mut self) -> (&Cells, &mut Cells) {
        match self.active {
            Active::A => (&self.cells_a, &mut self.cells_b),
            Active::B => (&self.cells_b, &mut self.cells_a),
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells() == other.cells()
    }
}

impl Eq for Grid {}

/// One line per row, `O` for a live cell and `.` for a dead one.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells().chunks(self.cols) {
            for &alive in row {
                f.write_str(if alive { "O" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Cells {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Cells {
    fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn cell_at(&self, row: i64, col: i64) -> bool {
        self.cells[self.cell_index(row, col)]
    }

    fn cell_index(&self, row: i64, col: i64) -> usize {
        wrap(row, self.rows) * self.cols + wrap(col, self.cols)
    }

    fn live_neighbors(&self, row: usize, col: usize) -> usize {
        let (row, col) = (row as i64, col as i64);
        NEIGHBORHOOD
            .iter()
            .filter(|&&(relative_row, relative_col)| {
                self.cell_at(row + relative_row, col + relative_col)
            })
            .count()
    }
}

fn wrap(value: i64, len: usize) -> usize {
    value.rem_euclid(len as i64) as usize
}

fn next_state(alive: bool, neighbors: usize) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

// [nw, n, ne, w, e, sw, s, se] as (row, col) offsets
const NEIGHBORHOOD: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&str]) -> Grid {
        let cols = rows[0].len();
        Grid::new(rows.len(), cols, |row, col| {
            rows[row].as_bytes()[col] == b'O'
        })
        .unwrap()
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Grid::new(0, 4, |_, _| false),
            Err(Error::EmptyDimension { rows: 0, cols: 4 })
        ));
        assert!(matches!(
            Grid::new(4, 0, |_, _| false),
            Err(Error::EmptyDimension { rows: 4, cols: 0 })
        ));
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        assert!(matches!(
            Grid::new(usize::MAX, 2, |_, _| false),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn init_is_called_in_row_major_order() {
        let mut seen = Vec::new();
        let grid = Grid::new(2, 3, |row, col| {
            seen.push((row, col));
            col == 1
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
        assert_eq!(grid.cells(), &[false, true, false, false, true, false]);
        assert_eq!(grid.cells().len(), grid.rows() * grid.cols());
    }

    #[test]
    fn coordinates_wrap_in_both_directions() {
        let grid = from_rows(&["O..", "...", "..O", "..."]);
        assert!(grid.is_alive(0, 0));
        assert!(grid.is_alive(4, 3));
        assert!(grid.is_alive(-4, -3));
        assert!(grid.is_alive(-2, -1));
        assert!(grid.is_alive(2, 2));
        assert!(!grid.is_alive(-1, -1));
        assert!(grid.is_alive(i64::MIN + 2, 2));
    }

    #[test]
    fn center_row_on_3x3_fills_then_empties() {
        let mut grid = from_rows(&["...", "OOO", "..."]);

        // row 1 cells see two live neighbors, rows 0 and 2 see all three
        grid.step();
        assert_eq!(grid.to_string(), "OOO\nOOO\nOOO\n");

        // every cell now sees eight
        grid.step();
        assert_eq!(grid.to_string(), "...\n...\n...\n");
    }

    #[test]
    fn lone_cell_on_1x1_counts_itself() {
        let mut grid = Grid::new(1, 1, |_, _| true).unwrap();
        grid.step();
        assert!(!grid.is_alive(0, 0));

        grid.step();
        assert!(!grid.is_alive(0, 0));
    }

    #[test]
    fn single_row_counts_wrapped_duplicates() {
        // (0, 0) is seen by its neighbors through three row offsets each
        let mut grid = from_rows(&["O.."]);
        grid.step();
        assert_eq!(grid.to_string(), "OOO\n");

        grid.step();
        assert_eq!(grid.to_string(), "...\n");
    }

    #[test]
    fn step_flips_buffers_instead_of_copying() {
        let mut grid = from_rows(&[".....", ".OOO.", "....."]);
        let first = grid.cells().as_ptr();

        grid.step();
        let second = grid.cells().as_ptr();
        assert_ne!(first, second);

        grid.step();
        assert_eq!(grid.cells().as_ptr(), first);
    }

    #[test]
    fn step_and_signal_reports_completion() {
        let (done, finished) = crossbeam_channel::bounded(1);
        let mut grid = from_rows(&["....", ".OO.", ".OO.", "...."]);
        let before = grid.clone();

        std::thread::scope(|scope| {
            scope.spawn(|| grid.step_and_signal(&done));
            finished.recv().unwrap();
        });
        assert_eq!(grid, before);
    }

    #[test]
    fn step_and_signal_tolerates_dropped_receiver() {
        let (done, finished) = crossbeam_channel::bounded(1);
        drop(finished);
        let mut grid = from_rows(&["...", "OOO", "..."]);
        grid.step_and_signal(&done);
        assert_eq!(grid.population(), 9);
    }

    #[test]
    fn live_cells_lists_coordinates() {
        let grid = from_rows(&["O..", "..O"]);
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(0, 0), (1, 2)]);
        assert_eq!(grid.population(), 2);
    }

    #[test]
    fn equality_ignores_back_buffer() {
        let mut stepped = from_rows(&["....", ".OO.", ".OO.", "...."]);
        stepped.step();
        assert_eq!(stepped, from_rows(&["....", ".OO.", ".OO.", "...."]));
    }
}
