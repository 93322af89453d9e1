//! Named starting configurations that can be stamped onto a grid.

use std::{borrow::Cow, collections::HashSet};

use crate::{Error, Result};

/// A set of live cells given as `(row, col)` offsets from the pattern's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    name: Cow<'static, str>,
    cells: Cow<'static, [(usize, usize)]>,
}

pub const BLOCK: Pattern = Pattern {
    name: Cow::Borrowed("block"),
    cells: Cow::Borrowed(&[(0, 0), (0, 1), (1, 0), (1, 1)]),
};

pub const BLINKER: Pattern = Pattern {
    name: Cow::Borrowed("blinker"),
    cells: Cow::Borrowed(&[(0, 0), (0, 1), (0, 2)]),
};

pub const GLIDER: Pattern = Pattern {
    name: Cow::Borrowed("glider"),
    cells: Cow::Borrowed(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]),
};

pub const BUILTIN: &[Pattern] = &[BLOCK, BLINKER, GLIDER];

impl Pattern {
    pub fn builtin(name: &str) -> Option<Pattern> {
        BUILTIN
            .iter()
            .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Reads the plaintext format: one line per row, `O` or `*` alive, `.` dead.
    ///
    /// Lines starting with `!` are comments. Rows may be ragged; missing cells
    /// are dead.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Pattern> {
        let name = name.into();
        let mut cells = Vec::new();
        let rows = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.starts_with('!'));
        for (row, (line_index, line)) in rows.enumerate() {
            for (col, found) in line.trim_end().chars().enumerate() {
                match found {
                    'O' | '*' => cells.push((row, col)),
                    '.' => {}
                    _ => {
                        return Err(Error::InvalidPatternCell {
                            name,
                            line: line_index + 1,
                            column: col + 1,
                            found,
                        })
                    }
                }
            }
        }
        Ok(Pattern {
            name: Cow::Owned(name),
            cells: Cow::Owned(cells),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn height(&self) -> usize {
        self.cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0)
    }

    /// Init function for [`crate::Grid::new`] with this pattern's corner at `origin`
    /// on a `rows x cols` grid. Cells past an edge wrap around.
    pub fn place(
        &self,
        rows: usize,
        cols: usize,
        origin: (usize, usize),
    ) -> impl Fn(usize, usize) -> bool {
        let live: HashSet<(usize, usize)> = if rows == 0 || cols == 0 {
            HashSet::new()
        } else {
            self.cells
                .iter()
                .map(|&(row, col)| {
                    (
                        (origin.0 % rows + row % rows) % rows,
                        (origin.1 % cols + col % cols) % cols,
                    )
                })
                .collect()
        };
        move |row, col| live.contains(&(row, col))
    }

    /// Places the pattern in the middle of a `rows x cols` grid.
    pub fn place_centered(&self, rows: usize, cols: usize) -> impl Fn(usize, usize) -> bool {
        let origin = (
            rows.saturating_sub(self.height()) / 2,
            cols.saturating_sub(self.width()) / 2,
        );
        self.place(rows, cols, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;

    #[test]
    fn parse_plaintext() {
        let pattern = Pattern::parse("glider", "!Name: Glider\n.O.\n..O\nOOO\n").unwrap();
        assert_eq!(pattern.cells(), GLIDER.cells());
        assert_eq!(pattern.height(), 3);
        assert_eq!(pattern.width(), 3);
        assert_eq!(pattern.name(), "glider");
    }

    #[test]
    fn parse_accepts_stars_and_ragged_rows() {
        let pattern = Pattern::parse("ragged", "*\n.*  \n\n..*").unwrap();
        assert_eq!(pattern.cells(), &[(0, 0), (1, 1), (3, 2)]);
    }

    #[test]
    fn parse_reports_position_of_bad_cell() {
        match Pattern::parse("broken", "!comment\n.O.\n.x.") {
            Err(Error::InvalidPatternCell {
                name,
                line,
                column,
                found,
            }) => {
                assert_eq!(name, "broken");
                assert_eq!((line, column, found), (3, 2, 'x'));
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn builtin_lookup_ignores_case() {
        assert_eq!(Pattern::builtin("Glider"), Some(GLIDER));
        assert_eq!(Pattern::builtin("BLOCK"), Some(BLOCK));
        assert_eq!(Pattern::builtin("gun"), None);
    }

    #[test]
    fn place_wraps_past_edges() {
        let grid = Grid::new(4, 4, BLOCK.place(4, 4, (3, 3))).unwrap();
        assert_eq!(grid.to_string(), "O..O\n....\n....\nO..O\n");
    }

    #[test]
    fn place_centered() {
        let grid = Grid::new(5, 5, BLINKER.place_centered(5, 5)).unwrap();
        assert_eq!(grid.to_string(), ".....\n.....\n.OOO.\n.....\n.....\n");
    }

    #[test]
    fn empty_pattern_is_all_dead() {
        let pattern = Pattern::parse("empty", "").unwrap();
        assert_eq!((pattern.height(), pattern.width()), (0, 0));
        let grid = Grid::new(3, 3, pattern.place_centered(3, 3)).unwrap();
        assert_eq!(grid.population(), 0);
    }
}
