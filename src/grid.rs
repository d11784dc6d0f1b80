//! In-memory cell grid, the working representation of one worksheet.
//!
//! The three-way `Cell` state is load-bearing: block recognition and
//! free-column detection both distinguish "empty" from numeric zero and
//! from blank text. Never collapse it into an `Option<f64>`.

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

const EMPTY: Cell = Cell::Empty;

impl Cell {
    /// True for `Cell::Empty` only; a zero or a blank string is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// True when the cell is empty or holds whitespace-only text.
    ///
    /// This is the occupancy test used for both sample-name gating and
    /// free-column detection in the merge grid.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Numeric value, if the cell holds one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String conversion for label cells.
    ///
    /// Integral numbers render without a decimal point ("240101", not
    /// "240101.0"), matching how sample names typed as numbers display.
    #[must_use]
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
    pub fn display_text(&self) -> String {
        match self {
            Cell::Number(n) => {
                // The range check keeps the i64 cast exact
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

// JSON form: number, string, or null for empty.
impl serde::Serialize for Cell {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Empty => serializer.serialize_unit(),
        }
    }
}

/// A rectangular-ish table of cells addressed by zero-based (row, column).
///
/// Rows may differ in length; reading past the end of a row (or past the
/// last row) yields `Cell::Empty`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Maximum row length observed across all rows.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at (row, col); `Cell::Empty` if the position is out of range.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Set the cell at (row, col), growing rows and columns as needed.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        if r.len() <= col {
            r.resize(col + 1, Cell::Empty);
        }
        if let Some(slot) = r.get_mut(col) {
            *slot = cell;
        }
    }

    /// Pad the grid with empty rows until it has at least `n` rows.
    pub fn ensure_rows(&mut self, n: usize) {
        if self.rows.len() < n {
            self.rows.resize_with(n, Vec::new);
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// True when no cell in the grid holds a value.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.rows
            .iter()
            .all(|r| r.iter().all(|c| matches!(c, Cell::Empty)))
    }
}

/// A grid together with the worksheet name it was read from (or will be
/// written under).
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub grid: Grid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_distinct_from_zero_and_blank_text() {
        assert!(Cell::Empty.is_empty());
        assert!(!Cell::Number(0.0).is_empty());
        assert!(!Cell::Text(String::new()).is_empty());

        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(!Cell::Text("S1".into()).is_blank());
    }

    #[test]
    fn display_text_drops_trailing_point_zero() {
        assert_eq!(Cell::Number(240101.0).display_text(), "240101");
        assert_eq!(Cell::Number(1.5).display_text(), "1.5");
        assert_eq!(Cell::Text("S1".into()).display_text(), "S1");
        assert_eq!(Cell::Empty.display_text(), "");
    }

    #[test]
    fn width_is_the_longest_row() {
        let g = Grid::from_rows(vec![
            vec![Cell::Number(1.0)],
            vec![Cell::Empty, Cell::Empty, Cell::Text("x".into())],
        ]);
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
    }

    #[test]
    fn out_of_range_reads_are_empty() {
        let g = Grid::new();
        assert_eq!(*g.cell(100, 100), Cell::Empty);
    }

    #[test]
    fn set_grows_rows_and_columns() {
        let mut g = Grid::new();
        g.set(2, 4, Cell::Number(7.0));
        assert_eq!(g.height(), 3);
        assert_eq!(g.width(), 5);
        assert_eq!(*g.cell(2, 4), Cell::Number(7.0));
        assert_eq!(*g.cell(2, 3), Cell::Empty);
    }
}
