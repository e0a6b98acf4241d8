use super::cell_name::CellName;

/// Background color of a cell nobody has colored: opaque white, packed ARGB.
pub const DEFAULT_COLOR: u32 = 0xFFFF_FFFF;

/// Value of a formula that names a cell outside the grid, names something that is not a cell,
/// or cannot be compiled.
pub const BAD_REFERENCE: &str = "!(bad reference)";

/// Value of a formula that reads its own cell.
pub const SELF_REFERENCE: &str = "!(self reference)";

/// Value of a formula that would close a loop of references.
pub const CIRCULAR_REFERENCE: &str = "!(circular reference)";

//..................................................................

/// One grid location.
///
/// Only `text` and `color` are ever set from outside; `value` is always recomputed by the Spreadsheet
/// from `text` and the values of the cells the formula reads.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    row: usize,
    column: usize,
    pub(super) text: String,
    pub(super) value: String,
    pub(super) color: u32
}

impl Cell {
    pub fn new(row: usize, column: usize) -> Self {
        Cell {
            row,
            column,
            text: String::new(),
            value: String::new(),
            color: DEFAULT_COLOR
        }
    }

    pub fn row(&self) -> usize { self.row }

    pub fn column(&self) -> usize { self.column }

    pub fn name(&self) -> CellName { CellName::new(self.row, self.column) }

    /// Raw input, which starts with '=' for a formula.
    pub fn text(&self) -> &str { &self.text }

    /// Display-ready result of the text.
    pub fn value(&self) -> &str { &self.value }

    pub fn color(&self) -> u32 { self.color }

    /// True if the cell differs from a freshly created one, so it must be saved.
    pub fn has_been_changed(&self) -> bool {
        !self.text.is_empty() || self.color != DEFAULT_COLOR
    }

    pub fn is_formula(&self) -> bool {
        self.text.starts_with('=')
    }

    /// True if the value is one of the error sentinels.
    pub fn is_error(&self) -> bool {
        is_sentinel(&self.value)
    }

    /// The value read as a number by formulas in other cells. Empty or non-numeric values read as 0.
    pub fn numeric_value(&self) -> f64 {
        self.value.trim().parse::<f64>().unwrap_or(0.0)
    }
}

pub fn is_sentinel(value: &str) -> bool {
    value == BAD_REFERENCE || value == SELF_REFERENCE || value == CIRCULAR_REFERENCE
}
