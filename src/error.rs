//! Error types for cellcalc.

use thiserror::Error;

/// Failures while compiling or evaluating a formula.
///
/// Inside a Spreadsheet these never reach the caller: a cell whose formula fails
/// shows an error sentinel instead of a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unsupported operator '{0}'")]
    UnsupportedOperator(char),

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Variable '{0}' has not been defined")]
    UndefinedVariable(String),

    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
}

/// Failures at the boundary between the engine and its host or storage.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Malformed cell name '{0}' (expected a column letter A-Z followed by a row number)")]
    MalformedCellName(String),

    #[error("Cell {name} is outside the {rows}x{columns} grid")]
    OutOfBounds {
        name: String,
        rows: usize,
        columns: usize,
    },

    #[error("Cell at row {row}, column {column} is outside the grid")]
    CellOutOfRange { row: usize, column: usize },

    #[error("Invalid grid dimensions {rows}x{columns} (need 1 to 65536 rows and 1 to 26 columns)")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
