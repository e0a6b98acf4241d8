use std::fmt::{Display, Formatter, Result};
use std::str::FromStr;

use regex::Regex;

use crate::error::SheetError;

lazy_static! {
    /// One column letter followed by a row number.
    static ref CELL_NAME: Regex = Regex::new(r"^(?P<column>[A-Z])(?P<row>[0-9]+)$").unwrap();
}

//..................................................................

/// Zero-based position of a cell, parsed from or displayed as its external name ("B3" is row 2, column 1).
///
/// Parsing only checks the format. Whether the position falls inside a particular grid
/// is decided by Spreadsheet::locate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellName {
    pub row: usize,
    pub column: usize
}

impl CellName {
    pub fn new(row: usize, column: usize) -> Self {
        CellName { row, column }
    }

    /// Letter for a column index; columns past Z have none.
    pub fn column_letter(column: usize) -> Option<char> {
        if column < 26 { Some((b'A' + column as u8) as char) } else { None }
    }
}

impl FromStr for CellName {
    type Err = SheetError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = || SheetError::MalformedCellName(name.to_string());
        let caps = CELL_NAME.captures(name).ok_or_else(malformed)?;
        let column = caps["column"].bytes().next().map(|c| (c - b'A') as usize).ok_or_else(malformed)?;
        let row = caps["row"]
            .parse::<usize>()
            .ok()
            .and_then(|row| row.checked_sub(1))
            .ok_or_else(malformed)?;
        Ok(CellName { row, column })
    }
}

impl Display for CellName {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match CellName::column_letter(self.column) {
            Some(letter) => write!(f, "{}{}", letter, self.row + 1),
            None => write!(f, "R{}C{}", self.row + 1, self.column + 1)
        }
    }
}
