use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Largest column count that one-letter column names can address.
pub const MAX_COLUMNS: usize = 26;

/// Largest row count a grid may have.
pub const MAX_ROWS: usize = 65_536;

fn default_rows() -> usize { 50 }

fn default_columns() -> usize { MAX_COLUMNS }

/// Grid dimensions, fixed when a Spreadsheet is created.
///
/// Fields missing from a JSON config take their defaults, so `{}` yields a 50 x 26 grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,

    #[serde(default = "default_columns")]
    pub columns: usize
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig { rows: default_rows(), columns: default_columns() }
    }
}

impl SheetConfig {
    pub fn new(rows: usize, columns: usize) -> Self {
        SheetConfig { rows, columns }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SheetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Every cell must have a name: between 1 and 65536 rows, and between 1 and 26 columns.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.rows > MAX_ROWS || self.columns == 0 || self.columns > MAX_COLUMNS {
            return Err(SheetError::InvalidDimensions { rows: self.rows, columns: self.columns });
        }
        Ok(())
    }
}
