use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sheet::cell::DEFAULT_COLOR;
use crate::sheet::cell_name::CellName;
use crate::sheet::Spreadsheet;

fn default_color() -> u32 { DEFAULT_COLOR }

/// One saved cell. Only cells that differ from a new cell are saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub name: String,

    #[serde(default)]
    pub text: String,

    /// ARGB, written as 8 uppercase hex digits ("FF8000FF").
    #[serde(default = "default_color", with = "hex_color")]
    pub color: u32
}

/// A saved spreadsheet: `{ "cells": [ { "name": "B1", "text": "cat", "color": "FF8000FF" } ] }`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetDocument {
    #[serde(default)]
    pub cells: Vec<CellRecord>
}

impl SheetDocument {
    /// Snapshot the touched cells of a sheet, in row-major order.
    pub fn from_sheet(sheet: &Spreadsheet) -> Self {
        let cells = sheet
            .touched_cells()
            .map(|cell| CellRecord {
                name: cell.name().to_string(),
                text: cell.text().to_string(),
                color: cell.color()
            })
            .collect();
        SheetDocument { cells }
    }
}

mod hex_color {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&format!("{:08X}", color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        let hex = s.trim();
        if hex.is_empty() || hex.len() > 8 {
            return Err(D::Error::custom(format!("color '{}' must be at most 8 hex digits", s)));
        }
        u32::from_str_radix(hex, 16).map_err(|_| D::Error::custom(format!("color '{}' is not hex", s)))
    }
}

//..................................................................

/// Write every touched cell of the sheet as JSON.
pub fn save<W: Write>(sheet: &Spreadsheet, writer: W) -> Result<()> {
    let document = SheetDocument::from_sheet(sheet);
    serde_json::to_writer_pretty(writer, &document)?;
    info!(target: "persistence", "Saved {} cells", document.cells.len());
    Ok(())
}

/// Replace the contents of the sheet with a saved document, returning the number of cells loaded.
///
/// Every cell name is checked before the sheet is touched, so a document naming a malformed
/// or out-of-range cell fails and leaves the sheet as it was. Loading cannot be undone;
/// it clears the undo and redo history.
pub fn load<R: Read>(sheet: &mut Spreadsheet, reader: R) -> Result<usize> {
    let document: SheetDocument = serde_json::from_reader(reader)?;
    let positions = document
        .cells
        .iter()
        .map(|record| sheet.locate(&record.name))
        .collect::<Result<Vec<CellName>>>()?;

    sheet.clear();
    for (record, position) in document.cells.iter().zip(positions) {
        sheet.set_text(position.row, position.column, &record.text)?;
        sheet.set_color(&[(position.row, position.column)], record.color)?;
    }
    sheet.clear_history();
    info!(target: "persistence", "Loaded {} cells", document.cells.len());
    Ok(document.cells.len())
}

pub fn save_to_file<P: AsRef<Path>>(sheet: &Spreadsheet, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save(sheet, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_from_file<P: AsRef<Path>>(sheet: &mut Spreadsheet, path: P) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    load(sheet, reader)
}
