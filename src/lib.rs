//! A spreadsheet formula engine: named cells holding text or `=` formulas over the four
//! arithmetic operators, recomputed incrementally as the cells they read change,
//! with undo and redo of every edit.

extern crate itertools;
#[macro_use] extern crate custom_derive;
#[macro_use] extern crate enum_derive;
extern crate regex;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[allow(unused_macros)]
#[cfg(test)]
extern crate spectral;

pub mod error;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod graph;
pub mod sheet;
pub mod persistence;

pub use config::SheetConfig;
pub use error::{FormulaError, SheetError};
pub use parser::expression::ExpressionTree;
pub use parser::variable_table::{VariableSource, VariableTable};
pub use parser::ShuntingYard;
pub use sheet::cell_name::CellName;
pub use sheet::change::{CellAspect, CellChange, ChangeSet};
pub use sheet::Spreadsheet;
