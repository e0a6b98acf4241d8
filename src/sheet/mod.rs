use std::collections::BTreeSet;

pub mod cell_name;
use cell_name::CellName;

pub mod cell;
use cell::{Cell, BAD_REFERENCE, CIRCULAR_REFERENCE, DEFAULT_COLOR, SELF_REFERENCE};

pub mod change;
use change::{CellAspect, CellChange, ChangeSet};

pub mod command;
use command::{Command, CommandLog};

use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use crate::graph::Graph;
use crate::parser::expression::ExpressionTree;
use crate::parser::variable_table::VariableTable;

/// Receives every change made to the sheet, after the call that made it has finished.
pub type Listener = Box<dyn FnMut(&CellChange)>;

/// What a cell's text works out to.
enum Resolution {
    /// Plain text (possibly empty) shown as is.
    Literal(String),

    /// A formula that evaluated, and the cells it read.
    Computed {
        value: String,
        dependencies: BTreeSet<usize>
    },

    /// A formula that cannot be evaluated; holds the sentinel to display.
    Failed(&'static str),

    /// A formula whose cells lead back to it. It stays subscribed to them so it
    /// recovers once the loop is broken.
    Circular {
        dependencies: BTreeSet<usize>
    }
}

//..................................................................

/// A grid of cells kept consistent with one another.
///
/// Setting a cell's text recompiles its formula, re-subscribes it to the cells the formula reads and
/// recomputes every cell downstream of it, depth first, before the call returns.
/// Formula failures never escape: they show up as sentinel values in the failing cell.
///
/// Cells are stored row-major; a cell's index in the dependency graph is `row * columns + column`.
/// An edge in the graph points from a cell to a cell whose formula reads it.
///
/// __Circular references__. Before a formula is evaluated, the cells it reads are searched for a path
/// back to its own cell. If one exists, the cell shows `"!(circular reference)"` and does not disturb
/// its dependents, so closing a loop leaves every other cell with its value from before the edit.
/// The circular cell stays subscribed to the cells it reads, so the graph holds the loop until an edit
/// breaks it; the cell is then downstream of that edit again and recomputes. While the loop holds,
/// any member reached by a later change is forced back to the sentinel.
pub struct Spreadsheet {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
    graph: Graph,
    history: CommandLog,
    listeners: Vec<Listener>
}

impl Spreadsheet {

    /// Create an empty grid. Fails if the dimensions cannot be addressed with one-letter column names.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        Self::from_config(&SheetConfig::new(rows, columns))
    }

    pub fn from_config(config: &SheetConfig) -> Result<Self> {
        config.validate()?;
        let (rows, columns) = (config.rows, config.columns);
        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(Cell::new(row, column));
            }
        }
        Ok(Spreadsheet {
            rows,
            columns,
            cells,
            graph: Graph::new(rows * columns),
            history: CommandLog::new(),
            listeners: vec![]
        })
    }

    pub fn row_count(&self) -> usize { self.rows }

    pub fn column_count(&self) -> usize { self.columns }

    fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    fn position(&self, index: usize) -> CellName {
        CellName::new(index / self.columns, index % self.columns)
    }

    fn checked_index(&self, row: usize, column: usize) -> Result<usize> {
        if row < self.rows && column < self.columns {
            Ok(self.index(row, column))
        } else {
            Err(SheetError::CellOutOfRange { row, column })
        }
    }

    /// Resolve an external cell name like "B3" to a position inside this grid.
    pub fn locate(&self, name: &str) -> Result<CellName> {
        let cell_name: CellName = name.parse()?;
        if cell_name.row < self.rows && cell_name.column < self.columns {
            Ok(cell_name)
        } else {
            Err(SheetError::OutOfBounds { name: name.to_string(), rows: self.rows, columns: self.columns })
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row < self.rows && column < self.columns {
            self.cells.get(self.index(row, column))
        } else {
            None
        }
    }

    pub fn cell_named(&self, name: &str) -> Result<&Cell> {
        let position = self.locate(name)?;
        Ok(&self.cells[self.index(position.row, position.column)])
    }

    pub fn text(&self, row: usize, column: usize) -> Result<&str> {
        let index = self.checked_index(row, column)?;
        Ok(self.cells[index].text())
    }

    pub fn value(&self, row: usize, column: usize) -> Result<&str> {
        let index = self.checked_index(row, column)?;
        Ok(self.cells[index].value())
    }

    pub fn color(&self, row: usize, column: usize) -> Result<u32> {
        let index = self.checked_index(row, column)?;
        Ok(self.cells[index].color())
    }

    /// Every cell whose text or color differs from a new cell, in row-major order.
    pub fn touched_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.has_been_changed())
    }

    /// Cells the formula in this cell currently reads.
    pub fn dependencies(&self, row: usize, column: usize) -> Result<Vec<CellName>> {
        let index = self.checked_index(row, column)?;
        Ok(self.graph.dependencies_of(index).into_iter().map(|i| self.position(i)).collect())
    }

    /// Cells whose formulas currently read this cell.
    pub fn dependents(&self, row: usize, column: usize) -> Result<Vec<CellName>> {
        let index = self.checked_index(row, column)?;
        Ok(self.graph.dependents_of(index).into_iter().map(|i| self.position(i)).collect())
    }

    pub fn add_listener<F>(&mut self, listener: F) where F: FnMut(&CellChange) + 'static {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, changes: &ChangeSet) {
        for listener in self.listeners.iter_mut() {
            for change in changes {
                listener(change);
            }
        }
    }

    //..................................................................
    // User edits. Each records a Command so it can be undone.

    /// Replace the text of a cell, recomputing it and everything downstream of it.
    /// Setting a cell to the text it already holds changes nothing and records nothing.
    pub fn set_text(&mut self, row: usize, column: usize, text: &str) -> Result<ChangeSet> {
        let index = self.checked_index(row, column)?;
        if self.cells[index].text == text {
            return Ok(ChangeSet::new());
        }
        let command = Command::TextChange {
            row,
            column,
            old_text: self.cells[index].text.clone(),
            new_text: text.to_string()
        };
        Ok(self.perform(command))
    }

    /// Apply one background color to several cells.
    /// Only cells whose color actually changes are part of the recorded command.
    pub fn set_color(&mut self, cells: &[(usize, usize)], color: u32) -> Result<ChangeSet> {
        let mut targets = Vec::new();
        let mut old_colors = Vec::new();
        for (row, column) in cells {
            let index = self.checked_index(*row, *column)?;
            let old_color = self.cells[index].color;
            if old_color != color && !targets.contains(&(*row, *column)) {
                targets.push((*row, *column));
                old_colors.push(old_color);
            }
        }
        if targets.is_empty() {
            return Ok(ChangeSet::new());
        }
        Ok(self.perform(Command::ColorChange { cells: targets, old_colors, new_color: color }))
    }

    fn perform(&mut self, command: Command) -> ChangeSet {
        let changes = command.execute(self);
        self.history.record(command);
        self.notify(&changes);
        changes
    }

    /// Reverse the most recent edit, if there is one.
    pub fn undo(&mut self) -> ChangeSet {
        match self.history.pop_undo() {
            Some(command) => {
                info!(target: "sheet::history", "{}", command.undo_message());
                let changes = command.unexecute(self);
                self.history.push_redo(command);
                self.notify(&changes);
                changes
            },
            None => ChangeSet::new()
        }
    }

    /// Re-apply the most recently undone edit, if there is one.
    pub fn redo(&mut self) -> ChangeSet {
        match self.history.pop_redo() {
            Some(command) => {
                info!(target: "sheet::history", "{}", command.redo_message());
                let changes = command.execute(self);
                self.history.push_undo(command);
                self.notify(&changes);
                changes
            },
            None => ChangeSet::new()
        }
    }

    pub fn undo_message(&self) -> Option<&'static str> { self.history.undo_message() }

    pub fn redo_message(&self) -> Option<&'static str> { self.history.redo_message() }

    pub fn undo_count(&self) -> usize { self.history.undo_count() }

    pub fn redo_count(&self) -> usize { self.history.redo_count() }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Reset every cell to empty text and the default color, and forget all history.
    pub fn clear(&mut self) -> ChangeSet {
        let touched: Vec<CellName> = self.touched_cells().map(Cell::name).collect();
        let mut changes = ChangeSet::new();
        for name in touched {
            changes.extend(self.apply_text(name.row, name.column, ""));
            changes.extend(self.apply_color(name.row, name.column, DEFAULT_COLOR));
        }
        self.history.clear();
        self.notify(&changes);
        changes
    }

    //..................................................................
    // Mutation without history, shared by edits, undo and redo.

    pub(crate) fn apply_text(&mut self, row: usize, column: usize, text: &str) -> ChangeSet {
        let index = self.index(row, column);
        let mut changes = ChangeSet::new();
        if self.cells[index].text != text {
            self.cells[index].text = text.to_string();
            changes.push(row, column, CellAspect::Text);
        }
        if self.recalculate(index, &mut changes) {
            self.propagate(index, &mut changes);
        }
        changes
    }

    pub(crate) fn apply_color(&mut self, row: usize, column: usize, color: u32) -> ChangeSet {
        let index = self.index(row, column);
        let mut changes = ChangeSet::new();
        if self.cells[index].color != color {
            self.cells[index].color = color;
            changes.push(row, column, CellAspect::Color);
        }
        changes
    }

    //..................................................................
    // Recalculation

    /// Work out what the text of a cell evaluates to, reading the current values of other cells.
    ///
    /// Outcomes in priority order: plain text, a formula that does not compile or names something
    /// that is not a cell in this grid (bad reference), a formula reading its own cell (self reference),
    /// a formula reading a cell that already depends on this one (circular reference), a number.
    fn resolve(&self, index: usize) -> Resolution {
        let cell = &self.cells[index];
        if !cell.is_formula() {
            return Resolution::Literal(cell.text.clone());
        }
        let text = &cell.text;
        let cell_name = self.position(index);
        let tree = match ExpressionTree::new(&text[1..]) {
            Ok(tree) => tree,
            Err(e) => {
                debug!(target: "sheet::recalc", "{}: formula '{}' does not compile: {}", cell_name, text, e);
                return Resolution::Failed(BAD_REFERENCE);
            }
        };

        let mut dependencies = BTreeSet::new();
        let mut variables = VariableTable::new();
        for name in tree.variables() {
            match self.locate(&name) {
                Ok(position) => {
                    let dependency = self.index(position.row, position.column);
                    variables.set_variable(name, self.cells[dependency].numeric_value());
                    dependencies.insert(dependency);
                },
                Err(e) => {
                    debug!(target: "sheet::recalc", "{}: {}", cell_name, e);
                    return Resolution::Failed(BAD_REFERENCE);
                }
            }
        }
        if dependencies.contains(&index) {
            return Resolution::Failed(SELF_REFERENCE);
        }
        if dependencies.iter().any(|dependency| self.graph.depends_on(*dependency, index)) {
            return Resolution::Circular { dependencies };
        }
        match tree.evaluate(&variables) {
            Ok(number) => Resolution::Computed { value: format_number(number), dependencies },
            Err(e) => {
                debug!(target: "sheet::recalc", "{}: {}", cell_name, e);
                Resolution::Failed(BAD_REFERENCE)
            }
        }
    }

    /// Recompute one cell and swap in its new subscriptions.
    /// Returns true if its dependents must be recomputed too.
    fn recalculate(&mut self, index: usize, changes: &mut ChangeSet) -> bool {
        let (value, dependencies, propagates) = match self.resolve(index) {
            Resolution::Literal(value) => (value, BTreeSet::new(), true),
            Resolution::Computed { value, dependencies } => (value, dependencies, true),
            Resolution::Failed(sentinel) => {
                warn!(target: "sheet::recalc", "{} is {}", self.position(index), sentinel);
                (sentinel.to_string(), BTreeSet::new(), true)
            },
            Resolution::Circular { dependencies } => {
                warn!(target: "sheet::recalc", "{} is {}", self.position(index), CIRCULAR_REFERENCE);
                (CIRCULAR_REFERENCE.to_string(), dependencies, false)
            }
        };
        self.graph.replace_dependencies(index, &dependencies);
        self.store_value(index, value, changes) && propagates
    }

    /// Returns true if the value differs from the one already stored.
    fn store_value(&mut self, index: usize, value: String, changes: &mut ChangeSet) -> bool {
        let cell = &mut self.cells[index];
        if cell.value == value {
            return false;
        }
        debug!(target: "sheet::recalc", "{} = {}", cell.name(), value);
        cell.value = value;
        changes.push(cell.row(), cell.column(), CellAspect::Value);
        true
    }

    /// Recompute everything downstream of a cell whose value changed, each cell after all the cells it reads.
    /// Cells found on a loop keep their subscriptions and show the circular sentinel.
    fn propagate(&mut self, index: usize, changes: &mut ChangeSet) {
        let (ordered, cyclic) = self.graph.downstream_order(index);
        for node in cyclic {
            warn!(target: "sheet::recalc", "{} is on a cycle of references", self.position(node));
            self.store_value(node, CIRCULAR_REFERENCE.to_string(), changes);
        }
        for node in ordered {
            self.recalculate(node, changes);
        }
    }
}

/// Shortest decimal text that reads back as the same number: 58, 4.2, -4, inf, NaN.
pub fn format_number(number: f64) -> String {
    format!("{}", number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[allow(unused_imports)]
    use spectral::prelude::*;

    fn sheet() -> Spreadsheet {
        Spreadsheet::new(50, 26).unwrap()
    }

    fn set(sheet: &mut Spreadsheet, name: &str, text: &str) -> ChangeSet {
        let position = sheet.locate(name).unwrap();
        sheet.set_text(position.row, position.column, text).unwrap()
    }

    fn value(sheet: &Spreadsheet, name: &str) -> String {
        sheet.cell_named(name).unwrap().value().to_string()
    }

    fn text(sheet: &Spreadsheet, name: &str) -> String {
        sheet.cell_named(name).unwrap().text().to_string()
    }

    #[test]
    fn literal_text_is_shown_verbatim() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "Hello");
        set(&mut sheet, "A2", " 12 ");
        assert_that(&value(&sheet, "A1")).is_equal_to("Hello".to_string());
        assert_that(&value(&sheet, "A2")).is_equal_to(" 12 ".to_string());
    }

    #[test]
    fn formula_reads_another_cell() {
        let mut sheet = sheet();
        set(&mut sheet, "B2", "15");
        set(&mut sheet, "C3", "=B2");
        assert_that(&value(&sheet, "C3")).is_equal_to("15".to_string());
        assert_that(&sheet.dependencies(2, 2).unwrap()).is_equal_to(vec![CellName::new(1, 1)]);
        assert_that(&sheet.dependents(1, 1).unwrap()).is_equal_to(vec![CellName::new(2, 2)]);
    }

    #[test]
    fn formula_arithmetic() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "=2+3*5");
        set(&mut sheet, "A2", "=(((2+3)-(4+5)))");
        set(&mut sheet, "A3", "= 10 / 4");
        assert_that(&value(&sheet, "A1")).is_equal_to("17".to_string());
        assert_that(&value(&sheet, "A2")).is_equal_to("-4".to_string());
        assert_that(&value(&sheet, "A3")).is_equal_to("2.5".to_string());
    }

    #[test]
    /// Empty cells and text that is not a number read as 0.
    fn non_numeric_values_read_as_zero() {
        let mut sheet = sheet();
        set(&mut sheet, "B1", "=A1");
        assert_that(&value(&sheet, "B1")).is_equal_to("0".to_string());
        set(&mut sheet, "C1", "Hello");
        set(&mut sheet, "D1", "=C1+1");
        assert_that(&value(&sheet, "D1")).is_equal_to("1".to_string());
    }

    #[test]
    fn divide_by_zero_is_a_value() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "=5/0");
        assert_that(&value(&sheet, "A1")).is_equal_to("inf".to_string());
        set(&mut sheet, "A2", "=A1*0");
        assert_that(&value(&sheet, "A2")).is_equal_to("NaN".to_string());
        set(&mut sheet, "A3", "=0-A1");
        assert_that(&value(&sheet, "A3")).is_equal_to("-inf".to_string());
    }

    #[test]
    /// A change flows through every cell downstream, each after the cells it reads.
    fn changes_propagate_transitively() {
        let mut sheet = sheet();
        set(&mut sheet, "B2", "15");
        set(&mut sheet, "C3", "=B2*2");
        set(&mut sheet, "D4", "=C3+B2");
        assert_that(&value(&sheet, "D4")).is_equal_to("45".to_string());

        let changes = set(&mut sheet, "B2", "5");
        assert_that(&value(&sheet, "C3")).is_equal_to("10".to_string());
        assert_that(&value(&sheet, "D4")).is_equal_to("15".to_string());
        assert_that(&changes.cells_with(CellAspect::Value)).is_equal_to(vec![(1, 1), (2, 2), (3, 3)]);
        assert!(changes.contains(1, 1, CellAspect::Text));
    }

    #[test]
    /// Editing a formula drops the subscriptions of the old one.
    fn rewriting_a_formula_replaces_subscriptions() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "1");
        set(&mut sheet, "A2", "2");
        set(&mut sheet, "B1", "=A1+A1");
        set(&mut sheet, "B1", "=A2");
        assert_that(&sheet.dependents(0, 0).unwrap()).is_equal_to(Vec::<CellName>::new());
        assert_that(&sheet.dependencies(0, 1).unwrap()).is_equal_to(vec![CellName::new(1, 0)]);

        let changes = set(&mut sheet, "A1", "100");
        assert_that(&value(&sheet, "B1")).is_equal_to("2".to_string());
        assert!(!changes.contains(0, 1, CellAspect::Value));

        set(&mut sheet, "B1", "plain");
        assert_that(&sheet.dependencies(0, 1).unwrap()).is_equal_to(Vec::<CellName>::new());
    }

    #[test]
    fn bad_references() {
        let mut sheet = sheet();
        for formula in &["=Z12345", "=Ba", "=Cell", "=A1+b2", "=4%2", "=(2+3", "=2+", "="] {
            set(&mut sheet, "B2", formula);
            asserting(&format!("value of {}", formula)).that(&value(&sheet, "B2")).is_equal_to(BAD_REFERENCE.to_string());
            asserting(&format!("text of {}", formula)).that(&text(&sheet, "B2")).is_equal_to(formula.to_string());
            assert!(sheet.dependencies(1, 1).unwrap().is_empty());
        }
    }

    #[test]
    fn self_reference_leaves_other_cells_alone() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "7");
        set(&mut sheet, "C1", "=A1");
        let changes = set(&mut sheet, "B2", "=A1+B2");
        assert_that(&value(&sheet, "B2")).is_equal_to(SELF_REFERENCE.to_string());
        assert_that(&value(&sheet, "A1")).is_equal_to("7".to_string());
        assert_that(&value(&sheet, "C1")).is_equal_to("7".to_string());
        assert_that(&changes.cells_with(CellAspect::Value)).is_equal_to(vec![(1, 1)]);
        assert!(sheet.dependencies(1, 1).unwrap().is_empty());
    }

    #[test]
    /// A bad reference changes the cell's value, so dependents recompute and read the sentinel as 0.
    fn error_values_propagate_as_zero() {
        let mut sheet = sheet();
        set(&mut sheet, "B1", "5");
        set(&mut sheet, "C1", "=B1+1");
        set(&mut sheet, "B1", "=Z999");
        assert_that(&value(&sheet, "C1")).is_equal_to("1".to_string());
        set(&mut sheet, "B1", "9");
        assert_that(&value(&sheet, "C1")).is_equal_to("10".to_string());
    }

    #[test]
    fn circular_reference_between_two_cells() {
        let mut sheet = sheet();
        set(&mut sheet, "B2", "=C3");
        set(&mut sheet, "C3", "=B2");
        assert_that(&value(&sheet, "B2")).is_equal_to("0".to_string());
        assert_that(&value(&sheet, "C3")).is_equal_to(CIRCULAR_REFERENCE.to_string());
        assert_that(&text(&sheet, "C3")).is_equal_to("=B2".to_string());
    }

    #[test]
    /// Closing a loop leaves the rest of the chain exactly as it was before the edit.
    fn circular_reference_keeps_chain_values() {
        let mut sheet = sheet();
        set(&mut sheet, "C3", "3");
        set(&mut sheet, "D4", "55");
        set(&mut sheet, "B2", "=C3 + D4");
        assert_that(&value(&sheet, "B2")).is_equal_to("58".to_string());

        let changes = set(&mut sheet, "C3", "=B2*2");
        assert_that(&value(&sheet, "C3")).is_equal_to(CIRCULAR_REFERENCE.to_string());
        assert_that(&value(&sheet, "B2")).is_equal_to("58".to_string());
        assert_that(&value(&sheet, "D4")).is_equal_to("55".to_string());
        assert_that(&changes.cells_with(CellAspect::Value)).is_equal_to(vec![(2, 2)]);
        assert_that(&sheet.dependencies(2, 2).unwrap()).is_equal_to(vec![CellName::new(1, 1)]);

        // Breaking the loop brings everything back.
        sheet.undo();
        assert_that(&value(&sheet, "C3")).is_equal_to("3".to_string());
        assert_that(&value(&sheet, "B2")).is_equal_to("58".to_string());
        set(&mut sheet, "C3", "4");
        assert_that(&value(&sheet, "B2")).is_equal_to("59".to_string());
    }

    #[test]
    /// A circular cell stays subscribed, so it recomputes once another cell's edit breaks the loop.
    fn circular_cell_recovers_when_loop_is_broken_elsewhere() {
        let mut sheet = sheet();
        set(&mut sheet, "C3", "3");
        set(&mut sheet, "D4", "55");
        set(&mut sheet, "B2", "=C3 + D4");
        set(&mut sheet, "C3", "=B2*2");
        assert_that(&value(&sheet, "C3")).is_equal_to(CIRCULAR_REFERENCE.to_string());

        let changes = set(&mut sheet, "B2", "5");
        assert_that(&value(&sheet, "B2")).is_equal_to("5".to_string());
        assert_that(&value(&sheet, "C3")).is_equal_to("10".to_string());
        assert!(changes.contains(2, 2, CellAspect::Value));
        assert_that(&text(&sheet, "C3")).is_equal_to("=B2*2".to_string());
    }

    #[test]
    /// A change reaching a loop that still holds marks the members it reaches as circular.
    fn change_upstream_of_a_loop_keeps_it_circular() {
        let mut sheet = sheet();
        set(&mut sheet, "C3", "3");
        set(&mut sheet, "D4", "55");
        set(&mut sheet, "B2", "=C3 + D4");
        set(&mut sheet, "E5", "=B2");
        set(&mut sheet, "C3", "=B2*2");

        let changes = set(&mut sheet, "D4", "1");
        assert_that(&value(&sheet, "B2")).is_equal_to(CIRCULAR_REFERENCE.to_string());
        assert_that(&value(&sheet, "C3")).is_equal_to(CIRCULAR_REFERENCE.to_string());
        // Cells reading a loop member see the sentinel as 0.
        assert_that(&value(&sheet, "E5")).is_equal_to("0".to_string());
        assert!(changes.contains(1, 1, CellAspect::Value));
        assert_that(&sheet.dependencies(1, 1).unwrap()).is_equal_to(vec![CellName::new(2, 2), CellName::new(3, 3)]);

        // Replacing the closing formula with a number brings the whole chain back.
        set(&mut sheet, "C3", "7");
        assert_that(&value(&sheet, "B2")).is_equal_to("8".to_string());
        assert_that(&value(&sheet, "E5")).is_equal_to("8".to_string());
    }

    #[test]
    fn longer_cycles_are_detected() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "=A2+1");
        set(&mut sheet, "A2", "=A3+1");
        set(&mut sheet, "A3", "=A1+1");
        assert_that(&value(&sheet, "A3")).is_equal_to(CIRCULAR_REFERENCE.to_string());
        assert_that(&value(&sheet, "A2")).is_equal_to("1".to_string());
        assert_that(&value(&sheet, "A1")).is_equal_to("2".to_string());
    }

    #[test]
    fn undo_and_redo_text() {
        let mut sheet = sheet();
        set(&mut sheet, "B2", "15");
        set(&mut sheet, "C3", "=B2");
        set(&mut sheet, "B2", "20");
        assert_that(&value(&sheet, "C3")).is_equal_to("20".to_string());

        assert_that(&sheet.undo_message()).is_equal_to(Some("Undo cell text change"));
        let changes = sheet.undo();
        assert_that(&text(&sheet, "B2")).is_equal_to("15".to_string());
        assert_that(&value(&sheet, "C3")).is_equal_to("15".to_string());
        assert!(changes.contains(2, 2, CellAspect::Value));

        assert_that(&sheet.redo_message()).is_equal_to(Some("Redo cell text change"));
        sheet.redo();
        assert_that(&text(&sheet, "B2")).is_equal_to("20".to_string());
        assert_that(&value(&sheet, "C3")).is_equal_to("20".to_string());

        sheet.undo();
        sheet.undo();
        assert_that(&text(&sheet, "C3")).is_equal_to("".to_string());
        assert_that(&value(&sheet, "C3")).is_equal_to("".to_string());
        assert_that(&sheet.redo_count()).is_equal_to(2);

        // A fresh edit after an undo discards the forward history.
        set(&mut sheet, "A1", "x");
        assert_that(&sheet.redo_count()).is_equal_to(0);
        assert!(sheet.redo().is_empty());
        assert_that(&sheet.undo_count()).is_equal_to(2);
    }

    #[test]
    fn undo_with_empty_history_does_nothing() {
        let mut sheet = sheet();
        assert!(sheet.undo().is_empty());
        assert!(sheet.redo().is_empty());
        assert_that(&sheet.undo_message()).is_none();
    }

    #[test]
    fn unchanged_text_records_nothing() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "1");
        let changes = set(&mut sheet, "A1", "1");
        assert!(changes.is_empty());
        assert_that(&sheet.undo_count()).is_equal_to(1);
    }

    #[test]
    /// Undoing a bulk color change restores each cell's own prior color.
    fn bulk_color_change() {
        let mut sheet = sheet();
        sheet.set_color(&[(0, 0)], 0xFF00_00FF).unwrap();
        let changes = sheet.set_color(&[(0, 0), (0, 1), (0, 1)], 0xFF80_00FF).unwrap();
        assert_that(&changes.cells_with(CellAspect::Color)).is_equal_to(vec![(0, 0), (0, 1)]);
        assert_that(&sheet.color(0, 0).unwrap()).is_equal_to(0xFF80_00FF);
        assert_that(&sheet.color(0, 1).unwrap()).is_equal_to(0xFF80_00FF);

        assert_that(&sheet.undo_message()).is_equal_to(Some("Undo background color change"));
        sheet.undo();
        assert_that(&sheet.color(0, 0).unwrap()).is_equal_to(0xFF00_00FF);
        assert_that(&sheet.color(0, 1).unwrap()).is_equal_to(DEFAULT_COLOR);

        assert_that(&sheet.redo_message()).is_equal_to(Some("Redo background color change"));
        sheet.redo();
        assert_that(&sheet.color(0, 1).unwrap()).is_equal_to(0xFF80_00FF);

        // Nothing changes color, so nothing is recorded.
        let before = sheet.undo_count();
        assert!(sheet.set_color(&[(0, 0), (0, 1)], 0xFF80_00FF).unwrap().is_empty());
        assert_that(&sheet.undo_count()).is_equal_to(before);
    }

    #[test]
    fn out_of_range_edits_fail() {
        let mut sheet = Spreadsheet::new(3, 3).unwrap();
        match sheet.set_text(3, 0, "x") {
            Err(SheetError::CellOutOfRange { row: 3, column: 0 }) => (),
            other => assert!(false, "Expected CellOutOfRange, got {:?}", other)
        }
        assert!(sheet.set_color(&[(0, 0), (0, 7)], 1).is_err());
        assert_that(&sheet.color(0, 0).unwrap()).is_equal_to(DEFAULT_COLOR);
        match sheet.locate("D1") {
            Err(SheetError::OutOfBounds { rows: 3, columns: 3, .. }) => (),
            other => assert!(false, "Expected OutOfBounds, got {:?}", other)
        }
        assert!(sheet.cell(0, 3).is_none());
    }

    #[test]
    fn invalid_dimensions() {
        assert!(Spreadsheet::new(0, 5).is_err());
        assert!(Spreadsheet::new(5, 27).is_err());
        match Spreadsheet::new(usize::max_value(), 26) {
            Err(SheetError::InvalidDimensions { columns: 26, .. }) => (),
            Err(other) => assert!(false, "Expected InvalidDimensions, got {:?}", other),
            Ok(_) => assert!(false, "A grid too large to allocate was accepted")
        }
    }

    #[test]
    fn listeners_see_every_change() {
        let mut sheet = sheet();
        let seen: Rc<RefCell<Vec<CellChange>>> = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        sheet.add_listener(move |change| sink.borrow_mut().push(*change));

        set(&mut sheet, "A1", "2");
        set(&mut sheet, "A2", "=A1*A1");
        sheet.set_color(&[(0, 0)], 0).unwrap();
        sheet.undo();

        let aspects: Vec<(String, CellAspect)> = seen
            .borrow()
            .iter()
            .map(|change| (change.name().to_string(), change.aspect))
            .collect();
        assert_that(&aspects).is_equal_to(vec![
            ("A1".to_string(), CellAspect::Text),
            ("A1".to_string(), CellAspect::Value),
            ("A2".to_string(), CellAspect::Text),
            ("A2".to_string(), CellAspect::Value),
            ("A1".to_string(), CellAspect::Color),
            ("A1".to_string(), CellAspect::Color),
        ]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut sheet = sheet();
        set(&mut sheet, "A1", "2");
        set(&mut sheet, "A2", "=A1*3");
        sheet.set_color(&[(4, 4)], 0xFF00_FF00).unwrap();
        assert_that(&sheet.touched_cells().count()).is_equal_to(3);

        sheet.clear();
        assert_that(&sheet.touched_cells().count()).is_equal_to(0);
        assert_that(&value(&sheet, "A2")).is_equal_to("".to_string());
        assert!(sheet.dependents(0, 0).unwrap().is_empty());
        assert_that(&sheet.undo_count()).is_equal_to(0);
        assert_that(&sheet.redo_count()).is_equal_to(0);
    }
}
