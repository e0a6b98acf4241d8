use std::slice::Iter;

use super::cell_name::CellName;

//..................................................................

// The part of a cell a change notification is about.
custom_derive! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumDisplay, EnumFromStr, IterVariants(CellAspectVariants))]
    pub enum CellAspect {
        Text,
        Value,
        Color
    }
}

/// Notification that one aspect of one cell changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub row: usize,
    pub column: usize,
    pub aspect: CellAspect
}

impl CellChange {
    pub fn name(&self) -> CellName {
        CellName::new(self.row, self.column)
    }
}

/// Every change made by one call into the Spreadsheet, in the order they happened.
///
/// A cell whose value is recomputed but comes out the same is not reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet {
    changes: Vec<CellChange>
}

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet { changes: vec![] }
    }

    pub fn push(&mut self, row: usize, column: usize, aspect: CellAspect) {
        self.changes.push(CellChange { row, column, aspect });
    }

    pub fn extend(&mut self, other: ChangeSet) {
        self.changes.extend(other.changes);
    }

    pub fn contains(&self, row: usize, column: usize, aspect: CellAspect) -> bool {
        self.changes.iter().any(|c| c.row == row && c.column == column && c.aspect == aspect)
    }

    /// Positions of the cells whose `aspect` changed, in order of first change.
    pub fn cells_with(&self, aspect: CellAspect) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for change in self.changes.iter().filter(|c| c.aspect == aspect) {
            if !cells.contains(&(change.row, change.column)) {
                cells.push((change.row, change.column));
            }
        }
        cells
    }

    pub fn iter(&self) -> Iter<CellChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a CellChange;
    type IntoIter = Iter<'a, CellChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
