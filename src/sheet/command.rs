use super::change::ChangeSet;
use super::Spreadsheet;

//..................................................................

/// One reversible edit.
///
/// `execute` and `unexecute` are exact inverses: applying one after the other
/// leaves every cell's text, value and color as it was.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Text of a single cell replaced.
    TextChange {
        row: usize,
        column: usize,
        old_text: String,
        new_text: String
    },

    /// One color applied to several cells that may each have started with a different color.
    /// `old_colors[i]` is the prior color of `cells[i]`.
    ColorChange {
        cells: Vec<(usize, usize)>,
        old_colors: Vec<u32>,
        new_color: u32
    }
}

impl Command {
    /// Apply the edit.
    pub fn execute(&self, sheet: &mut Spreadsheet) -> ChangeSet {
        match self {
            Command::TextChange { row, column, new_text, .. } => sheet.apply_text(*row, *column, new_text),
            Command::ColorChange { cells, new_color, .. } => {
                let mut changes = ChangeSet::new();
                for (row, column) in cells {
                    changes.extend(sheet.apply_color(*row, *column, *new_color));
                }
                changes
            }
        }
    }

    /// Reverse the edit.
    pub fn unexecute(&self, sheet: &mut Spreadsheet) -> ChangeSet {
        match self {
            Command::TextChange { row, column, old_text, .. } => sheet.apply_text(*row, *column, old_text),
            Command::ColorChange { cells, old_colors, .. } => {
                let mut changes = ChangeSet::new();
                for ((row, column), old_color) in cells.iter().zip(old_colors.iter()) {
                    changes.extend(sheet.apply_color(*row, *column, *old_color));
                }
                changes
            }
        }
    }

    pub fn undo_message(&self) -> &'static str {
        match self {
            Command::TextChange { .. } => "Undo cell text change",
            Command::ColorChange { .. } => "Undo background color change"
        }
    }

    pub fn redo_message(&self) -> &'static str {
        match self {
            Command::TextChange { .. } => "Redo cell text change",
            Command::ColorChange { .. } => "Redo background color change"
        }
    }
}

//..................................................................

/// The undo and redo stacks.
///
/// Recording a new command clears the redo stack: once the timeline branches, forward history is gone.
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>
}

impl CommandLog {
    pub fn new() -> Self {
        CommandLog { undo_stack: vec![], redo_stack: vec![] }
    }

    /// Remember a command the user just executed.
    pub fn record(&mut self, command: Command) {
        self.redo_stack.clear();
        self.undo_stack.push(command);
    }

    pub(super) fn pop_undo(&mut self) -> Option<Command> {
        self.undo_stack.pop()
    }

    pub(super) fn push_undo(&mut self, command: Command) {
        self.undo_stack.push(command);
    }

    pub(super) fn pop_redo(&mut self) -> Option<Command> {
        self.redo_stack.pop()
    }

    pub(super) fn push_redo(&mut self, command: Command) {
        self.redo_stack.push(command);
    }

    /// Label for the command the next undo would reverse.
    pub fn undo_message(&self) -> Option<&'static str> {
        self.undo_stack.last().map(Command::undo_message)
    }

    /// Label for the command the next redo would re-apply.
    pub fn redo_message(&self) -> Option<&'static str> {
        self.redo_stack.last().map(Command::redo_message)
    }

    pub fn undo_count(&self) -> usize { self.undo_stack.len() }

    pub fn redo_count(&self) -> usize { self.redo_stack.len() }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
