use std::collections::HashMap;

//..................................................................

/// Anything that can supply the numeric value of a named variable while an expression is evaluated.
/// Returning None means the name is unknown, which makes evaluation fail with UndefinedVariable.
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<F> VariableSource for F
where F: Fn(&str) -> Option<f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

/// VariableTable holds variable values for evaluating expressions outside of a spreadsheet.
#[derive(Clone, Debug, Default)]
pub struct VariableTable {
    variables: HashMap<String, f64>
}

impl VariableTable {
    pub fn new() -> Self {
        VariableTable { variables: HashMap::new() }
    }

    /// Store a new value for the variable.
    pub fn set_variable<S>(&mut self, name: S, value: f64)
    where S: Into<String> {
        self.variables.insert(name.into(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Forget every variable.
    pub fn clear(&mut self) {
        self.variables.clear();
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableSource for VariableTable {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get_variable(name)
    }
}
