use itertools::Itertools;

use super::node::Node;
use super::variable_table::VariableSource;
use super::ShuntingYard;
use crate::error::FormulaError;

//..................................................................

/// A compiled formula, ready to be evaluated against any VariableSource.
///
/// Trees are cheap to build and are rebuilt whenever a formula is evaluated by a Spreadsheet;
/// nothing about them is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionTree {
    /// Infix expression as written, before it was compiled.
    pub expression_source: String,

    root: Node
}

impl ExpressionTree {

    /// Compile an infix expression using the standard operators.
    pub fn new<S>(expr_source: S) -> Result<ExpressionTree, FormulaError> where S: Into<String> {
        let source: String = expr_source.into();
        let shy: ShuntingYard = source.into();
        shy.compile()
    }

    pub(super) fn from_root(expression_source: String, root: Node) -> Self {
        ExpressionTree { expression_source, root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Evaluate the tree. Fails only if a variable cannot be looked up.
    pub fn evaluate<V>(&self, variables: &V) -> Result<f64, FormulaError>
    where V: VariableSource + ?Sized {
        self.root.evaluate(variables)
    }

    /// Distinct names of the variables the expression reads, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.root.collect_variables(&mut names);
        names.into_iter().unique().map(|name| name.to_string()).collect()
    }
}
