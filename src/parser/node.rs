use std::fmt::{Display, Formatter, Result};

use super::operator::Operator;
use super::variable_table::VariableSource;
use crate::error::FormulaError;

//..................................................................

/// A node of an evaluable expression tree.
///
/// The set of node kinds is closed. A BinaryOp owns both of its children,
/// so an operator can never be evaluated with an operand missing.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Constant(f64),
    Variable(String),
    BinaryOp {
        operator: Operator,
        left: Box<Node>,
        right: Box<Node>
    }
}

impl Node {
    pub fn binary(operator: Operator, left: Node, right: Node) -> Node {
        Node::BinaryOp { operator, left: Box::new(left), right: Box::new(right) }
    }

    /// Compute the value of the tree rooted at this node, looking up variables in `variables`.
    pub fn evaluate<V>(&self, variables: &V) -> std::result::Result<f64, FormulaError>
    where V: VariableSource + ?Sized {
        match self {
            Node::Constant(value) => Ok(*value),
            Node::Variable(name) => variables
                .lookup(name)
                .ok_or_else(|| FormulaError::UndefinedVariable(name.clone())),
            Node::BinaryOp { operator, left, right } => {
                let l = left.evaluate(variables)?;
                let r = right.evaluate(variables)?;
                Ok(operator.apply(l, r))
            }
        }
    }

    /// Append the name of every variable in the tree to `names`, left to right, repeats included.
    pub fn collect_variables<'n>(&'n self, names: &mut Vec<&'n str>) {
        match self {
            Node::Constant(_) => (),
            Node::Variable(name) => names.push(name),
            Node::BinaryOp { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
        }
    }
}

impl Display for Node {
    /// Fully parenthesized infix form.
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Node::Constant(value) => write!(f, "{}", value),
            Node::Variable(name) => write!(f, "{}", name),
            Node::BinaryOp { operator, left, right } => write!(f, "({}{}{})", left, operator, right)
        }
    }
}
