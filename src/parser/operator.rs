use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result};

use super::associativity::Associativity;
use crate::error::FormulaError;

//..................................................................

/// An Operator is a binary arithmetic operator that may be applied to two numeric operands.
///
/// Each Operator carries its precedence (a higher number binds more tightly), its associativity
/// and the rule that computes its result, so neither the ShuntingYard nor the evaluator
/// needs to know which operators exist.
#[derive(Copy, Clone)]
pub struct Operator {
    pub symbol: char,
    pub precedence: u8,
    pub associativity: Associativity,
    rule: fn(f64, f64) -> f64
}

impl Operator {
    pub fn new(symbol: char, precedence: u8, associativity: Associativity, rule: fn(f64, f64) -> f64) -> Self {
        Operator { symbol, precedence, associativity, rule }
    }

    /// Apply the operator to its left and right operands.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        (self.rule)(left, right)
    }

    /// True if this operator, waiting on the operator stack, must be output before `incoming` is pushed.
    pub fn outranks(&self, incoming: &Operator) -> bool {
        self.precedence > incoming.precedence
            || (self.precedence == incoming.precedence && self.associativity.yields_to_equal_precedence())
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.precedence == other.precedence
            && self.associativity == other.associativity
    }
}

impl Debug for Operator {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "Operator('{}', precedence {}, {})", self.symbol, self.precedence, self.associativity)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.symbol)
    }
}

//..................................................................

/// OperatorRegistry maps an operator symbol to its Operator.
///
/// The standard registry holds `+` and `-` (precedence 2) and `*` and `/` (precedence 3), all left associative.
/// Division follows IEEE-754, so dividing by zero yields an infinity or NaN rather than an error.
#[derive(Clone, Debug)]
pub struct OperatorRegistry {
    operators: HashMap<char, Operator>
}

impl OperatorRegistry {
    /// A registry with no operators at all.
    pub fn empty() -> Self {
        OperatorRegistry { operators: HashMap::new() }
    }

    pub fn standard() -> Self {
        let mut registry = OperatorRegistry::empty();
        registry.register(Operator::new('+', 2, Associativity::Left, |l, r| l + r));
        registry.register(Operator::new('-', 2, Associativity::Left, |l, r| l - r));
        registry.register(Operator::new('*', 3, Associativity::Left, |l, r| l * r));
        registry.register(Operator::new('/', 3, Associativity::Left, |l, r| l / r));
        registry
    }

    /// Add an operator, or replace the one already registered for its symbol.
    /// Returns the replaced operator, if any.
    pub fn register(&mut self, op: Operator) -> Option<Operator> {
        self.operators.insert(op.symbol, op)
    }

    pub fn is_operator(&self, symbol: char) -> bool {
        self.operators.contains_key(&symbol)
    }

    /// Look up the operator for the given symbol.
    pub fn create(&self, symbol: char) -> std::result::Result<Operator, FormulaError> {
        self.operators.get(&symbol).copied().ok_or(FormulaError::UnsupportedOperator(symbol))
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        OperatorRegistry::standard()
    }
}

lazy_static! {
    static ref STANDARD_OPERATORS: OperatorRegistry = OperatorRegistry::standard();
}

/// The shared registry of the four arithmetic operators.
pub fn standard_operators() -> &'static OperatorRegistry {
    &STANDARD_OPERATORS
}
