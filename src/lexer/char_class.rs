use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use itertools::put_back;

use crate::parser::operator::OperatorRegistry;

/// Divides the characters of a formula into the roles they can play in the lexical analyzer.
///
/// Letters, digits and the period all accumulate into operands (numbers or cell names).
/// Parentheses group, and a character is an operator only if the registry in use knows it,
/// so adding an operator to a registry is all it takes for the lexer to accept it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CharClass {
    Space,
    Operand(char),
    OpenParenthesis,
    CloseParenthesis,
    Operator(char),
    Other(char)
}

impl CharClass {
    pub fn classify(c: char, operators: &OperatorRegistry) -> CharClass {
        match c {
            '(' => CharClass::OpenParenthesis,
            ')' => CharClass::CloseParenthesis,
            '.' => CharClass::Operand(c),
            _ if c.is_whitespace() => CharClass::Space,
            _ if c.is_alphanumeric() => CharClass::Operand(c),
            _ if operators.is_operator(c) => CharClass::Operator(c),
            _ => CharClass::Other(c)
        }
    }

    pub fn is_operand(&self) -> bool {
        match self {
            CharClass::Operand(_) => true,
            _ => false
        }
    }
}

impl Display for CharClass {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let c: char = (*self).into();
        write!(f, "{}", c)
    }
}

impl From<CharClass> for char {
    fn from(item: CharClass) -> Self {
        match item {
            CharClass::Space => ' ',
            CharClass::Operand(c) => c,
            CharClass::OpenParenthesis => '(',
            CharClass::CloseParenthesis => ')',
            CharClass::Operator(c) => c,
            CharClass::Other(c) => c
        }
    }
}

/// CharClassIterator walks a formula and classifies each character.
/// A classified character may be put back so the lexer can end a token on the character that follows it.
pub struct CharClassIterator<'e> {
    char_iter: itertools::PutBack<std::str::Chars<'e>>,

    operators: &'e OperatorRegistry,

    /// Number of characters consumed so far. Putting back a character decrements it.
    position: usize
}

impl<'e> CharClassIterator<'e> {
    pub fn new(s: &'e str, operators: &'e OperatorRegistry) -> CharClassIterator<'e> {
        CharClassIterator {
            char_iter: put_back(s.chars()),
            operators,
            position: 0
        }
    }

    pub fn put_back(&mut self, e: CharClass) {
        self.position -= 1;
        self.char_iter.put_back(e.into());
    }

    pub fn current_position(&self) -> usize {
        self.position
    }
}

impl<'e> Iterator for CharClassIterator<'e> {
    type Item = CharClass;
    fn next(&mut self) -> Option<CharClass> {
        let c = self.char_iter.next()?;
        self.position += 1;
        Some(CharClass::classify(c, self.operators))
    }
}
