use std::mem;

pub mod char_class;
use char_class::{CharClass, CharClassIterator};

pub mod formula_token;
use formula_token::FormulaToken;

use crate::parser::operator::OperatorRegistry;

// Tokenizer pieces:
//    - CharClass: the role a single character plays (see char_class.rs)
//    - FormulaToken: a whole operand, operator or parenthesis (see formula_token.rs)
//    - Lexer: groups classified characters into FormulaTokens

//..................................................................

/// Lexer breaks a formula (without its leading '=') into FormulaTokens for the ShuntingYard.
///
/// Whitespace is discarded wherever it occurs, even inside an operand, so "B 2" is read as "B2".
/// The first unsupported character is yielded as FormulaToken::Unsupported and ends the token stream.
pub struct Lexer<'e> {
    events: CharClassIterator<'e>,

    /// Construction site for the next operand, built up one character at a time.
    next_token: String,

    /// Set once an Unsupported token has been yielded.
    stopped: bool
}

impl<'e> Lexer<'e> {

    /// Create a new Lexer over the given formula, classifying operators with the given registry.
    pub fn new(s: &'e str, operators: &'e OperatorRegistry) -> Lexer<'e> {
        Lexer {
            events: CharClassIterator::new(s, operators),
            next_token: String::new(),
            stopped: false
        }
    }

    /// Character position of the last character consumed.
    pub fn position(&self) -> usize { self.events.current_position() }

    /// Return the operand accumulated so far, leaving an empty string in its place.
    fn yield_operand(&mut self) -> FormulaToken {
        FormulaToken::Operand(mem::replace(&mut self.next_token, String::new()))
    }
}

impl<'e> Iterator for Lexer<'e> {
    type Item = FormulaToken;
    fn next(&mut self) -> Option<FormulaToken> {
        if self.stopped {
            return None;
        }
        while let Some(event) = self.events.next() {
            match event {
                CharClass::Space => continue,
                CharClass::Operand(c) => {
                    self.next_token.push(c);
                    continue;
                },
                _ if !self.next_token.is_empty() => {
                    // The operand ends here; the character that ended it is read again next time.
                    self.events.put_back(event);
                    return Some(self.yield_operand());
                },
                CharClass::OpenParenthesis => return Some(FormulaToken::OpenParenthesis),
                CharClass::CloseParenthesis => return Some(FormulaToken::CloseParenthesis),
                CharClass::Operator(op) => return Some(FormulaToken::Operator(op)),
                CharClass::Other(c) => {
                    self.stopped = true;
                    return Some(FormulaToken::Unsupported(c));
                }
            }
        }
        if self.next_token.is_empty() { None } else { Some(self.yield_operand()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::operator::standard_operators;

    #[allow(unused_imports)]
    use spectral::prelude::*;

    fn tokens(expression: &str) -> Vec<FormulaToken> {
        Lexer::new(expression, standard_operators()).collect()
    }

    fn operand(s: &str) -> FormulaToken { FormulaToken::Operand(s.to_string()) }

    #[test]
    fn lex_cell_references_and_numbers() {
        assert_that(&tokens("B2 + 20")).is_equal_to(vec![
            operand("B2"),
            FormulaToken::Operator('+'),
            operand("20")
        ]);
    }

    #[test]
    /// Whitespace, including newlines, is stripped before operands are assembled.
    fn lex_strips_all_whitespace() {
        assert_that(&tokens("1.4          *      \n3")).is_equal_to(vec![
            operand("1.4"),
            FormulaToken::Operator('*'),
            operand("3")
        ]);
        assert_that(&tokens(" B 2 ")).is_equal_to(vec![operand("B2")]);
    }

    #[test]
    fn lex_parentheses() {
        assert_that(&tokens("(2+3)*C1")).is_equal_to(vec![
            FormulaToken::OpenParenthesis,
            operand("2"),
            FormulaToken::Operator('+'),
            operand("3"),
            FormulaToken::CloseParenthesis,
            FormulaToken::Operator('*'),
            operand("C1")
        ]);
    }

    #[test]
    /// The first unsupported character ends the token stream.
    fn lex_stops_at_unsupported_character() {
        let actual = tokens("4%2+1");
        assert_that(&actual).is_equal_to(vec![operand("4"), FormulaToken::Unsupported('%')]);
        asserting("last token is an error").that(&actual[1].is_error()).is_true();
        assert_that(&actual[1].name()).is_equal_to("Unsupported");
    }

    #[test]
    /// Position counts characters consumed, including whitespace.
    fn position_of_unsupported_character() {
        let mut lexer = Lexer::new("B2 + 4 % 2", standard_operators());
        let found: Vec<FormulaToken> = lexer.by_ref().collect();
        assert_that(&found.last()).is_equal_to(Some(&FormulaToken::Unsupported('%')));
        assert_that(&lexer.position()).is_equal_to(8);
    }

    #[test]
    fn lex_empty_formula() {
        assert_that(&tokens("   ")).is_equal_to(Vec::<FormulaToken>::new());
    }
}
