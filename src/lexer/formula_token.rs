use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

//..................................................................

#[derive(Clone, PartialEq, Eq, Debug)]
/// Tokens returned by the Lexer.
///
/// An Operand is either a number or a variable (cell) name; the parser decides which.
/// Unsupported carries a character that is neither an operand character, a parenthesis
/// nor a registered operator. The Lexer yields nothing after it.
pub enum FormulaToken {
    Operand(String),
    Operator(char),
    OpenParenthesis,
    CloseParenthesis,
    Unsupported(char)
}

impl FormulaToken {
    /// The name of the enum variant.
    pub fn name(&self) -> &'static str {
        match self {
            FormulaToken::Operand(_) => "Operand",
            FormulaToken::Operator(_) => "Operator",
            FormulaToken::OpenParenthesis => "OpenParenthesis",
            FormulaToken::CloseParenthesis => "CloseParenthesis",
            FormulaToken::Unsupported(_) => "Unsupported"
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            FormulaToken::Unsupported(_) => true,
            _ => false
        }
    }
}

impl Display for FormulaToken {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            FormulaToken::Operand(s) => write!(f, "{}", s),
            FormulaToken::Operator(c) => write!(f, "{}", c),
            FormulaToken::OpenParenthesis => write!(f, "("),
            FormulaToken::CloseParenthesis => write!(f, ")"),
            FormulaToken::Unsupported(c) => write!(f, "{}", c)
        }
    }
}
