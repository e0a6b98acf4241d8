use crate::error::FormulaError;
use crate::lexer::formula_token::FormulaToken;
use crate::lexer::Lexer;

pub mod associativity;
pub mod operator;
use operator::{standard_operators, Operator, OperatorRegistry};

pub mod node;
use node::Node;

pub mod variable_table;

pub mod expression;
use expression::ExpressionTree;

//..................................................................

/// A token in postfix order, as produced by the ShuntingYard.
#[derive(Clone, Debug, PartialEq)]
pub enum PostfixToken {
    Operand(String),
    Operator(Operator)
}

/// What may wait on the operator stack while shunting.
#[derive(Clone, Copy, Debug)]
enum StackEntry {
    OpenParenthesis,
    Operator(Operator)
}

//..................................................................

/// Implements the Shunting Yard algorithm for converting a series of tokens in infix order
/// into a stack of operands and operators in postfix order.
/// Once reordered, the postfix tokens are folded into an ExpressionTree.
#[derive(Debug)]
pub struct ShuntingYard<'a> {
    /// Operators the lexer and parser recognize.
    operators: &'a OperatorRegistry,

    /// The input expression prior to parsing.
    pub expression_source: String,

    /// Tokenized form of the input expression, still in infix order.
    infix_order: Vec<FormulaToken>,

    /// Tokens rearranged into postfix order as a result of shunting yard.
    postfix_order: Vec<PostfixToken>,

    operator_stack: Vec<StackEntry>,
}

impl<'a> From<String> for ShuntingYard<'a> {
    fn from(expression: String) -> Self {
        ShuntingYard::with_operators(expression, standard_operators())
    }
}

impl<'a> From<&str> for ShuntingYard<'a> {
    fn from(expression: &str) -> Self {
        ShuntingYard::with_operators(expression.to_string(), standard_operators())
    }
}

impl<'a> ShuntingYard<'a> {

    /// Prepare to parse an expression that may use any operator in the given registry.
    pub fn with_operators<S>(expression: S, operators: &'a OperatorRegistry) -> Self where S: Into<String> {
        ShuntingYard {
            operators,
            expression_source: expression.into(),
            infix_order: vec![],
            postfix_order: vec![],
            operator_stack: vec![]
        }
    }

    /// Tokenize the expression and apply the shunting yard algorithm to rearrange the tokens into postfix order.
    /// Return the number of postfix tokens, or an error.
    fn parse(&mut self) -> Result<usize, FormulaError> {
        let mut lexer = Lexer::new(&self.expression_source, self.operators);
        while let Some(token) = lexer.next() {
            if let FormulaToken::Unsupported(c) = token {
                debug!(target: "parser", "Lexer found {} '{}' at character {} of '{}'",
                    token.name(), c, lexer.position(), self.expression_source);
                return Err(FormulaError::UnsupportedOperator(c));
            }
            self.infix_order.push(token);
        }
        self.shunt()
    }

    /// Perform the Shunting yard algorithm.
    fn shunt(&mut self) -> Result<usize, FormulaError> {
        let infix_order = std::mem::replace(&mut self.infix_order, vec![]);
        for token in infix_order.iter() {
            match token {
                // Operand Rule: Operands are immediately copied to the postfix-ordered output stack.
                FormulaToken::Operand(text) => self.postfix_order.push(PostfixToken::Operand(text.clone())),

                // Left Parenthesis Rule: Push all Left Parentheses onto the Operator Stack
                FormulaToken::OpenParenthesis => self.operator_stack.push(StackEntry::OpenParenthesis),

                // Right Parenthesis Rule: Pop all operators off the Operator Stack
                //                         and push them onto the postfix-ordered output stack
                //                         until we find matching Left Parenthesis.
                FormulaToken::CloseParenthesis => {
                    loop {
                        match self.operator_stack.pop() {
                            Some(StackEntry::OpenParenthesis) => break,
                            Some(StackEntry::Operator(op)) => self.postfix_order.push(PostfixToken::Operator(op)),
                            None => {
                                debug!(target: "parser", "Unbalanced closing parenthesis in '{}'", self.expression_source);
                                return Err(FormulaError::UnbalancedParentheses);
                            }
                        }
                    }
                },

                // Precedence & Associativity Rules:
                FormulaToken::Operator(symbol) => {
                    let op = self.operators.create(*symbol)?;
                    self.reduce(&op);
                    self.operator_stack.push(StackEntry::Operator(op))
                },

                FormulaToken::Unsupported(c) => return Err(FormulaError::UnsupportedOperator(*c))
            }
        }
        self.infix_order = infix_order;

        // End of Input Rule: Once there are no more operators expected, transfer all remaining operators
        //                    from the operator stack to the postfix-ordered output stack.
        while let Some(entry) = self.operator_stack.pop() {
            match entry {
                StackEntry::OpenParenthesis => {
                    debug!(target: "parser", "Unbalanced opening parenthesis in '{}'", self.expression_source);
                    return Err(FormulaError::UnbalancedParentheses);
                },
                StackEntry::Operator(op) => self.postfix_order.push(PostfixToken::Operator(op))
            }
        }
        Ok(self.postfix_order.len())
    }

    /// Apply the rules for precedence and associativity to reduce the operator_stack
    /// by moving some operators to the postfix_order stack.
    fn reduce(&mut self, incoming: &Operator) {
        loop {
            match self.operator_stack.last() {
                // Higher Precedence and Left Associative Rules: the waiting operator binds at least as tightly,
                //                         so pop it and push it onto the postfix-ordered output stack.
                Some(StackEntry::Operator(waiting)) if waiting.outranks(incoming) => {
                    self.postfix_order.push(PostfixToken::Operator(*waiting));
                    self.operator_stack.pop();
                },
                // Lower Precedence, Right Associative and Parenthesis Rules: stop popping.
                _ => break
            }
        }
    }

    /// Produce the tokens in postfix order, without building a tree.
    pub fn postfix(mut self) -> Result<Vec<PostfixToken>, FormulaError> {
        self.parse()?;
        Ok(self.postfix_order)
    }

    /// Compile the expression into an ExpressionTree.
    pub fn compile(mut self) -> Result<ExpressionTree, FormulaError> {
        self.parse()?;
        let mut operands: Vec<Node> = Vec::new();
        for token in self.postfix_order.drain(..) {
            match token {
                PostfixToken::Operand(text) => operands.push(operand_node(text)),
                PostfixToken::Operator(op) => {
                    let right = operands.pop();
                    let left = operands.pop();
                    match (left, right) {
                        (Some(left), Some(right)) => operands.push(Node::binary(op, left, right)),
                        _ => return Err(FormulaError::MalformedExpression(
                            format!("operator '{}' is missing an operand", op.symbol)))
                    }
                }
            }
        }
        if operands.len() > 1 {
            return Err(FormulaError::MalformedExpression("operands without an operator between them".to_string()));
        }
        match operands.pop() {
            Some(root) => Ok(ExpressionTree::from_root(self.expression_source, root)),
            None => Err(FormulaError::MalformedExpression("empty expression".to_string()))
        }
    }
}

/// An operand that starts like a number and parses as one is a Constant; anything else names a Variable.
fn operand_node(text: String) -> Node {
    let starts_numeric = text.chars().next().map_or(false, |c| c.is_ascii_digit() || c == '.');
    match text.parse::<f64>() {
        Ok(value) if starts_numeric => Node::Constant(value),
        _ => Node::Variable(text)
    }
}
