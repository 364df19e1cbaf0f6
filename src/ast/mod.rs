use crate::error::EvaluationError;
use std::fmt;

mod evaluator;
mod parser;
mod tokenizer;

pub use evaluator::{Evaluator, Function};
pub use parser::Parser;
pub use tokenizer::tokenize;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// One of `+ - * / ( )`.
    Operator(char),
    /// An identifier immediately followed by `(`.
    Function(String),
    Variable(String),
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Function(name) | Token::Variable(name) => f.write_str(name),
            Token::Comma => f.write_str(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary minus.
    Negate(Box<Expr>),
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    Variable(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, EvaluationError> {
        match self {
            BinaryOperator::Add => Ok(left + right),
            BinaryOperator::Subtract => Ok(left - right),
            BinaryOperator::Multiply => Ok(left * right),
            BinaryOperator::Divide => {
                if right == 0.0 {
                    Err(EvaluationError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

impl TryFrom<char> for BinaryOperator {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(BinaryOperator::Add),
            '-' => Ok(BinaryOperator::Subtract),
            '*' => Ok(BinaryOperator::Multiply),
            '/' => Ok(BinaryOperator::Divide),
            other => Err(other),
        }
    }
}
