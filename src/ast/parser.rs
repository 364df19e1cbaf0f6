use crate::ast::{tokenize, BinaryOperator, Expr, Token};
use crate::error::SyntaxError;
use log::debug;

/// Deepest nesting of groups, negations, calls and operator chains a formula may use.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over a token slice.
///
/// ```text
/// expression     := additive
/// additive       := multiplicative (('+' | '-') multiplicative)*
/// multiplicative := primary (('*' | '/') primary)*
/// primary        := number
///                 | '(' expression ')'
///                 | function '(' [expression (',' expression)*] ')'
///                 | variable
///                 | '-' primary
/// ```
///
/// Unary minus only takes a single primary, so `-2*3` is `(-2)*3`.
///
/// Nesting is capped at [`MAX_DEPTH`], which also bounds the recursion of
/// evaluating and dropping the resulting tree.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Tokenizes and parses a formula string.
    pub fn parse_formula(formula: &str) -> Result<Expr, SyntaxError> {
        debug!("Parsing formula: {}", formula);
        let tokens = tokenize(formula);
        Parser::parse(&tokens)
    }

    /// Parses a complete token sequence; leftover tokens are an error.
    pub fn parse(tokens: &'a [Token]) -> Result<Expr, SyntaxError> {
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_expression()?;
        if let Some(token) = parser.peek() {
            return Err(SyntaxError::TrailingTokens(token.to_string()));
        }
        debug!("Parse result: {:?}", expr);
        Ok(expr)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the next token if it is the given operator character.
    fn eat_operator(&mut self, op: char) -> bool {
        if self.peek() == Some(&Token::Operator(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek_operator(&self, accepted: &[char]) -> Option<BinaryOperator> {
        match self.peek() {
            Some(Token::Operator(op)) if accepted.contains(op) => BinaryOperator::try_from(*op).ok(),
            _ => None,
        }
    }

    fn descend(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError::TooDeep);
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.parse_multiplicative()?;
        let mut folds = 0;
        while let Some(operator) = self.peek_operator(&['+', '-']) {
            self.pos += 1;
            // each fold nests the chain built so far one level deeper
            self.descend()?;
            folds += 1;
            let right = self.parse_multiplicative()?;
            node = Expr::Binary {
                operator,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        self.depth -= folds;
        Ok(node)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut node = self.parse_primary()?;
        let mut folds = 0;
        while let Some(operator) = self.peek_operator(&['*', '/']) {
            self.pos += 1;
            // each fold nests the chain built so far one level deeper
            self.descend()?;
            folds += 1;
            let right = self.parse_primary()?;
            node = Expr::Binary {
                operator,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        self.depth -= folds;
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.next() {
            None => Err(SyntaxError::UnexpectedEnd),
            Some(Token::Number(value)) => {
                if value.is_finite() {
                    Ok(Expr::Number(*value))
                } else {
                    Err(SyntaxError::InvalidNumber)
                }
            }
            Some(Token::Operator('(')) => {
                self.descend()?;
                let inner = self.parse_expression()?;
                if !self.eat_operator(')') {
                    return Err(SyntaxError::MissingClosingParen);
                }
                self.depth -= 1;
                Ok(inner)
            }
            Some(Token::Operator('-')) => {
                self.descend()?;
                let operand = self.parse_primary()?;
                self.depth -= 1;
                Ok(Expr::Negate(Box::new(operand)))
            }
            Some(Token::Function(name)) => self.parse_call(name),
            Some(Token::Variable(name)) => Ok(Expr::Variable(name.clone())),
            Some(token) => Err(SyntaxError::UnexpectedToken(token.to_string())),
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, SyntaxError> {
        if !self.eat_operator('(') {
            return Err(SyntaxError::MissingFunctionParen(name.to_string()));
        }
        self.descend()?;

        let mut args = Vec::new();
        if !self.eat_operator(')') {
            loop {
                args.push(self.parse_expression()?);
                if self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            if !self.eat_operator(')') {
                return Err(SyntaxError::MissingFunctionArgsClose(name.to_string()));
            }
        }
        self.depth -= 1;

        Ok(Expr::FunctionCall {
            name: name.to_string(),
            args,
        })
    }
}
