use thiserror::Error;

/// Grammar failures raised while turning tokens into an [`Expr`](crate::ast::Expr).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Unexpected end of formula")]
    UnexpectedEnd,
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("Expected ')' to close parenthesis")]
    MissingClosingParen,
    #[error("Expected ')' after arguments of function '{0}'")]
    MissingFunctionArgsClose(String),
    #[error("Expected '(' after function name '{0}'")]
    MissingFunctionParen(String),
    #[error("Unexpected trailing tokens starting at: {0}")]
    TrailingTokens(String),
    #[error("Invalid number literal")]
    InvalidNumber,
    #[error("Formula is nested too deeply")]
    TooDeep,
}

/// Failures raised while walking a parsed formula against a landmark frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Function '{function}' expects {expected} arguments, got {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid landmark index: {0}")]
    InvalidLandmark(String),
    #[error("No landmarks available")]
    NoLandmarks,
    #[error("Formula produced a non-finite value: {0}")]
    NonFinite(f64),
}

/// Everything the public formula boundary can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("Empty formula")]
    Empty,
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_formula_message() {
        assert_eq!(FormulaError::Empty.to_string(), "Empty formula");
    }

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: FormulaError = SyntaxError::UnexpectedToken(")".to_string()).into();
        assert_eq!(err.to_string(), "Unexpected token: )");

        let err: FormulaError = EvaluationError::ArgumentCount {
            function: "map".to_string(),
            expected: 5,
            found: 2,
        }
        .into();
        assert_eq!(err.to_string(), "Function 'map' expects 5 arguments, got 2");
    }
}
