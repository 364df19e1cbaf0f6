use crate::ast::Token;
use log::trace;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | '.')
}

/// Longest prefix of a digit/dot run that reads as a number, the way
/// `1.2.3` reads as `1.2`. A run without any digit before the second dot
/// (such as a lone `.`) has no value and becomes NaN, which the parser rejects.
fn number_prefix(run: &str) -> f64 {
    let end = run
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .nth(1)
        .map_or(run.len(), |(i, _)| i);
    run[..end].parse().unwrap_or(f64::NAN)
}

/// Splits a formula into tokens.
///
/// Whitespace is removed before scanning, so it never separates anything:
/// `L x[4]` reads as `Lx[4]`. Characters that start no token are skipped.
pub fn tokenize(formula: &str) -> Vec<Token> {
    let chars: Vec<char> = formula.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            tokens.push(Token::Number(number_prefix(&run)));
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && is_identifier_char(chars[i]) {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            if chars.get(i) == Some(&'(') {
                tokens.push(Token::Function(name));
            } else {
                tokens.push(Token::Variable(name));
            }
        } else {
            match c {
                '+' | '-' | '*' | '/' | '(' | ')' => tokens.push(Token::Operator(c)),
                ',' => tokens.push(Token::Comma),
                _ => trace!("Skipping character {:?}", c),
            }
            i += 1;
        }
    }

    trace!("Tokens for {:?}: {:?}", formula, tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Token {
        Token::Variable(name.to_string())
    }

    fn func(name: &str) -> Token {
        Token::Function(name.to_string())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            tokenize("2 + 3.5*(4-1)/x"),
            vec![
                Token::Number(2.0),
                Token::Operator('+'),
                Token::Number(3.5),
                Token::Operator('*'),
                Token::Operator('('),
                Token::Number(4.0),
                Token::Operator('-'),
                Token::Number(1.0),
                Token::Operator(')'),
                Token::Operator('/'),
                var("x"),
            ]
        );
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            tokenize("map(distance(4, 8), 0, 0.1, 0, 1023)"),
            vec![
                func("map"),
                Token::Operator('('),
                func("distance"),
                Token::Operator('('),
                Token::Number(4.0),
                Token::Comma,
                Token::Number(8.0),
                Token::Operator(')'),
                Token::Comma,
                Token::Number(0.0),
                Token::Comma,
                Token::Number(0.1),
                Token::Comma,
                Token::Number(0.0),
                Token::Comma,
                Token::Number(1023.0),
                Token::Operator(')'),
            ]
        );
    }

    #[test]
    fn test_function_name_followed_by_space() {
        assert_eq!(
            tokenize("map (1)"),
            vec![
                func("map"),
                Token::Operator('('),
                Token::Number(1.0),
                Token::Operator(')')
            ]
        );
    }

    #[test]
    fn test_landmark_variables() {
        assert_eq!(tokenize("Lx[4]"), vec![var("Lx[4]")]);
        assert_eq!(tokenize("L[4].y"), vec![var("L[4].y")]);
        assert_eq!(
            tokenize("L[4].y-Lz[0]"),
            vec![var("L[4].y"), Token::Operator('-'), var("Lz[0]")]
        );
    }

    #[test]
    fn test_whitespace_is_removed_first() {
        assert_eq!(tokenize("a b"), vec![var("ab")]);
        assert_eq!(tokenize("1 2"), vec![Token::Number(12.0)]);
        assert_eq!(tokenize("  \t\n"), vec![]);
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        assert_eq!(
            tokenize("2 @ 3 # $"),
            vec![Token::Number(2.0), Token::Number(3.0)]
        );
        assert_eq!(tokenize("2^3"), vec![Token::Number(2.0), Token::Number(3.0)]);
    }

    #[test]
    fn test_multiple_decimal_points() {
        assert_eq!(tokenize("1.2.3"), vec![Token::Number(1.2)]);
        assert_eq!(tokenize(".5"), vec![Token::Number(0.5)]);
        assert!(matches!(tokenize(".").as_slice(), [Token::Number(n)] if n.is_nan()));
        assert!(matches!(tokenize("..5").as_slice(), [Token::Number(n)] if n.is_nan()));
    }

    #[test]
    fn test_identifier_with_digits_and_underscore() {
        assert_eq!(tokenize("abc_1"), vec![var("abc_1")]);
        assert_eq!(tokenize("_abc"), vec![var("abc")]);
    }
}
