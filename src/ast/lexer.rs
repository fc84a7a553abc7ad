use log::trace;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    LParen,
    RParen,
    /// Any identifier. Whether it names a variable, a constant or a function is
    /// decided by the parser from context.
    Variable,
    Operator,
    Function,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }
}

/// Splits `input` into tokens. Never fails: malformed input is left for the
/// parser to reject.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch.is_ascii_digit() || ch == '.' {
            let end = scan_number(&mut chars, start);
            tokens.push(Token::new(TokenKind::Number, &input[start..end]));
        } else if ch.is_ascii_alphabetic() {
            let end = scan_while(&mut chars, start, |c| c.is_ascii_alphanumeric());
            tokens.push(Token::new(TokenKind::Variable, &input[start..end]));
        } else if ch == '(' {
            chars.next();
            tokens.push(Token::new(TokenKind::LParen, "("));
        } else if ch == ')' {
            chars.next();
            tokens.push(Token::new(TokenKind::RParen, ")"));
        } else if ch == ',' {
            chars.next();
            tokens.push(Token::new(TokenKind::Separator, ","));
        } else {
            let end = scan_while(&mut chars, start, |c| {
                !c.is_ascii_alphanumeric()
                    && !c.is_whitespace()
                    && c != '('
                    && c != ')'
                    && c != ','
            });
            tokens.push(Token::new(TokenKind::Operator, &input[start..end]));
        }
    }

    trace!("Tokens: {:?}", tokens);
    tokens
}

/// Consumes characters while `accept` holds and returns the end byte offset.
fn scan_while<F>(chars: &mut Peekable<CharIndices>, start: usize, accept: F) -> usize
where
    F: Fn(char) -> bool,
{
    let mut end = start;
    while let Some(&(idx, ch)) = chars.peek() {
        if !accept(ch) {
            break;
        }
        end = idx + ch.len_utf8();
        chars.next();
    }
    end
}

/// Digits with at most one decimal point.
fn scan_number(chars: &mut Peekable<CharIndices>, start: usize) -> usize {
    let mut end = start;
    let mut seen_dot = false;
    while let Some(&(idx, ch)) = chars.peek() {
        if ch == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        } else if !ch.is_ascii_digit() {
            break;
        }
        end = idx + 1;
        chars.next();
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_simple_arithmetic() {
        assert_eq!(texts("2+3*4"), vec!["2", "+", "3", "*", "4"]);
        assert_eq!(
            kinds("2+3"),
            vec![TokenKind::Number, TokenKind::Operator, TokenKind::Number]
        );
    }

    #[test]
    fn test_function_call_tokens() {
        assert_eq!(
            kinds("clamp(a1, 0.5, 10)"),
            vec![
                TokenKind::Variable,
                TokenKind::LParen,
                TokenKind::Variable,
                TokenKind::Separator,
                TokenKind::Number,
                TokenKind::Separator,
                TokenKind::Number,
                TokenKind::RParen,
            ]
        );
        assert_eq!(texts("clamp(a1, 0.5, 10)")[2], "a1");
    }

    #[test]
    fn test_whitespace_is_dropped() {
        assert_eq!(texts("   ( x  +\t 10 )  "), vec!["(", "x", "+", "10", ")"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_operator_runs_are_one_token() {
        assert_eq!(texts("1++2"), vec!["1", "++", "2"]);
        assert_eq!(texts("5!+3"), vec!["5", "!+", "3"]);
        assert_eq!(texts("5 ! 3"), vec!["5", "!", "3"]);
        assert_eq!(texts("!(5)"), vec!["!", "(", "5", ")"]);
        assert_eq!(texts("5 + - * 3"), vec!["5", "+", "-", "*", "3"]);
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(texts(".5+5."), vec![".5", "+", "5."]);
        assert_eq!(texts("1.2.3"), vec!["1.2", ".3"]);
        assert_eq!(texts("5x"), vec!["5", "x"]);
    }
}
