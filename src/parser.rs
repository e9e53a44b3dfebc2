use failure::Error;
use itertools::join;
use std::collections::VecDeque;
use std::fmt;

use crate::errors::ParseError;

/// forms may nest this deep on one line; reading, classifying and evaluating
/// are all recursive, so deeper input is refused up front
pub const MAX_PARSE_DEPTH: usize = 128;

/// an unclassified s-expression, exactly as it was read
#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    Number(f64),
    Symbol(String),
    List(Vec<Sexp>),
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sexp::Number(n) => write!(f, "{}", n),
            Sexp::Symbol(s) => write!(f, "{}", s),
            Sexp::List(list) => write!(f, "({})", join(list.iter(), " ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Item(String),
    LeftParen,
    RightParen,
}

/// parse a string of code into individual “bits” of syntax
pub fn tokenize(string: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut item = String::new();

    for c in string.chars() {
        match c {
            '(' => {
                push_item(&mut item, &mut tokens);
                tokens.push(Token::LeftParen);
            }

            ')' => {
                push_item(&mut item, &mut tokens);
                tokens.push(Token::RightParen);
            }

            ';' => {
                push_item(&mut item, &mut tokens);
                return tokens;
            }

            c if c.is_whitespace() => push_item(&mut item, &mut tokens),

            _ => item.push(c),
        }
    }

    push_item(&mut item, &mut tokens);
    tokens
}

fn push_item(item: &mut String, tokens: &mut Vec<Token>) {
    if !item.is_empty() {
        tokens.push(Token::Item(item.clone()));
        item.clear();
    }
}

/// read a line of code into a single s-expression
pub fn read(code: &str) -> Result<Sexp, Error> {
    let mut tokens: VecDeque<Token> = tokenize(code).into();
    let left_parens = tokens.iter().filter(|&t| t == &Token::LeftParen).count();
    let right_parens = tokens.iter().filter(|&t| t == &Token::RightParen).count();

    if tokens.is_empty() {
        Err(ParseError::Empty)?
    } else if left_parens != right_parens {
        Err(ParseError::MismatchedParens)?
    } else if nesting(&tokens) > MAX_PARSE_DEPTH {
        Err(ParseError::TooDeeplyNested(MAX_PARSE_DEPTH))?
    }

    let sexp = from_tokens(&mut tokens)?;
    let trailing = match tokens.pop_front() {
        None => return Ok(sexp),
        Some(Token::Item(s)) => s,
        Some(Token::LeftParen) => "(".to_owned(),
        Some(Token::RightParen) => ")".to_owned(),
    };

    Err(ParseError::TrailingInput(trailing).into())
}

/// the deepest level of parentheses reached
fn nesting(tokens: &VecDeque<Token>) -> usize {
    let mut depth: usize = 0;
    let mut deepest = 0;
    for token in tokens {
        match token {
            Token::LeftParen => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Token::RightParen => depth = depth.saturating_sub(1),
            Token::Item(_) => {}
        }
    }
    deepest
}

/// parse a queue of tokens into a structured s-expression
fn from_tokens(tokens: &mut VecDeque<Token>) -> Result<Sexp, ParseError> {
    match tokens.pop_front() {
        Some(Token::LeftParen) => {
            let mut list: Vec<Sexp> = Vec::new();

            loop {
                match tokens.front() {
                    Some(Token::RightParen) => {
                        tokens.pop_front();
                        return Ok(Sexp::List(list));
                    }
                    Some(_) => list.push(from_tokens(tokens)?),
                    None => return Err(ParseError::MismatchedParens),
                }
            }
        }

        Some(Token::RightParen) => Err(ParseError::ErroneousToken(")".to_owned())),

        Some(Token::Item(s)) => Ok(atomize(s)),

        None => Err(ParseError::Empty),
    }
}

/// parse an item into an atom
fn atomize(token: String) -> Sexp {
    if looks_numeric(&token) {
        if let Ok(n) = token.parse::<f64>() {
            return Sexp::Number(n);
        }
    }

    Sexp::Symbol(token)
}

/// `f64::from_str` also accepts words like `inf` and `NaN`, which are symbols here
fn looks_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') | Some('.') => chars.next().map_or(false, |c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use super::Sexp::*;

    fn sym(s: &str) -> Sexp {
        Symbol(s.to_owned())
    }

    #[test]
    fn tokenize_splits_parens_and_drops_comments() {
        let tokens = tokenize("(+ 1  2) ; three");
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Item("+".to_owned()),
                Token::Item("1".to_owned()),
                Token::Item("2".to_owned()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn read_nested_form() {
        let sexp = read("(* 6 (+ 3 4))").unwrap();
        assert_eq!(
            sexp,
            List(vec![sym("*"), Number(6.0), List(vec![sym("+"), Number(3.0), Number(4.0)])])
        );
    }

    #[test]
    fn read_atoms() {
        assert_eq!(read("3").unwrap(), Number(3.0));
        assert_eq!(read("-2.5").unwrap(), Number(-2.5));
        assert_eq!(read(".5").unwrap(), Number(0.5));
        assert_eq!(read("-").unwrap(), sym("-"));
        assert_eq!(read("inf").unwrap(), sym("inf"));
        assert_eq!(read("!").unwrap(), sym("!"));
    }

    #[test]
    fn read_rejects_bad_input() {
        let err = read("").unwrap_err();
        assert_eq!(err.downcast_ref::<ParseError>(), Some(&ParseError::Empty));

        let err = read("(+ 1 2").unwrap_err();
        assert_eq!(err.downcast_ref::<ParseError>(), Some(&ParseError::MismatchedParens));

        let err = read(")(").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::ErroneousToken(")".to_owned()))
        );

        let err = read("1 2").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::TrailingInput("2".to_owned()))
        );
    }

    #[test]
    fn read_refuses_runaway_nesting() {
        let deep = format!("{}1{}", "(+ ".repeat(200_000), ")".repeat(200_000));
        let err = read(&deep).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::TooDeeplyNested(MAX_PARSE_DEPTH))
        );

        let limit = format!("{}1{}", "(+ ".repeat(MAX_PARSE_DEPTH), ")".repeat(MAX_PARSE_DEPTH));
        assert!(read(&limit).is_ok());
    }

    #[test]
    fn display_round_trips_shape() {
        let sexp = read("(define ! (n) (if (< n 2) 1 (* n (! (- n 1)))))").unwrap();
        assert_eq!(sexp.to_string(), "(define ! (n) (if (< n 2) 1 (* n (! (- n 1)))))");
    }
}
// }}}
