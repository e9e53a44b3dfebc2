#[derive(Debug, Fail, PartialEq)]
pub enum ParseError {
    #[fail(display = "empty expression")]
    Empty,

    #[fail(display = "mismatched parentheses")]
    MismatchedParens,

    #[fail(display = "encountered erroneous '{}'", _0)]
    ErroneousToken(String),

    #[fail(display = "unexpected input after expression: '{}'", _0)]
    TrailingInput(String),

    #[fail(display = "expression nested deeper than {} levels", _0)]
    TooDeeplyNested(usize),
}

#[derive(Debug, Fail, PartialEq)]
pub enum RunError {
    #[fail(display = "Undefined variable: '{}'.", _0)]
    UndefinedVariable(String),

    #[fail(display = "Undefined function: '{}'.", _0)]
    UndefinedFunction(String),

    #[fail(display = "Reserved identifier: '{}'.", _0)]
    ReservedIdentifier(String),

    #[fail(display = "Wrong number of arguments for '{}': expected {}, got {}.", name, expected, got)]
    MissingArguments {
        name: String,
        expected: usize,
        got: usize,
    },

    #[fail(display = "Empty begin: at least one expression required.")]
    EmptyBegin,

    #[fail(display = "Malformed '{}': {}.", form, msg)]
    MalformedForm { form: String, msg: String },

    #[fail(display = "'define' is only allowed at top level.")]
    MisplacedDefine,

    #[fail(display = "Division by zero.")]
    DivisionByZero,

    #[fail(display = "Maximum recursion depth exceeded ({}).", _0)]
    RecursionLimit(usize),
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_repl_contract() {
        assert_eq!(
            RunError::UndefinedVariable("x".to_owned()).to_string(),
            "Undefined variable: 'x'."
        );
        assert_eq!(
            RunError::UndefinedFunction("spam".to_owned()).to_string(),
            "Undefined function: 'spam'."
        );
        assert_eq!(
            RunError::MissingArguments { name: "mod".to_owned(), expected: 2, got: 1 }.to_string(),
            "Wrong number of arguments for 'mod': expected 2, got 1."
        );
    }
}
// }}}
