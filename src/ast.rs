use itertools::join;
use std::collections::HashSet;
use std::fmt;

use crate::builtins::Operator;
use crate::errors::RunError;
use crate::parser::Sexp;

/// keywords evaluated by dedicated rules instead of function application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Set,
    If,
    While,
    Begin,
    Print,
    Define,
}

pub const SPECIAL_FORMS: &[(&str, SpecialForm)] = &[
    ("set",     SpecialForm::Set),
    ("if",      SpecialForm::If),
    ("while",   SpecialForm::While),
    ("begin",   SpecialForm::Begin),
    ("print",   SpecialForm::Print),
    ("define",  SpecialForm::Define),
];

impl SpecialForm {
    pub fn from_name(name: &str) -> Option<SpecialForm> {
        SPECIAL_FORMS.iter()
            .find(|(keyword, _)| *keyword == name)
            .map(|&(_, form)| form)
    }

    pub fn name(self) -> &'static str {
        SPECIAL_FORMS.iter()
            .find(|(_, form)| *form == self)
            .map(|&(keyword, _)| keyword)
            .unwrap_or("?")
    }
}

/// a classified expression, ready to be evaluated
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Form(Form),
}

/// a parenthesized expression whose head has been resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub head: Head,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Head {
    /// `set` keeps its target name here, `define` its whole definition
    Special(Special),
    Builtin(Operator),
    Call(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Special {
    Set(String),
    If,
    While,
    Begin,
    Print,
    Define(FunctionDef),
}

impl Special {
    pub fn keyword(&self) -> &'static str {
        match self {
            Special::Set(_)    => "set",
            Special::If        => "if",
            Special::While     => "while",
            Special::Begin     => "begin",
            Special::Print     => "print",
            Special::Define(_) => "define",
        }
    }
}

/// the pieces of a `(define name (formals...) body)` form
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub formals: Vec<String>,
    pub body: Box<Expr>,
}

impl Expr {
    /// resolve every form head in a freshly read s-expression
    pub fn classify(sexp: Sexp) -> Result<Expr, RunError> {
        match sexp {
            Sexp::Number(n) => Ok(Expr::Number(n)),
            Sexp::Symbol(s) => Ok(Expr::Symbol(s)),
            Sexp::List(list) => classify_form(list).map(Expr::Form),
        }
    }
}

fn classify_form(mut list: Vec<Sexp>) -> Result<Form, RunError> {
    if list.is_empty() {
        return Err(malformed("()", "empty form"));
    }

    let head = match list.remove(0) {
        Sexp::Symbol(s) => s,
        other => return Err(RunError::UndefinedFunction(other.to_string())),
    };

    if let Some(form) = SpecialForm::from_name(&head) {
        return classify_special(form, list);
    }

    if let Some(op) = Operator::from_symbol(&head) {
        if let Some(arity) = op.arity() {
            check_arity(&head, arity, list.len())?;
        }
        return Ok(Form {
            head: Head::Builtin(op),
            args: classify_all(list)?,
        });
    }

    Ok(Form {
        head: Head::Call(head),
        args: classify_all(list)?,
    })
}

fn classify_special(form: SpecialForm, mut args: Vec<Sexp>) -> Result<Form, RunError> {
    let special = match form {
        SpecialForm::Set => {
            check_arity(form.name(), 2, args.len())?;
            match args.remove(0) {
                Sexp::Symbol(name) => Special::Set(name),
                other => return Err(malformed("set", format!("cannot assign to `{}`", other))),
            }
        }

        SpecialForm::If => {
            check_arity(form.name(), 3, args.len())?;
            Special::If
        }

        SpecialForm::While => {
            check_arity(form.name(), 2, args.len())?;
            Special::While
        }

        SpecialForm::Begin => {
            if args.is_empty() {
                return Err(RunError::EmptyBegin);
            }
            Special::Begin
        }

        SpecialForm::Print => {
            check_arity(form.name(), 1, args.len())?;
            Special::Print
        }

        SpecialForm::Define => {
            check_arity(form.name(), 3, args.len())?;
            Special::Define(classify_define(std::mem::replace(&mut args, Vec::new()))?)
        }
    };

    Ok(Form {
        head: Head::Special(special),
        args: classify_all(args)?,
    })
}

fn classify_define(parts: Vec<Sexp>) -> Result<FunctionDef, RunError> {
    let mut parts = parts.into_iter();
    let (name, formals, body) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(formals), Some(body)) => (name, formals, body),
        _ => return Err(malformed("define", "expected a name, a parameter list and a body")),
    };

    let name = match name {
        Sexp::Symbol(s) => s,
        other => return Err(malformed("define", format!("`{}` is not a name", other))),
    };

    Ok(FunctionDef {
        name,
        formals: classify_formals(formals)?,
        body: Box::new(Expr::classify(body)?),
    })
}

fn classify_formals(formals: Sexp) -> Result<Vec<String>, RunError> {
    let list = match formals {
        Sexp::List(list) => list,
        other => return Err(malformed("define", format!("expected a parameter list, got `{}`", other))),
    };

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(list.len());
    for formal in list {
        match formal {
            Sexp::Symbol(s) => {
                if !seen.insert(s.clone()) {
                    return Err(malformed("define", format!("duplicate parameter `{}`", s)));
                }
                names.push(s);
            }
            other => return Err(malformed("define", format!("`{}` is not a parameter name", other))),
        }
    }

    Ok(names)
}

fn classify_all(list: Vec<Sexp>) -> Result<Vec<Expr>, RunError> {
    list.into_iter().map(Expr::classify).collect()
}

fn check_arity(name: &str, expected: usize, got: usize) -> Result<(), RunError> {
    if expected != got {
        Err(RunError::MissingArguments {
            name: name.to_owned(),
            expected,
            got,
        })
    } else {
        Ok(())
    }
}

fn malformed<S: Into<String>>(form: &str, msg: S) -> RunError {
    RunError::MalformedForm {
        form: form.to_owned(),
        msg: msg.into(),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::Form(form) => write!(f, "{}", form),
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let head = match &self.head {
            Head::Special(Special::Set(name)) => format!("set {}", name),
            Head::Special(Special::Define(def)) => format!(
                "define {} ({}) {}",
                def.name,
                join(def.formals.iter(), " "),
                def.body
            ),
            Head::Special(special) => special.keyword().to_owned(),
            Head::Builtin(op) => op.symbol().to_owned(),
            Head::Call(name) => name.clone(),
        };

        if self.args.is_empty() {
            write!(f, "({})", head)
        } else {
            write!(f, "({} {})", head, join(self.args.iter(), " "))
        }
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::read;

    fn classify(code: &str) -> Result<Expr, RunError> {
        Expr::classify(read(code).unwrap())
    }

    #[test]
    fn heads_are_resolved_once() {
        let expr = classify("(* 6 (double 4))").unwrap();
        let form = match expr {
            Expr::Form(form) => form,
            other => panic!("expected a form, got {:?}", other),
        };
        assert_eq!(form.head, Head::Builtin(Operator::Mul));
        assert_eq!(form.args[0], Expr::Number(6.0));
        match &form.args[1] {
            Expr::Form(Form { head: Head::Call(name), args }) => {
                assert_eq!(name, "double");
                assert_eq!(args, &vec![Expr::Number(4.0)]);
            }
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn define_is_split_into_its_parts() {
        let expr = classify("(define mod (m n) (- m (* n (/ m n))))").unwrap();
        match expr {
            Expr::Form(Form { head: Head::Special(Special::Define(def)), args }) => {
                assert!(args.is_empty());
                assert_eq!(def.name, "mod");
                assert_eq!(def.formals, vec!["m".to_owned(), "n".to_owned()]);
                assert_eq!(def.body.to_string(), "(- m (* n (/ m n)))");
            }
            other => panic!("expected a definition, got {:?}", other),
        }
    }

    #[test]
    fn binary_operators_are_checked_structurally() {
        assert_eq!(
            classify("(- 1)"),
            Err(RunError::MissingArguments { name: "-".to_owned(), expected: 2, got: 1 })
        );
        assert!(classify("(+)").is_ok());
        assert!(classify("(+ 1 2 3 4)").is_ok());
    }

    #[test]
    fn malformed_special_forms() {
        assert_eq!(classify("(begin)"), Err(RunError::EmptyBegin));
        assert_eq!(
            classify("(if 1 2)"),
            Err(RunError::MissingArguments { name: "if".to_owned(), expected: 3, got: 2 })
        );
        assert!(match classify("(set 3 4)") {
            Err(RunError::MalformedForm { form, .. }) => form == "set",
            _ => false,
        });
        assert!(match classify("(define f (n n) n)") {
            Err(RunError::MalformedForm { msg, .. }) => msg.contains("duplicate"),
            _ => false,
        });
        assert!(match classify("()") {
            Err(RunError::MalformedForm { .. }) => true,
            _ => false,
        });
    }

    #[test]
    fn non_symbol_head_is_an_undefined_function() {
        assert_eq!(
            classify("(3 4)"),
            Err(RunError::UndefinedFunction("3".to_owned()))
        );
    }
}
// }}}
