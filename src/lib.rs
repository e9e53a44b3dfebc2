#[macro_use]
extern crate failure_derive;

pub mod ast;
mod builtins;
pub mod env;
mod eval;
pub mod errors;
mod file;
pub mod functions;
pub mod log;
pub mod parser;
pub mod repl;

use failure::Error;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use crate::ast::{Expr, Form, Head, Special};
use crate::env::*;
use crate::functions::{FunctionTable, UserFunction};

pub use crate::builtins::Operator;

/// every expression evaluates to a number; zero is false, anything else true
pub type Value = f64;

/// evaluation may nest this deep (sub-expressions and function calls alike)
/// before it gives up with `RecursionLimit`
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// the result of evaluating one top-level expression
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Defined(Rc<UserFunction>),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Value(v) => write!(f, "{}", v),
            Outcome::Defined(func) => write!(f, "{}", func),
        }
    }
}

/// One interpreter session: the global frame, the defined functions, and the
/// stream `print` writes to. Sessions share nothing with each other.
pub struct Interpreter<W: Write = io::Stdout> {
    pub env: EnvRef,
    pub functions: FunctionTable,
    output: W,
    depth: usize,
    max_depth: usize,
}

impl Interpreter<io::Stdout> {
    /// create a new Interpreter printing to stdout
    pub fn new() -> Interpreter<io::Stdout> {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// create a new Interpreter printing to `output`
    pub fn with_output(output: W) -> Interpreter<W> {
        Interpreter {
            env: Env::global(),
            functions: FunctionTable::new(),
            output,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// limit how deeply evaluation may nest
    pub fn with_max_depth(mut self, max_depth: usize) -> Interpreter<W> {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// forget every global variable and function definition
    pub fn reset(&mut self) {
        self.env.borrow_mut().vars.clear();
        self.functions.reset();
        self.depth = 0;
    }

    /// evaluate a string as lisp code
    pub fn run(&mut self, code: &str) -> Result<Outcome, Error> {
        let sexp = parser::read(code)?;
        let expr = Expr::classify(sexp)?;
        log::debug(format!("classified: {}", expr));
        self.eval_top(&expr)
    }

    /// evaluate a classified expression at top level, the only place a
    /// function may be defined
    pub fn eval_top(&mut self, expr: &Expr) -> Result<Outcome, Error> {
        if let Expr::Form(Form { head: Head::Special(Special::Define(def)), .. }) = expr {
            let func = self.functions.define_function(
                def.name.clone(),
                def.formals.clone(),
                (*def.body).clone(),
            )?;
            return Ok(Outcome::Defined(func));
        }

        let globals = self.env.clone();
        self.eval(expr, &globals).map(Outcome::Value)
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RunError;

    fn session() -> Interpreter<Vec<u8>> {
        Interpreter::with_output(Vec::new())
    }

    fn printed(interpreter: &Interpreter<Vec<u8>>) -> String {
        String::from_utf8(interpreter.output().clone()).unwrap()
    }

    #[test]
    fn run_arithmetic() {
        let mut interpreter = session();
        assert_eq!(interpreter.run("(* (+ 2 4) (- 10 3))").unwrap(), Outcome::Value(42.0));
        assert_eq!(interpreter.run("(/ (* (- 100 32) 5) 9)").unwrap(), Outcome::Value(37.0));
        assert_eq!(interpreter.run("3").unwrap().to_string(), "3");
    }

    #[test]
    fn define_echoes_the_handle() {
        let mut interpreter = session();
        let outcome = interpreter.run("(define mod (m n) (- m (* n (/ m n))))").unwrap();
        assert_eq!(outcome.to_string(), "<UserFunction mod(m, n)>");
        assert_eq!(interpreter.run("(mod 17 5)").unwrap(), Outcome::Value(2.0));
    }

    #[test]
    fn errors_leave_earlier_state_alone() {
        let mut interpreter = session();
        interpreter.run("(set x 10)").unwrap();
        interpreter.run("(define double (n) (* n 2))").unwrap();

        let err = interpreter.run("(set x (+ 1 y))").unwrap_err();
        assert_eq!(err.to_string(), "Undefined variable: 'y'.");
        assert_eq!(interpreter.run("(double x)").unwrap(), Outcome::Value(20.0));
    }

    #[test]
    fn sessions_are_isolated() {
        let mut first = session();
        let mut second = session();
        first.run("(set shared 1)").unwrap();
        first.run("(define f () 1)").unwrap();

        let err = second.run("shared").unwrap_err();
        assert_eq!(
            err.downcast_ref::<RunError>(),
            Some(&RunError::UndefinedVariable("shared".to_owned()))
        );
        assert!(second.functions.is_empty());
    }

    #[test]
    fn reset_clears_globals_and_functions() {
        let mut interpreter = session();
        interpreter.run("(set x 1)").unwrap();
        interpreter.run("(define f () 1)").unwrap();
        interpreter.reset();

        assert!(interpreter.env.borrow().vars.is_empty());
        assert!(interpreter.functions.is_empty());
        assert!(interpreter.run("x").is_err());
    }

    #[test]
    fn print_goes_to_the_session_output() {
        let mut interpreter = session();
        interpreter.run("(print (+ 1 1))").unwrap();
        assert_eq!(printed(&interpreter), "2\n");
    }
}
// }}}
