use failure::Error;
use itertools::join;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use crate::ast::{Expr, SpecialForm};
use crate::builtins::Operator;
use crate::env;
use crate::errors::RunError;
use crate::{Interpreter, Value};

/// a user-defined function: a name, named untyped parameters, and a
/// yet un-evaluated body
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub formals: Vec<String>,
    pub body: Expr,
}

impl UserFunction {
    pub fn new(name: String, formals: Vec<String>, body: Expr) -> UserFunction {
        UserFunction { name, formals, body }
    }

    pub fn arity(&self) -> usize {
        self.formals.len()
    }

    /// pair each formal with its argument, after checking that the counts match
    pub fn bind_args(&self, args: Vec<Value>) -> Result<Vec<(String, Value)>, RunError> {
        if args.len() != self.arity() {
            return Err(RunError::MissingArguments {
                name: self.name.clone(),
                expected: self.arity(),
                got: args.len(),
            });
        }

        Ok(self.formals.iter().cloned().zip(args).collect())
    }
}

/// printed when a function is defined, e.g. `<UserFunction mod(m, n)>`
impl fmt::Display for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<UserFunction {}({})>", self.name, join(self.formals.iter(), ", "))
    }
}

/// is `name` a special form keyword or a builtin operator?
pub fn is_reserved(name: &str) -> bool {
    SpecialForm::from_name(name).is_some() || Operator::from_symbol(name).is_some()
}

/// every function defined during a session, by name
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    defs: HashMap<String, Rc<UserFunction>>,
}

impl FunctionTable {
    pub fn new() -> FunctionTable {
        FunctionTable::default()
    }

    /// install a function, replacing any previous definition of the same name
    pub fn define_function(
        &mut self,
        name: String,
        formals: Vec<String>,
        body: Expr,
    ) -> Result<Rc<UserFunction>, RunError> {
        if is_reserved(&name) {
            return Err(RunError::ReservedIdentifier(name));
        }

        let func = Rc::new(UserFunction::new(name.clone(), formals, body));
        self.defs.insert(name, func.clone());
        Ok(func)
    }

    pub fn lookup_function(&self, name: &str) -> Result<Rc<UserFunction>, RunError> {
        self.defs
            .get(name)
            .cloned()
            .ok_or_else(|| RunError::UndefinedFunction(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// every defined function, sorted by name
    pub fn functions(&self) -> Vec<Rc<UserFunction>> {
        let mut funcs: Vec<_> = self.defs.values().cloned().collect();
        funcs.sort_by(|a, b| a.name.cmp(&b.name));
        funcs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn reset(&mut self) {
        self.defs.clear();
    }
}

impl<W: Write> Interpreter<W> {
    /// run a user function with already evaluated arguments. the body sees
    /// its own parameters and the globals, nothing from the caller.
    pub fn call(&mut self, func: &UserFunction, args: Vec<Value>) -> Result<Value, Error> {
        let bindings = func.bind_args(args)?;
        let globals = self.env.clone();
        env::with_local_frame(&globals, bindings, |frame| self.eval(&func.body, frame))
    }
}

// }}}
