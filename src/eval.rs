use failure::Error;
use std::io::Write;

use crate::ast::{Expr, Form, Head, Special};
use crate::env::EnvRef;
use crate::errors::RunError;
use crate::{Interpreter, Value};

impl<W: Write> Interpreter<W> {
    /// evaluate a classified expression in `env`. every nested evaluation
    /// counts against the session's depth limit.
    pub fn eval(&mut self, expr: &Expr, env: &EnvRef) -> Result<Value, Error> {
        if self.depth >= self.max_depth {
            return Err(RunError::RecursionLimit(self.max_depth).into());
        }

        self.depth += 1;
        let result = match expr {
            Expr::Number(n) => Ok(*n),
            Expr::Symbol(sym) => env.borrow().lookup(sym).map_err(Error::from),
            Expr::Form(form) => self.eval_form(form, env),
        };
        self.depth -= 1;

        result
    }

    fn eval_form(&mut self, form: &Form, env: &EnvRef) -> Result<Value, Error> {
        match (&form.head, form.args.as_slice()) {
            (Head::Special(Special::Set(name)), [value]) => {
                let value = self.eval(value, env)?;
                Ok(env.borrow_mut().define_global(name, value))
            }

            (Head::Special(Special::If), [test, conseq, alt]) => {
                let branch = if self.eval(test, env)? != 0.0 { conseq } else { alt };
                self.eval(branch, env)
            }

            (Head::Special(Special::While), [test, body]) => {
                while self.eval(test, env)? != 0.0 {
                    self.eval(body, env)?;
                }
                Ok(0.0)
            }

            (Head::Special(Special::Begin), []) => Err(RunError::EmptyBegin.into()),

            (Head::Special(Special::Begin), [body @ .., last]) => {
                for expr in body {
                    self.eval(expr, env)?;
                }
                self.eval(last, env)
            }

            (Head::Special(Special::Print), [value]) => {
                let value = self.eval(value, env)?;
                writeln!(self.output, "{}", value)?;
                Ok(value)
            }

            (Head::Special(Special::Define(_)), _) => Err(RunError::MisplacedDefine.into()),

            (Head::Builtin(op), args) => {
                let values = self.eval_list(args, env)?;
                Ok(op.apply(&values)?)
            }

            (Head::Call(name), args) => {
                let func = self.functions.lookup_function(name)?;
                let values = self.eval_list(args, env)?;
                self.call(&func, values)
            }

            (Head::Special(special), args) => Err(RunError::MalformedForm {
                form: special.keyword().to_owned(),
                msg: format!("unexpected {} argument(s)", args.len()),
            }.into()),
        }
    }

    /// evaluate every expression in order, left to right
    pub fn eval_list(&mut self, args: &[Expr], env: &EnvRef) -> Result<Vec<Value>, Error> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, env)?);
        }
        Ok(values)
    }
}

// }}}
