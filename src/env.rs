use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::RunError;
use crate::Value;

/// The “memory” of the interpreter is represented as a HashMap, with an
/// optional parent EnvRef, that is passed around in an Rc<RefCell<>>.
/// The global frame has no parent; a local frame's parent is always the
/// global frame, never the frame of its caller.
#[derive(Debug, Clone)]
pub struct Env {
    pub vars: HashMap<String, Value>,
    pub parent: Option<EnvRef>,
}

/// an interior-mutable, reference-counted smart pointer wrapper around an `Env`
pub type EnvRef = Rc<RefCell<Env>>;

impl Env {
    /// create a new environment
    pub fn new(parent: Option<EnvRef>) -> Env {
        Env {
            vars: HashMap::new(),
            parent,
        }
    }

    /// create an empty global frame
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Env::new(None)))
    }

    /// create a local frame holding `bindings`, chained to `globals`
    pub fn local<I>(globals: &EnvRef, bindings: I) -> EnvRef
        where I: IntoIterator<Item = (String, Value)>
    {
        let mut env = Env::new(Some(globals.clone()));
        env.vars.extend(bindings);
        Rc::new(RefCell::new(env))
    }

    /// resolve a variable, looking in this frame first and then the parent
    pub fn lookup(&self, var_name: &str) -> Result<Value, RunError> {
        match self.vars.get(var_name) {
            Some(x) => Ok(*x),
            None => match &self.parent {
                Some(env) => env.borrow().lookup(var_name),
                None      => Err(RunError::UndefinedVariable(var_name.to_owned())),
            },
        }
    }

    /// add (or modify) a value in the outermost frame, whatever frame is active
    pub fn define_global(&mut self, var_name: &str, value: Value) -> Value {
        match &self.parent {
            Some(env) => env.borrow_mut().define_global(var_name, value),
            None => {
                self.vars.insert(var_name.to_owned(), value);
                value
            }
        }
    }
}

/// evaluate `body` against a fresh local frame. the frame is dropped as soon
/// as `body` returns, whether it succeeded or not.
pub fn with_local_frame<I, F, T>(globals: &EnvRef, bindings: I, body: F) -> T
    where I: IntoIterator<Item = (String, Value)>,
          F: FnOnce(&EnvRef) -> T
{
    let frame = Env::local(globals, bindings);
    body(&frame)
}

// }}}
