//! The read-eval-print loop, independent of where its lines come from.

use failure::Error;
use itertools::join;
use std::io::Write;

use crate::{Interpreter, Value};

pub const PROMPT: &str = "> ";
pub const QUIT_COMMAND: &str = ".q";

/// a source of input lines: a line editor in the binary, a scripted
/// dialogue in tests
pub trait LineReader {
    /// show `prompt` and read one line. `None` means the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error>;
}

/// read lines until `.q` or the end of input, printing each result (or
/// `*** <error>`) to the interpreter's output
pub fn repl<W, R>(interpreter: &mut Interpreter<W>, reader: &mut R) -> Result<(), Error>
    where W: Write,
          R: LineReader
{
    while let Some(line) = reader.read_line(PROMPT)? {
        let line = line.trim();

        if line == QUIT_COMMAND {
            break;
        } else if line.is_empty() {
            continue;
        } else if line.starts_with('.') {
            let reply = command(interpreter, line);
            if !reply.is_empty() {
                writeln!(interpreter.output_mut(), "{}", reply)?;
            }
            continue;
        }

        match interpreter.run(line) {
            Ok(outcome) => writeln!(interpreter.output_mut(), "{}", outcome)?,
            Err(err) => writeln!(interpreter.output_mut(), "*** {}", err)?,
        }
    }

    Ok(())
}

/// answer a dot command such as `.env`
fn command<W: Write>(interpreter: &Interpreter<W>, cmd: &str) -> String {
    match cmd {
        ".env" => {
            let mut vars: Vec<(String, Value)> = interpreter.env.borrow().vars
                .iter()
                .map(|(name, value)| (name.clone(), *value))
                .collect();
            vars.sort_by(|a, b| a.0.cmp(&b.0));
            join(vars.iter().map(|(name, value)| format!("{} = {}", name, value)), "\n")
        }
        ".defs" => join(interpreter.functions.functions().iter(), "\n"),
        _ => format!("*** Unknown command: '{}'.", cmd),
    }
}

// }}}
