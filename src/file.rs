use failure::Error;

use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::log;
use crate::parser;
use crate::Interpreter;

impl<W: Write> Interpreter<W> {
    /// run each line of a file. a failing line is logged and skipped, so
    /// later lines still see everything defined before it. returns the
    /// number of lines that failed.
    pub fn run_file<P>(&mut self, path: P) -> Result<usize, Error>
        where P: AsRef<Path> + Debug
    {
        log::info(format!("running {:?}...", path));

        let file = File::open(path)?;
        let buf = BufReader::new(file);
        let mut failures = 0;

        for (lineno, line) in buf.lines().enumerate() {
            let line = line?;
            if parser::tokenize(&line).is_empty() {
                continue;
            }

            if let Err(err) = self.run(&line) {
                failures += 1;
                log::warn(format!("line {}: {}", lineno + 1, line));
                log::warn(err);
            }
        }

        log::info("run_file: done");
        Ok(failures)
    }
}

// }}}
