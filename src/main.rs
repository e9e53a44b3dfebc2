use failure::Error;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use structopt::StructOpt;
use sublisp::repl::{self, LineReader, QUIT_COMMAND};
use sublisp::{log, Interpreter, DEFAULT_MAX_DEPTH};

#[derive(StructOpt, Debug)]
struct Opt {
    #[structopt(short = "d", long = "debug")]
    debug: bool,

    #[structopt(long = "max-depth", default_value = "256", help = "how deeply evaluation may nest")]
    max_depth: usize,

    #[structopt(name = "INITFILE", parse(from_os_str), help = "file to run on startup")]
    initfile: Option<PathBuf>,
}

const HISTFILE: &str = ".sublisp_hist";

/// feeds the repl from a rustyline editor, keeping history
struct Editor {
    rl: DefaultEditor,
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, Error> {
        loop {
            match self.rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.rl.add_history_entry(line.as_str())?;
                    }
                    return Ok(Some(line));
                }

                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }

                Err(ReadlineError::Eof) => {
                    println!("^D");
                    return Ok(None);
                }

                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn main() {
    let opt = Opt::from_args();
    log::set_debug(opt.debug);
    log::debug(format!("set options: {:?}", opt));

    if let Err(err) = run(&opt) {
        log::error(err);
        std::process::exit(1);
    }
}

fn run(opt: &Opt) -> Result<(), Error> {
    if opt.max_depth != DEFAULT_MAX_DEPTH {
        log::info(format!("evaluation limited to a depth of {}", opt.max_depth));
    }

    let mut interpreter = Interpreter::new().with_max_depth(opt.max_depth);
    if let Some(initfile) = &opt.initfile {
        if let Err(why) = interpreter.run_file(initfile) {
            log::warn(why);
        }
    }

    let mut editor = Editor { rl: DefaultEditor::new()? };
    if let Err(err) = editor.rl.load_history(HISTFILE) {
        log::warn(format!("error opening history file: {}", err));
    }

    log::info(format!("To exit, type {}", QUIT_COMMAND));
    repl::repl(&mut interpreter, &mut editor)?;

    if let Err(err) = editor.rl.save_history(HISTFILE) {
        log::warn(format!("error saving history file: {}", err));
    }

    Ok(())
}
