use std::{cell::RefCell, rc::Rc};

use log::{debug, error, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use tinyscript::{Interpreter, Report, WriterOutput};

type DynResult = Result<(), Box<dyn std::error::Error>>;

const USAGE: &str = "usage: tinyscript -i | -f <file>";

fn main() -> DynResult {
    if let Err(e) = dotenvy::dotenv() {
        println!("dotenvy load with error {}", e);
    }
    env_logger::init();

    let args = std::env::args().collect::<Vec<String>>();
    debug!("{:?}", args);

    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("-i"), _) => repl(),
        (Some("-f"), Some(path)) => read_from_file(path),
        _ => {
            eprintln!("{}", USAGE);
            Err(USAGE.into())
        }
    }
}

fn new_interpreter() -> Interpreter {
    let output = Rc::new(RefCell::new(WriterOutput::new(std::io::stdout())));
    Interpreter::new(output)
}

fn repl() -> DynResult {
    info!("Running in REPL mode");

    let mut rl = DefaultEditor::new()?;
    let mut itp = new_interpreter();

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                rl.add_history_entry(&line)?;
                match line.trim() {
                    ":quit" => break,
                    ":reset" => itp.reset(),
                    source => {
                        print_diagnostics(&tinyscript::run(source, &mut itp));
                    }
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => break,
            Err(err) => {
                return Err(Box::new(err));
            }
        }
    }

    Ok(())
}

fn read_from_file(file_path: &str) -> DynResult {
    info!("Read from file {}", file_path);
    let contents = std::fs::read_to_string(file_path)?;
    let mut itp = new_interpreter();

    let report = tinyscript::run(&contents, &mut itp);
    print_diagnostics(&report);
    if report.is_ok() {
        Ok(())
    } else {
        Err(format!("{} failed with {} error(s)", file_path, report.diagnostics.len()).into())
    }
}

fn print_diagnostics(report: &Report) {
    for diagnostic in &report.diagnostics {
        error!("{}", diagnostic);
        eprintln!("{}", diagnostic);
    }
}
