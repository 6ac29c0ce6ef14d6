pub mod ast;
pub mod diagnostic;
pub mod interpret;
pub mod parse;
pub mod span;
pub mod token;

use log::{debug, trace};

pub use diagnostic::{Diagnostic, DiagnosticKind, Report};
pub use interpret::{Interpreter, Output, WriterOutput};

/// Scans, parses and runs one unit of source text.
///
/// Nothing runs if scanning or parsing reported anything; in that case the
/// report lists every lexical and syntax problem found. Otherwise the report
/// holds at most the one runtime error that stopped execution.
pub fn run(input: &str, itp: &mut Interpreter) -> Report {
    let mut report = Report::default();

    let (tokens, lex_errors) = parse::scan(input);
    for token in &tokens {
        trace!("{} - {:?}: {:?}", token.line, token.kind, token.lexeme);
    }
    report.extend(lex_errors.iter().map(Diagnostic::from));

    let (stmts, parse_errors) = parse::parse(&tokens);
    report.extend(parse_errors.iter().map(Diagnostic::from));

    if !report.is_ok() {
        debug!(
            "not running: {} diagnostics before execution",
            report.diagnostics.len()
        );
        return report;
    }

    trace!("{:?}", stmts);
    if let Err(err) = itp.interpret(&stmts) {
        report.push(Diagnostic::from(&err));
    }
    report
}
