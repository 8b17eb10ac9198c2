use wisp::builtins::BUILTINS;
use wisp::codegen::WatCodegen;
use wisp::interpreter::{Interpreter, Value};
use wisp::lexer;
use wisp::parser::Parser;

use ariadne::Source;
use yansi::Paint;

use std::env;
use std::fs;
use std::process;

fn main() {
    let filepath = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/fib.wisp".to_string());

    let contents =
        fs::read_to_string(&filepath).expect("Should have been able to read the file :/");

    let tokens = match lexer::tokenize(&contents) {
        Ok(tokens) => tokens,
        Err((err, span)) => {
            eprintln!(
                "{} {} at offset {}",
                "lexical error:".red().bold(),
                err,
                span.start
            );
            process::exit(1);
        }
    };

    let mut parser = Parser::new(&tokens, contents.len());
    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(err) => {
            err.report(filepath.clone())
                .print((filepath.clone(), Source::from(contents.clone())))
                .unwrap();
            process::exit(1);
        }
    };

    let mut interpreter =
        Interpreter::new(BUILTINS, Box::new(|value: Value| println!("{value}")));
    if let Err(err) = interpreter.evaluate(&program) {
        eprintln!("{} {}", "runtime error:".red().bold(), err);
        process::exit(1);
    }

    let mut codegen = WatCodegen::new(BUILTINS);
    match codegen.generate(&program) {
        Ok(wat) => print!("{wat}"),
        Err(err) => {
            eprintln!("{} {}", "codegen error:".red().bold(), err);
            process::exit(1);
        }
    }
}
