use std::fs::File;
use std::io::Read;

use encoding_rs_io::DecodeReaderBytesBuilder;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::environment::Environment;
use crate::evaluator;
use crate::object::Value;
use crate::parser;

/*
The REPL/driver is a thin shell around the three operations the core
exposes: `parse`, `eval`, and `Value::inspect`. It owns the one piece of
state the core doesn't: a persistent `Environment` so `let` bindings
survive from one line to the next.
*/

const MONKEY_FACE: &str = r#"            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;

pub fn run_file(path: &str) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::error!("could not read {path}: {err}");
            eprintln!("could not read {path}: {err}");
            std::process::exit(74);
        }
    };

    // Script files are expected to be UTF-8, but source read from disk is
    // never something the interpreter should panic over: decode leniently
    // rather than failing the whole run on a stray non-UTF-8 byte.
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding_rs::UTF_8))
        .build(file);
    let mut source = String::new();
    if let Err(err) = decoder.read_to_string(&mut source) {
        log::error!("could not decode {path}: {err}");
        eprintln!("could not decode {path}: {err}");
        std::process::exit(74);
    }

    let env = Environment::new();
    match run(&source, &env) {
        Ok(value) => {
            if let Value::Error(msg) = &value {
                log::error!("runtime error: {msg}");
            }
            println!("{}", value.inspect());
        }
        Err(errors) => {
            print_parse_errors(&errors);
            std::process::exit(65);
        }
    }
}

pub fn run_prompt() {
    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");
    let env = Environment::new();

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                match run(&line, &env) {
                    Ok(value) => {
                        if let Value::Error(msg) = &value {
                            log::error!("runtime error: {msg}");
                        }
                        println!("{}", value.inspect());
                    }
                    Err(errors) => print_parse_errors(&errors),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                log::error!("readline error: {err}");
                break;
            }
        }
    }
}

fn run(source: &str, env: &Environment) -> Result<Value, Vec<String>> {
    let (program, errors) = parser::parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(evaluator::eval(&program, env))
}

fn print_parse_errors(errors: &[String]) {
    println!("{MONKEY_FACE}");
    println!("Woops! We ran into some monkey business here!");
    println!(" parser errors:");
    for err in errors {
        println!("\t{err}");
    }
}
