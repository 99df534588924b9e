use std::env;

use monkey_lang::repl;

pub fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    // args always includes the program name in args[0]
    match args.len() {
        1 => repl::run_prompt(),
        2 => repl::run_file(&args[1]),
        _ => {
            eprintln!("Usage: monkey [script]");
            std::process::exit(64);
        }
    }
}
