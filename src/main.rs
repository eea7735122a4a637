//! OLCScript CLI
//!
//! Command-line interface for the OLCScript interpreter.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use olcscript::lexer::Lexer;
use olcscript::{run, VERSION};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() == 1 {
        // No arguments: start REPL
        println!("OLCScript v{} - Language Interpreter", VERSION);
        println!("Type 'exit' to quit\n");
        repl();
        return;
    }

    // Check for flags
    let mut show_tokens = false;
    let mut show_help = false;
    let mut as_json = false;
    let mut filename: Option<&String> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--tokens" | "-t" => show_tokens = true,
            "--help" | "-h" => show_help = true,
            "--json" => as_json = true,
            _ if arg.starts_with('-') => {
                eprintln!("Unknown flag: {}", arg);
                print_usage();
                process::exit(1);
            }
            _ => filename = Some(arg),
        }
    }

    if show_help {
        print_help();
        return;
    }

    if let Some(file) = filename {
        let result = if show_tokens {
            show_file_tokens(file)
        } else {
            run_file(file, as_json)
        };
        if let Err(e) = result {
            if !e.is_empty() {
                eprintln!("{}", e);
            }
            process::exit(1);
        }
    } else {
        eprintln!("Error: No input file specified");
        print_usage();
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: olcs [OPTIONS] [script]");
    eprintln!("       olcs --help");
}

fn print_help() {
    println!("OLCScript v{} - A statically-checked scripting language", VERSION);
    println!();
    println!("USAGE:");
    println!("    olcs [OPTIONS] [script]");
    println!();
    println!("OPTIONS:");
    println!("    -t, --tokens    Show tokenization output (lexer only)");
    println!("    --json          Print the full response payload as JSON");
    println!("    -h, --help      Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    olcs script.olc           Run an OLCScript program");
    println!("    olcs --json script.olc    Run and print the JSON response");
    println!("    olcs --tokens script.olc  Show tokens from lexer");
    println!("    olcs                      Start interactive REPL");
}

/// Run an OLCScript program from a file
fn run_file(filename: &str, as_json: bool) -> Result<(), String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    let response = run(&source, filename);

    if as_json {
        println!("{}", response.to_json());
        return Ok(());
    }

    if !response.result.is_empty() {
        println!("{}", response.result);
    }
    if !response.symbols.is_empty() {
        println!("{}", response.symbols);
    }
    if !response.errs.is_empty() {
        return Err(String::new());
    }
    Ok(())
}

/// Show tokens from lexing a file
fn show_file_tokens(filename: &str) -> Result<(), String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    let (tokens, errors) = Lexer::new(&source, filename).tokenize();

    println!("Tokens for '{}':", filename);
    println!("{}", "=".repeat(60));

    for (i, token) in tokens.iter().enumerate() {
        println!(
            "{:4}: {:20} | {:?}",
            i,
            format!("{:?}", token.token_type),
            token.lexeme
        );
    }

    println!("{}", "=".repeat(60));
    println!("Total tokens: {}", tokens.len());

    if !errors.is_empty() {
        let rendered: Vec<String> = errors
            .iter()
            .map(|e| olcscript::error::Diagnostic::new(e.clone()).format())
            .collect();
        return Err(rendered.join("\n"));
    }
    Ok(())
}

/// Start an interactive REPL (Read-Eval-Print Loop)
fn repl() {
    let mut line_number = 1;

    loop {
        print!("olc:{} > ", line_number);
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let input = input.trim();

                if input == "exit" || input == "quit" {
                    break;
                }

                if input.is_empty() {
                    continue;
                }

                let response = run(input, "<repl>");
                if !response.result.is_empty() {
                    println!("{}", response.result);
                }

                line_number += 1;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    println!("\nGoodbye!");
}
