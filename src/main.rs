// File: src/main.rs
//
// Main entry point for the BCL interpreter. Handles command-line argument
// parsing and dispatches to the appropriate subcommand (run or check).

use bcl::analyzer::Analyzer;
use bcl::errors::BclError;
use bcl::interpreter::Interpreter;
use bcl::lexer::tokenize;
use bcl::parser::Parser as BclParser;
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(
    name = "bcl",
    about = "BCL: a small C-like language with structs",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run a BCL source file
    Run {
        /// Path to the .bcl file
        file: PathBuf,
    },

    /// Parse and analyze a BCL source file without executing it
    Check {
        /// Path to the .bcl file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { file } => run_file(&file, true),
        Commands::Check { file } => run_file(&file, false),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run_file(file: &PathBuf, execute: bool) -> Result<(), BclError> {
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to read '{}': {}", file.display(), err);
            process::exit(1);
        }
    };

    let tokens = tokenize(&source);
    let program = BclParser::new(tokens).parse()?;
    Analyzer::new().check(&program)?;

    if execute {
        let mut interpreter = Interpreter::new();
        interpreter.run(&program)?;
    } else {
        println!("{}: no errors found", file.display());
    }
    Ok(())
}
