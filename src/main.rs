//! # Wabbit
//!
//! The Wabbit toolchain binary. It combines lexer, parser, type checker,
//! interpreter and stack machine into a single application.

mod cli;

use cli::*;

use std::{fs, process::exit};

use anyhow::Context as _;
use clap::Parser;
use colored::Colorize;
use log::info;

use wabbit::{
    formatter::format_program,
    interpreter::Interpreter,
    lexer::Lexer,
    parser,
    parser::ast::Statement,
    typechecker::{self, TypeInfo},
    vm::{self, Machine},
};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    simple_logger::init_with_level(args.verbosity.to_level()).unwrap();

    match args.command {
        Commands::Run(run_args) => {
            let source = load(&run_args.file)?;
            let statements = frontend(&source, run_args.dump_parsed, run_args.dump_typed);

            info!("Interpreting '{}'...", run_args.file.to_string_lossy());
            let mut interpreter = Interpreter::new();
            if let Err(e) = interpreter.run(&statements) {
                report(&e);
                exit(1);
            }
        }
        Commands::Vm(vm_args) => {
            let source = load(&vm_args.file)?;
            let statements = frontend(&source, vm_args.dump_parsed, vm_args.dump_typed);

            info!("Generating code...");
            let code = match vm::generate(&statements) {
                Ok(code) => code,
                Err(e) => {
                    report(&e);
                    exit(1);
                }
            };

            if vm_args.dump_code {
                for instruction in &code {
                    println!("{instruction}");
                }
            }

            info!("Running '{}'...", vm_args.file.to_string_lossy());
            let mut machine = Machine::new();
            if let Err(e) = machine.run(&code) {
                report(&e);
                exit(1);
            }
        }
        Commands::Check(check_args) => {
            let source = load(&check_args.file)?;
            frontend(&source, check_args.dump_parsed, check_args.dump_typed);
            info!("'{}' is well-typed", check_args.file.to_string_lossy());
        }
        Commands::Fmt(fmt_args) => {
            let source = load(&fmt_args.file)?;

            let (tokens, lex_errors) = Lexer::new(&source).lex();
            for e in &lex_errors {
                report(e);
            }

            match parser::parse(tokens) {
                Ok(statements) => print!("{}", format_program(&statements)),
                Err(e) => {
                    report(&e);
                    exit(1);
                }
            }

            if !lex_errors.is_empty() {
                exit(1);
            }
        }
    }

    Ok(())
}

fn load(file: &std::path::Path) -> anyhow::Result<String> {
    fs::read_to_string(file)
        .with_context(|| format!("could not read file '{}'", file.to_string_lossy()))
}

/// Run the front half of the pipeline: lex, parse, type check. Any diagnostic
/// terminates the process with a non-zero status.
fn frontend(source: &str, dump_parsed: bool, dump_typed: bool) -> Vec<Statement<TypeInfo>> {
    info!("Lexing...");
    let (tokens, lex_errors) = Lexer::new(source).lex();
    for e in &lex_errors {
        report(e);
    }

    info!("Parsing...");
    let statements = match parser::parse(tokens) {
        Ok(statements) => statements,
        Err(e) => {
            report(&e);
            exit(1);
        }
    };

    if dump_parsed {
        match serde_json::to_string_pretty(&statements) {
            Ok(json) => println!("{json}"),
            Err(e) => report(&e),
        }
    }

    if !lex_errors.is_empty() {
        exit(1);
    }

    info!("Type checking...");
    let statements = match typechecker::check_program(statements) {
        Ok(statements) => statements,
        Err(errors) => {
            for e in &errors {
                report(e);
            }
            exit(1);
        }
    };

    if dump_typed {
        match serde_json::to_string_pretty(&statements) {
            Ok(json) => println!("{json}"),
            Err(e) => report(&e),
        }
    }

    statements
}

fn report(error: &impl std::fmt::Display) {
    eprintln!("{}: {error}", "error".red().bold());
}
