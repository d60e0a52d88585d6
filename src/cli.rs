//! Command line surface of the `wabbit` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// How much the toolchain reports about its own progress on stderr.
    #[arg(value_enum, short, long, default_value_t = LogLevel::Error)]
    pub verbosity: LogLevel,
}

/// Verbosity of the toolchain's progress reporting. Program output and
/// diagnostics are always emitted; these levels only add noise on top.
#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum LogLevel {
    /// Stay quiet unless something went wrong.
    #[default]
    Error,
    /// Additionally surface warnings.
    Warn,
    /// Announce each pipeline stage as it starts: lexing, parsing, type
    /// checking, and interpretation or code generation.
    Info,
    /// Stage announcements plus internals, e.g. the size of the generated
    /// instruction stream.
    Debug,
    /// Everything the toolchain can say about itself.
    Trace,
}

impl LogLevel {
    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a program with the tree-walking interpreter.
    Run(RunArgs),

    /// Lower a program to stack machine code and execute it.
    Vm(VmArgs),

    /// Lex, parse and type check a program without running it.
    Check(RunArgs),

    /// Parse a program and pretty-print it to stdout.
    Fmt(FmtArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Source file to process.
    pub file: std::path::PathBuf,

    /// Dump the parsed AST as JSON.
    #[arg(long)]
    pub dump_parsed: bool,

    /// Dump the type-checked AST as JSON.
    #[arg(long)]
    pub dump_typed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VmArgs {
    /// Source file to process.
    pub file: std::path::PathBuf,

    /// Dump the parsed AST as JSON.
    #[arg(long)]
    pub dump_parsed: bool,

    /// Dump the type-checked AST as JSON.
    #[arg(long)]
    pub dump_typed: bool,

    /// Print the instruction listing before executing it.
    #[arg(long)]
    pub dump_code: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FmtArgs {
    /// Source file to re-print.
    pub file: std::path::PathBuf,
}
