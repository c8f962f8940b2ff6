//! Quill interpreter
//!
//! Usage: quill [OPTIONS] <input>

use anyhow::Context;
use clap::{ArgAction, Parser as ClapParser};
use quill_lang::{BodyPolicy, CompileContext, DiagnosticReporter, Pipeline, PipelineConfig};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "quill")]
#[command(author = "Quill Team")]
#[command(version)]
#[command(about = "Interpreter for the Quill expression language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump the global symbol table (for debugging)
    #[arg(long)]
    dump_globals: bool,

    /// What a function body does after a nested function declaration
    #[arg(long, value_enum, default_value = "stop-on-absent")]
    body_policy: BodyPolicy,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    // Set up diagnostic reporter
    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = PipelineConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        dump_globals: args.dump_globals,
        body_policy: args.body_policy,
    };

    let ctx = CompileContext::new(filename, file_id, &reporter);
    let report = Pipeline::new(config).run_source(&source, &ctx)?;

    match report.value {
        Some(value) => println!("main returned: {value}"),
        None => println!("main returned no value"),
    }

    Ok(())
}
