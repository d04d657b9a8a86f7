use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use wolfram_tool::{
    Config, FieldFilter, QueryClient, QueryOptions, ResponseFormat, WolframClientBuilder,
};

/// wolfram-tool - ask Wolfram|Alpha a question from the command line
#[derive(Parser)]
#[command(name = "wolfram-tool")]
#[command(about = "Query Wolfram|Alpha and print a formatted answer")]
#[command(version)]
struct Cli {
    /// The question to ask; prompts on stdin when omitted
    #[arg(value_name = "QUESTION")]
    question: Option<String>,

    /// Rendering to print: default, html or plaintext
    #[arg(short, long, value_name = "FORMAT", default_value = "default")]
    format: String,

    /// Comma-separated result fields to print exclusively
    #[arg(short, long, value_name = "FIELDS")]
    include: Option<String>,

    /// Comma-separated result fields whose text is removed
    #[arg(short, long, value_name = "FIELDS")]
    exclude: Option<String>,

    /// Extra API parameter as key=value (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Maximum number of continuation pages to follow
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    // Credential check happens before anything else is built
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&cli, &config) {
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    }
}

/// Wires up logging and the client, then answers one question.
fn run(cli: &Cli, config: &Config) -> Result<()> {
    setup_logging(&config.log_file, &mut io::stderr());

    let transport = WolframClientBuilder::from_config(config)
        .build()
        .context("Failed to create Wolfram|Alpha client")?;
    let client = QueryClient::new(Arc::new(transport))
        .with_max_pages(cli.max_pages.unwrap_or(config.max_pages));

    let question = match &cli.question {
        Some(question) => question.clone(),
        None => prompt_question(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let output = client.query(&question, &build_options(cli));
    println!("{output}");

    Ok(())
}

/// Installs the file log sink, warning on `err` and carrying on without it
/// when the file cannot be opened.
///
/// Returns whether the sink was installed.
fn setup_logging(path: &Path, err: &mut impl Write) -> bool {
    match wolfram_tool::logging::init_file_logging(path) {
        Ok(()) => true,
        Err(e) => {
            let _ = writeln!(err, "Warning: {e:#}; continuing without log file");
            false
        }
    }
}

/// Prints the welcome banner and reads one line as the question.
///
/// The trailing newline is stripped; nothing else is altered.
fn prompt_question(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    writeln!(output, "Welcome to the Wolfram Alpha query tool!")?;
    writeln!(
        output,
        "You can ask questions about mathematical calculations, unit conversions,"
    )?;
    writeln!(
        output,
        "scientific data, date and time calculations, and more."
    )?;
    writeln!(output, "Enter your question below:")?;
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read question from stdin")?;

    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Builds per-query options from the command-line flags.
fn build_options(cli: &Cli) -> QueryOptions {
    let include = cli.include.as_deref().map(parse_fields).unwrap_or_default();
    let exclude = cli.exclude.as_deref().map(parse_fields).unwrap_or_default();

    QueryOptions {
        format: ResponseFormat::parse_or_default(&cli.format),
        filter: FieldFilter::from_lists(&include, &exclude),
        params: cli.params.clone(),
    }
}

/// Parses comma-separated field names.
///
/// Splits on commas, trims whitespace from each name, and filters out empty strings.
fn parse_fields(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a `key=value` API parameter.
fn parse_param(input: &str) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{input}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("parameter name cannot be empty in '{input}'"));
    }

    Ok((key.to_string(), value.to_string()))
}
