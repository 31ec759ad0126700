// rulelang: parse a rule source file and print its AST as JSON

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rulelang::{ParseOptions, Parser, SyntaxError, TokenStream};

#[derive(Debug, ClapParser)]
#[command(name = "rulelang", version, about = "Parse rule source files into a JSON AST")]
struct Args {
    /// Source file to parse
    file: PathBuf,

    /// Print the token stream instead of the AST
    #[arg(long)]
    tokens: bool,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Accept string literals that run to end of input
    #[arg(long)]
    allow_unterminated_strings: bool,

    /// Reject rule declarations that repeat a parameter name
    #[arg(long)]
    reject_duplicate_params: bool,

    /// Maximum expression nesting depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Log filter (overrides RULELANG_LOG), e.g. "debug" or "rulelang::lexer=trace"
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

impl Args {
    fn options(&self) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            strict_strings: !self.allow_unterminated_strings,
            reject_duplicate_params: self.reject_duplicate_params,
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env("RULELANG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn report(file: &Path, err: &SyntaxError) -> ! {
    eprintln!(
        "{}:{}:{}: syntax error: {}",
        file.display(),
        err.line(),
        err.column(),
        err.message()
    );
    process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", args.file.display(), e);
            process::exit(1);
        }
    };
    info!(file = %args.file.display(), bytes = source.len(), "parsing");

    let options = args.options();
    let output = if args.tokens {
        match TokenStream::with_options(&source, options).tokenize() {
            Ok(tokens) if args.compact => serde_json::to_string(&tokens)?,
            Ok(tokens) => serde_json::to_string_pretty(&tokens)?,
            Err(e) => report(&args.file, &e),
        }
    } else {
        match Parser::with_options(&source, options).parse() {
            Ok(program) if args.compact => program.to_json()?,
            Ok(program) => program.to_json_pretty()?,
            Err(e) => report(&args.file, &e),
        }
    };

    println!("{}", output);
    Ok(())
}
