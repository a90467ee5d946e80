use chainql::cli::{self, CliError, CompileCommand, CompileResult};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "chainql")]
#[command(about = "chainql - compile filter and mutation chains into MongoDB query and update documents")]
#[command(version)]
struct Cli {
    /// Log recognized steps and assembled clauses
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a chain and print its documents as JSON
    Compile {
        /// The chain to compile (reads from stdin if not provided)
        chain: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Fail on steps whose operands have no wire form instead of dropping them
        #[arg(long)]
        strict: bool,

        /// Only validate syntax, don't compile
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'chainql docs' to list categories)
        category: String,
    },

    /// Short onboarding tutorial
    Onboard,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("chainql=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compile {
            chain,
            pretty,
            strict,
            syntax_only,
        } => run_compile(chain, pretty, strict, syntax_only),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
        Commands::Onboard => {
            print!("{}", cli::get_onboarding_content());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_compile(
    chain: Option<String>,
    pretty: bool,
    strict: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let chain = match chain {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let command = CompileCommand {
        chain,
        pretty,
        strict,
        syntax_only,
    };

    match cli::execute_compile(&command)? {
        CompileResult::SyntaxValid => println!("Syntax is valid"),
        CompileResult::Success(output) => println!("{}", cli::render(&output, pretty)?),
    }
    Ok(())
}
