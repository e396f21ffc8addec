use clap::{Parser as ClapParser, Subcommand};
use mapper_sql::cli::{self, CliError, ResolveOptions};
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(ClapParser)]
#[command(name = "mapper")]
#[command(about = "Resolve SQL statements from mapper files, expanding includes and property bindings")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a statement to SQL
    Resolve {
        /// Statement id, bare (first mapper's namespace) or qualified
        statement: String,

        /// Mapper file; repeat to load several namespaces
        #[arg(short, long = "mapper", required = true)]
        mappers: Vec<PathBuf>,

        /// JSON object of variable bindings (reads from stdin if piped)
        #[arg(long)]
        vars: Option<String>,

        /// Undo include property bindings when each include returns
        #[arg(long)]
        scoped: bool,

        /// Recurse into cyclic includes instead of failing
        #[arg(long)]
        no_cycle_check: bool,

        /// Keep the original whitespace of the statement
        #[arg(long)]
        raw: bool,
    },

    /// Validate mapper files and list their statements
    Check {
        /// Mapper file; repeat to load several namespaces
        #[arg(short, long = "mapper", required = true)]
        mappers: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            statement,
            mappers,
            vars,
            scoped,
            no_cycle_check,
            raw,
        } => run_resolve(statement, mappers, vars, scoped, !no_cycle_check, raw),
        Commands::Check { mappers } => run_check(mappers),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_mappers(paths: &[PathBuf]) -> Result<Vec<String>, CliError> {
    paths
        .iter()
        .map(|path| fs::read_to_string(path).map_err(CliError::Io))
        .collect()
}

fn run_resolve(
    statement: String,
    mappers: Vec<PathBuf>,
    vars: Option<String>,
    scoped: bool,
    detect_cycles: bool,
    raw: bool,
) -> Result<(), CliError> {
    let variables = match vars {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer).filter(|b| !b.trim().is_empty())
        }
        None => None,
    };

    let options = ResolveOptions {
        statement,
        mappers: read_mappers(&mappers)?,
        variables,
        scoped,
        detect_cycles,
        raw,
    };

    println!("{}", cli::execute_resolve(&options)?);
    Ok(())
}

fn run_check(mappers: Vec<PathBuf>) -> Result<(), CliError> {
    for name in cli::execute_check(&read_mappers(&mappers)?)? {
        println!("{}", name);
    }
    Ok(())
}
