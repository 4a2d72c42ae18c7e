use clap::{Parser as ClapParser, Subcommand};
use fql_lang::cli::{self, CliError, CompileOptions, CompileResult, DumpOptions, DumpResult};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "fql")]
#[command(about = "fql - compile filter expressions to parameterized SQL and inspect config files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a filter expression against a table
    Compile {
        /// The filter expression, e.g. `status:active,age:gte:18`
        filter: Option<String>,

        /// Read the filter from a raw query string instead
        #[arg(short, long)]
        query: Option<String>,

        /// Table to select from
        #[arg(short, long, default_value = "entity")]
        table: String,

        /// Alias used for column references
        #[arg(short, long, default_value = "e")]
        alias: String,

        /// Comma-separated list of filterable fields
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Fail on a malformed filter instead of ignoring it
        #[arg(long)]
        strict: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, print the parsed tree
        #[arg(long)]
        syntax_only: bool,
    },

    /// Load and merge config files, print them as JSON
    Config {
        /// Config files, merged in order (reads stdin if none)
        files: Vec<String>,

        /// Print only the value at this dotted key
        #[arg(short, long)]
        get: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't print
        #[arg(long)]
        syntax_only: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            filter,
            query,
            table,
            alias,
            fields,
            strict,
            pretty,
            syntax_only,
        } => run_compile(
            CompileOptions {
                filter,
                query_string: query,
                table,
                alias,
                fields,
                strict,
                syntax_only,
            },
            pretty,
        ),
        Commands::Config {
            files,
            get,
            pretty,
            syntax_only,
        } => run_config(files, get, pretty, syntax_only),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{}", e),
    }
}

fn run_compile(options: CompileOptions, pretty: bool) -> Result<(), CliError> {
    match cli::execute_compile(&options)? {
        CompileResult::SyntaxValid(tree) => println!("Syntax is valid: {}", tree),
        CompileResult::Success(output) => print_json(&output, pretty),
    }
    Ok(())
}

fn run_config(
    files: Vec<String>,
    get: Option<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let input = if files.is_empty() && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    } else {
        None
    };

    let options = DumpOptions {
        files,
        input,
        get,
        syntax_only,
    };

    match cli::execute_dump(&options)? {
        DumpResult::SyntaxValid => println!("Syntax is valid"),
        DumpResult::Success(output) => print_json(&output, pretty),
    }
    Ok(())
}
