use clap::{ArgAction, Parser as ClapParser, Subcommand};
use keypath::cli::{self, CliError, Extract, GetOptions, LoggingConfig};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "keypath")]
#[command(about = "keypath - read typed values out of JSON documents by path")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the value at a path
    Get {
        /// Path such as '$[users][0][name]'
        path: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// How to extract the value
        #[arg(short = 'a', long = "as", value_enum, default_value_t = Extract::Json)]
        extract: Extract,

        /// Print null instead of failing when the path is absent
        #[arg(short, long)]
        optional: bool,

        /// Date pattern used with --as date
        #[arg(long)]
        date_format: Option<String>,

        /// Time zone for dates without an offset, e.g. +02:00
        #[arg(long)]
        time_zone: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_verbosity(cli.verbose);
    logging.merge_with_env();
    logging.init();

    let result = match cli.command {
        Commands::Get {
            path,
            input,
            extract,
            optional,
            date_format,
            time_zone,
            pretty,
        } => run_get(
            GetOptions {
                path,
                input,
                extract,
                optional,
                date_format,
                time_zone,
            },
            pretty,
        ),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_get(mut options: GetOptions, pretty: bool) -> Result<(), CliError> {
    if options.input.is_none() && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    let output = cli::execute_get(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
