// decant - blog archive migration toolkit
// See docs/cli.md for the command reference

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use decant_cli::exit_codes::EXIT_SUCCESS;
use decant_cli::{likes, migrate, CliError};

#[derive(Parser)]
#[command(name = "decant")]
#[command(about = "Reconcile a legacy blog export into a static archive")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an export against a date authority and write the archive
    #[command(after_help = "\
The output directory is recreated from scratch on every run; anything
already in it is deleted first.

Examples:
  decant migrate entities.xml --dates dates.txt --out public/archive
  decant migrate entities.xml --dates dates.txt --out public/archive \\
      --link-host https://wiki.example.com
  decant migrate entities.xml --dates dates.txt --out public/archive --json > report.json
  decant migrate entities.xml --dates dates.txt --out public/archive -q")]
    Migrate {
        /// Entity export file (XML)
        export: PathBuf,

        /// Date/link authority file (title:date::token lines)
        #[arg(long)]
        dates: PathBuf,

        /// Output directory (recreated from scratch)
        #[arg(long)]
        out: PathBuf,

        /// Rewrite {host}/x/{token} links to canonical relative paths
        #[arg(long, value_name = "URL")]
        link_host: Option<String>,

        /// Stop rewriting a body at its first unresolved link token, like
        /// the migration tool this one replaces
        #[arg(long)]
        legacy_link_parity: bool,

        /// Print the JSON run report to stdout
        #[arg(long)]
        json: bool,

        /// Also write the JSON run report to a file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Suppress per-file progress and the summary line
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Parse an export and report record counts without writing anything
    #[command(after_help = "\
Examples:
  decant inspect entities.xml")]
    Inspect {
        /// Entity export file (XML)
        export: PathBuf,
    },

    /// Rank a live space's blog posts by like count
    #[command(after_help = "\
Token resolution: --token, then the DECANT_TOKEN environment variable,
then the token file.

Examples:
  decant likes --host https://wiki.example.com --space ENG
  decant likes --host https://wiki.example.com --space ENG --out likes.csv
  DECANT_TOKEN=... decant likes --host https://wiki.example.com --space ENG")]
    Likes {
        /// Base URL of the content API host
        #[arg(long)]
        host: String,

        /// Space key to walk
        #[arg(long)]
        space: String,

        /// Bearer token (overrides DECANT_TOKEN and --token-file)
        #[arg(long)]
        token: Option<String>,

        /// File to read the bearer token from
        #[arg(long, value_name = "FILE", default_value = "~/.config/decant/token")]
        token_file: String,

        /// Write CSV to a file instead of the listing on stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  decant-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  decant-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate {
            export,
            dates,
            out,
            link_host,
            legacy_link_parity,
            json,
            report,
            quiet,
        } => migrate::cmd_migrate(
            export, dates, out, link_host, legacy_link_parity, json, report, quiet,
        ),
        Commands::Inspect { export } => migrate::cmd_inspect(export),
        Commands::Likes {
            host,
            space,
            token,
            token_file,
            out,
            quiet,
        } => likes::cmd_likes(host, space, token, token_file, out, quiet),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
