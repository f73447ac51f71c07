use anyhow::Result;
use api_error::commands::{InspectOptions, inspect};
use clap::Parser;

/// api-error - inspect rate limit metadata of failed API responses
///
/// Builds the error a client would raise for a response with the given status and headers,
/// and prints the rate limit fields and retry delay derived from it.
///
/// Examples:
///   api-error inspect -s 429 -H "Retry-After: 30"
///   api-error inspect -H "X-RateLimit-Reset: 1700003600" --now 1700000000
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the derived fields of one failed response
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// HTTP status of the response (picks the error kind)
    #[arg(long, short = 's', value_name = "CODE")]
    pub status: Option<u16>,

    /// Error message of the response
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Response header as "Name: value" (repeatable)
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Response headers as a JSON object, applied after --header
    #[arg(long, value_name = "JSON")]
    pub headers_json: Option<String>,

    /// Current time as Unix seconds (defaults to the system clock)
    #[arg(long, env = "API_ERROR_NOW", value_name = "UNIX_SECONDS")]
    pub now: Option<u64>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl From<InspectArgs> for InspectOptions {
    fn from(args: InspectArgs) -> Self {
        InspectOptions {
            status: args.status,
            message: args.message,
            headers: args.headers,
            headers_json: args.headers_json,
            now: args.now,
            json: args.json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => inspect(args.into())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_inspect_parsing() {
        let cli = Cli::try_parse_from([
            "api-error",
            "inspect",
            "-s",
            "429",
            "-H",
            "retry-after: 12",
            "--header",
            "Retry-After: 13",
            "--now",
            "1700000000",
        ])
        .unwrap();

        let Commands::Inspect(args) = cli.command;
        assert_eq!(args.status, Some(429));
        assert_eq!(args.headers, vec!["retry-after: 12", "Retry-After: 13"]);
        assert_eq!(args.now, Some(1_700_000_000));
        assert!(!args.json);
    }

    #[test]
    fn test_cli_inspect_defaults() {
        let cli = Cli::try_parse_from(["api-error", "inspect"]).unwrap();
        let Commands::Inspect(args) = cli.command;
        assert_eq!(args.status, None);
        assert!(args.headers.is_empty());
        assert_eq!(args.headers_json, None);
    }

    #[test]
    fn test_cli_rejects_non_numeric_status() {
        let result = Cli::try_parse_from(["api-error", "inspect", "-s", "teapot"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        let result = Cli::try_parse_from(["api-error"]);
        assert!(result.is_err());
    }
}
