use crate::matching::{run_match, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use photo_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Child Photo Matcher",
    about = "Match child records to archived photos and publish the photo URL",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service receiving child record writes (default command)
    Serve(ServeArgs),
    /// Score a display name against candidate photos without writing anything
    Match(MatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["photo-match-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_match_arguments() {
        let cli = Cli::try_parse_from([
            "photo-match-api",
            "match",
            "--name",
            "Jane Doe",
            "--candidate",
            "janedoe.jpg",
            "--candidate",
            "al.jpg",
            "--threshold",
            "0.5",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Match(args)) => {
                assert_eq!(args.name, "Jane Doe");
                assert_eq!(args.candidates, vec!["janedoe.jpg", "al.jpg"]);
                assert_eq!(args.threshold.as_deref(), Some("0.5"));
            }
            other => panic!("expected match command, got {other:?}"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from(["photo-match-api", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
