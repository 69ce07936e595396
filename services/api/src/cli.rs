use crate::ranking::{run_matrix, run_rank, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use donor_match::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Donor Match",
    about = "Rank compatible blood donors and dispatch requests from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank donors from a CSV roster against a single blood request
    Rank(RankArgs),
    /// Print the donor-to-recipient compatibility matrix
    Matrix,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Donor roster CSV used to seed the in-memory directory
    #[arg(long)]
    pub(crate) donors: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Matrix => {
            run_matrix();
            Ok(())
        }
    }
}
