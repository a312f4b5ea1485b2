use crate::report::{run_import, run_report, ImportArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rentwise::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rentwise",
    about = "Compare the true monthly cost of apartments you are considering",
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
    /// Print the ranking, category winners and neighborhood breakdown for a saved list
    Report(ReportArgs),
    /// Copy one unit of a saved listing reply into an apartment list
    Import(ImportArgs),
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
        Command::Report(args) => run_report(args),
        Command::Import(args) => run_import(args),
    }
}
