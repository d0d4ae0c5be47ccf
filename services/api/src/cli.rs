use crate::demo::{run_allocate, run_demo, run_project, AllocateArgs, DemoArgs, ProjectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use savings_planner::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Savings Planner",
    about = "Project savings goals against a recurring budget and split lump sums across them",
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
    /// Project a goal export against a recurring savings amount
    Project(ProjectArgs),
    /// Split a one-time amount across a goal export
    Allocate(AllocateArgs),
    /// Run an end-to-end demo against a built-in goal set
    Demo(DemoArgs),
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
        Command::Project(args) => run_project(args),
        Command::Allocate(args) => run_allocate(args),
        Command::Demo(args) => run_demo(args),
    }
}
