use bigfile_explorer::{
    client,
    server::{self, ExplorerConfig},
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bigfile-explorer", author, version, about, long_about = Some("BigFile Explorer\n\n\
Dashboard and block explorer API for a BigFile node"))]
struct Cli {
    #[command(subcommand)]
    command: ExplorerCommand,
}

#[derive(Subcommand, Debug)]
enum ExplorerCommand {
    /// Server commands
    Server(server::ServerArgs),
    /// Client commands
    Client {
        #[command(subcommand)]
        args: client::ClientCli,
    },
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        ExplorerCommand::Client { args } => client::run(&args).await,
        ExplorerCommand::Server(args) => {
            server::init_tracing(&args)?;
            server::run(ExplorerConfig::from(&args)).await
        }
    }
}
