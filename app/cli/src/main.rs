use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use command::completion::Completion;
use command::generate::Generate;
use command::voices::Voices;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod command;
mod config;

#[derive(Parser)]
#[command(author, version)]
#[command(about = "batch text to speech")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
#[command(arg_required_else_help(true))]
pub enum Command {
    #[command(about = "generate one wav file per line of text")]
    Generate(Generate),
    #[command(about = "list known voices")]
    Voices(Voices),
    #[command(about = "generate shell completion")]
    Completion(Completion),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().compact().with_line_number(true).with_thread_ids(true))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(command) => command.execute().await,
        Command::Voices(command) => command.execute(),
        Command::Completion(command) => command.execute(),
    }
}
