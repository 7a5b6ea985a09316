mod commands;
mod geodb;
mod output;
mod terminal;

use commands::CommandLine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();

    terminal::logging::init();

    commands::run::run(args).await
}
