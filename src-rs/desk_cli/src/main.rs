mod cli;
mod render;
mod repl;

use clap::Parser;
use repair_desk_rs::RepairDesk;
use tracing::info;

use cli::Cli;
use repl::REPL;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.desk_config();
    info!(base = %config.base_url, "starting repair desk");
    let desk = RepairDesk::new(config)
        .map_err(|err| anyhow::anyhow!("failed to build API client: {}", err))?;

    if let (Some(user), Some(password)) = (&cli.user, &cli.password) {
        match desk.login(user, password) {
            Ok(user) => render::info(&format!("logged in as {} ({})", user.name, user.role)),
            Err(err) => render::error(&err.to_string()),
        }
    }

    let mut repl = REPL::new(desk);
    repl.run();
    Ok(())
}
