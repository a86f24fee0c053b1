use std::fs;

use anyhow::Context;
use tracing::info;

use stockwatch_cli::{Config, DEMO_SCRIPT, Session, parse_script};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?.with_args(std::env::args().skip(1));
    stockwatch_observability::init(config.log_format);

    let source = match &config.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            info!("No script configured; running built-in demo");
            DEMO_SCRIPT.to_string()
        }
    };
    let lines = parse_script(&source).context("failed to parse script")?;

    let mut session = Session::new();
    let outcomes = session.run(&lines);
    info!(commands = outcomes.len(), "Script finished");

    let summary = serde_json::to_string(&session.finish()).context("failed to encode summary")?;
    info!(summary = %summary, "Final inventory");

    Ok(())
}
