use anyhow::Result;

use hvscribe::config::Config;
use hvscribe::orchestrator::App;

#[tokio::main]
async fn main() -> Result<()> {
    hvscribe::logger::init();

    let config = Config::from_env()?;

    // Optional CLI argument: path to the input workbook
    let input_override = std::env::args().nth(1);

    App::initialize(config, input_override)?.run().await?;

    Ok(())
}
