use anyhow::Result;

use quadbook::{AppConfig, run};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(AppConfig::default())
}
