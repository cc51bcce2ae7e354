use std::path::PathBuf;
use std::process::ExitCode;

use decolagem_app::config::{AppConfig, DEFAULT_CONFIG_PATH};
use decolagem_app::runner;

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let (config, config_error) = AppConfig::load(&path);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    match config_error {
        Some(err) if err.is_missing() => {
            log::info!("no config at {}, using defaults", path.display());
        }
        Some(err) => log::warn!("{err}; using defaults"),
        None => log::info!("config loaded from {}", path.display()),
    }

    match runner::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
