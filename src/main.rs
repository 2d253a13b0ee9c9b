use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ratjot::{app::App, config::Config};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::from_env();
    init_logging(&config)?;

    info!(api_url = %config.api_url, "starting");
    let mut app = App::new(&config.api_url);
    ratatui::run(|t| app.run(t))?;

    Ok(())
}

/// Logs go to a file, the terminal belongs to the UI.
fn init_logging(config: &Config) -> color_eyre::Result<()> {
    if let Some(dir) = config.log_path.parent() {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .wrap_err_with(|| format!("opening log file {}", config.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
