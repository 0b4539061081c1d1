use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config;
use crate::portfolio::Portfolio;
use crate::ui;
use crate::video::{ExternalPlayer, MediaLauncher};

pub fn run() -> Result<()> {
    let cfg = config::load(config::LoadOptions::default()).context("load config")?;
    let config_path = config::default_path();
    let display_path = friendly_path(config_path.as_ref());

    let (portfolio, status) = match cfg.portfolio.content_file.as_ref() {
        Some(path) => match Portfolio::load(path) {
            Ok(portfolio) => (
                portfolio,
                format!("Loaded portfolio from {}.", path.display()),
            ),
            Err(err) => (
                Portfolio::sample(),
                format!("Could not load {} ({err:#}); showing the sample portfolio.", path.display()),
            ),
        },
        None => (
            Portfolio::sample(),
            format!(
                "Showing the sample portfolio. Point portfolio.content_file in {} at your own.",
                display_path
            ),
        ),
    };

    let launcher: Arc<dyn MediaLauncher> = Arc::new(ExternalPlayer::new(
        cfg.player.mpv_path.clone(),
        cfg.player.fullscreen,
    ));

    let options = ui::Options {
        status_message: status,
        portfolio,
        launcher: Some(launcher),
        form: cfg.form.clone(),
        config_path: display_path,
        content_file: cfg.portfolio.content_file.clone(),
    };

    let mut model = ui::Model::new(options);
    model.run()
}

fn friendly_path(path: Option<&std::path::PathBuf>) -> String {
    if let Some(path) = path {
        if let Some(home) = dirs::home_dir() {
            if let Ok(stripped) = path.strip_prefix(&home) {
                let mut display = String::from("~");
                if !stripped.as_os_str().is_empty() {
                    display.push_str(&format!("/{}", stripped.display()));
                }
                return display;
            }
        }
        path.display().to_string()
    } else {
        "~/.config/folio-tui/config.yaml".to_string()
    }
}
