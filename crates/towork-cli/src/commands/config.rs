use super::utils::{success, title};
use anyhow::{Context, Result, bail};
use towork_infrastructure::ConfigService;

pub fn show() -> Result<()> {
    let service = ConfigService::new();
    let config = service.get_config()?;
    title("Configuration");
    println!("  fichier            {}", service.config_path()?.display());
    println!("  api_url            {}", config.base_url());
    println!("  timeout            {} s", config.request_timeout_secs);
    println!("  rafraîchissement   {} s", config.poll_interval_secs);
    println!("  langue             {}", config.language);
    println!("  se souvenir        {}", config.remember_by_default);
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("L'URL doit commencer par http:// ou https://");
    }
    let service = ConfigService::new();
    let mut config = service.get_config()?;
    config.api_url = url.trim_end_matches('/').to_string();
    service
        .save_config(&config)
        .context("Failed to save the configuration")?;
    success(&format!("API : {}", config.api_url));
    Ok(())
}
