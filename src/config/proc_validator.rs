//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks provider identity fields, timeout, server bind and metrics path

use tracing::{error, info};

use crate::config::service::{ProviderConfig, ServiceConfig};
use crate::config::settings::SettingsConfig;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_provider(&cfg.provider, &mut errors);

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.trim().parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }
    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
}

fn validate_provider(provider: &ProviderConfig, errors: &mut Vec<String>) {
    let required = [
        ("provider.auth_server_url", &provider.auth_server_url),
        ("provider.realm", &provider.realm),
        ("provider.client_id", &provider.client_id),
        ("provider.client_secret", &provider.client_secret),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("{} must not be empty", name));
        }
    }

    if !provider.auth_server_url.is_empty()
        && !(provider.auth_server_url.starts_with("http://")
            || provider.auth_server_url.starts_with("https://"))
    {
        errors.push(format!(
            "provider.auth_server_url '{}' must start with http:// or https://",
            provider.auth_server_url
        ));
    }

    if provider.timeout_ms == 0 {
        errors.push("provider.timeout_ms must be greater than 0".to_string());
    }
}
