use std::{collections::HashMap, fs, time::Duration};

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            request_timeout_seconds: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings);

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) {
        if let Some(v) = file_cfg.get("server_url").and_then(|v| v.as_str()) {
            settings.server_url = v.to_string();
        }
        if let Some(v) = file_cfg
            .get("request_timeout_seconds")
            .and_then(|v| v.as_integer())
        {
            if v > 0 {
                settings.request_timeout_seconds = v as u64;
            }
        }
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(v) = std::env::var("ATM_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            if parsed > 0 {
                settings.request_timeout_seconds = parsed;
            }
        }
    }
}
