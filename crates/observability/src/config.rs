use std::env;
use tracing::Level;
use url::Url;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct DiscordConfig {
    pub(crate) webhook_url: Url,
    pub(crate) min_level: Level,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) discord: Option<DiscordConfig>,
    /// Parse problems collected here and logged once tracing is up; the sink
    /// is optional, so misconfiguration must not abort startup.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();

        let service_name = non_empty_env("SERVICE_NAME").unwrap_or_else(|| component.clone());
        let environment = non_empty_env("STAGE").unwrap_or_else(|| "unknown".to_string());

        let mut warnings = Vec::new();
        let discord = discord_from_env(&mut warnings);

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            discord,
            warnings,
        }
    }
}

fn discord_from_env(warnings: &mut Vec<String>) -> Option<DiscordConfig> {
    let raw_url = non_empty_env("DISCORD_WEBHOOK_URL")?;

    let webhook_url = match Url::parse(&raw_url) {
        Ok(url) => url,
        Err(err) => {
            // Webhook URLs embed a secret; never echo the raw value.
            warnings.push(format!(
                "DISCORD_WEBHOOK_URL is set but unparseable, Discord notifications disabled ({err})"
            ));
            return None;
        }
    };

    let min_level = match non_empty_env("DISCORD_NOTIFY_LEVEL") {
        Some(raw) => match parse_level(&raw) {
            Some(level) => level,
            None => {
                warnings.push(format!(
                    "DISCORD_NOTIFY_LEVEL value {raw} not recognized, defaulting to ERROR"
                ));
                Level::ERROR
            }
        },
        None => Level::ERROR,
    };

    Some(DiscordConfig {
        webhook_url,
        min_level,
    })
}

fn parse_level(input: &str) -> Option<Level> {
    match input.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
