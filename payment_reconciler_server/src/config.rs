use std::env;

use log::*;
use opr_common::{helpers::env_flag, Secret};

const DEFAULT_OPR_HOST: &str = "127.0.0.1";
const DEFAULT_OPR_PORT: u16 = 8480;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// HMAC verification settings for the inbound notification webhook.
    pub hmac: HmacConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OPR_HOST.to_string(),
            port: DEFAULT_OPR_PORT,
            database_url: String::default(),
            hmac: HmacConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OPR_HOST").ok().unwrap_or_else(|| DEFAULT_OPR_HOST.into());
        let port = env::var("OPR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OPR_PORT. {e} Using the default, {DEFAULT_OPR_PORT}, instead."
                    );
                    DEFAULT_OPR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OPR_PORT);
        let database_url = env::var("OPR_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ OPR_DATABASE_URL is not set. Please set it to the URL for the order-state database.");
            String::default()
        });
        let hmac = HmacConfig::from_env_or_default();
        Self { host, port, database_url, hmac }
    }
}

//-------------------------------------------------  HmacConfig  ------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct HmacConfig {
    /// The shared secret the queue bridge signs webhook bodies with.
    pub secret: Secret<String>,
    /// When false, webhook signatures are not checked. Local development only.
    pub checks: bool,
}

impl HmacConfig {
    pub fn from_env_or_default() -> Self {
        let checks = env_flag("OPR_HMAC_CHECKS", true);
        let secret = env::var("OPR_HMAC_SECRET").ok().unwrap_or_else(|| {
            if checks {
                error!(
                    "🪛️ OPR_HMAC_SECRET is not set. Webhook calls will be rejected until it is configured."
                );
            }
            String::default()
        });
        if !checks {
            warn!("🚨️ HMAC checks on the notification webhook are disabled. Do not run production like this.");
        }
        Self { secret: Secret::new(secret), checks }
    }
}
