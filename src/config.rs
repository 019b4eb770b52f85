use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};
use rand::Rng;

pub const DEFAULT_FAILURE_RATE: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub session_key: Vec<u8>,
    pub simulated_latency: bool,
    pub secure_cookies: bool,
    pub session_ttl_hours: i64,
    /// Probability that a file analysis ends in `failed`.
    pub analysis_failure_rate: f64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        let session_key = match std::env::var("SESSION_KEY") {
            Ok(b64) => general_purpose::STANDARD
                .decode(b64.trim())
                .context("SESSION_KEY must be base64")?,
            Err(_) => {
                tracing::warn!("SESSION_KEY not set, generating an ephemeral key; sessions will not survive a restart");
                rand::thread_rng().gen::<[u8; 32]>().to_vec()
            }
        };
        if session_key.is_empty() {
            anyhow::bail!("SESSION_KEY must not be empty");
        }

        let simulated_latency = !matches!(
            std::env::var("SIMULATED_LATENCY").as_deref().map(str::trim),
            Ok("off") | Ok("false") | Ok("0")
        );

        let secure_cookies = flag("SECURE_COOKIES") || flag("PRODUCTION");

        let session_ttl_hours = match std::env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .context("SESSION_TTL_HOURS must be an integer")?,
            Err(_) => 24,
        };

        let analysis_failure_rate = match std::env::var("ANALYSIS_FAILURE_RATE") {
            Ok(raw) => {
                let rate = raw
                    .trim()
                    .parse::<f64>()
                    .context("ANALYSIS_FAILURE_RATE must be a number")?;
                if !(0.0..=1.0).contains(&rate) {
                    anyhow::bail!("ANALYSIS_FAILURE_RATE must be between 0 and 1");
                }
                rate
            }
            Err(_) => DEFAULT_FAILURE_RATE,
        };

        Ok(Self {
            bind_addr,
            session_key,
            simulated_latency,
            secure_cookies,
            session_ttl_hours,
            analysis_failure_rate,
        })
    }

    /// Settings for in-process tests: fixed key, no delays.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            session_key: b"test-session-key-test-session-key".to_vec(),
            simulated_latency: false,
            secure_cookies: false,
            session_ttl_hours: 24,
            analysis_failure_rate: DEFAULT_FAILURE_RATE,
        }
    }
}

fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
