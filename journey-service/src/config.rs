use journey_flow::{JourneySettings, PremiumBasis};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub journey: JourneySettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            journey: JourneySettings::default(),
        }
    }
}

impl ServiceConfig {
    /// Reads `PORT`, `OTP_DELAY_MS`, `LINK_SEND_DELAY_MS` and `PREMIUM_BASIS`.
    /// Unparseable values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| {
            Duration::from_millis(env_or(&lookup, key, fallback.as_millis() as u64))
        };

        Self {
            port: env_or(&lookup, "PORT", defaults.port),
            journey: JourneySettings {
                otp_delay: millis("OTP_DELAY_MS", defaults.journey.otp_delay),
                link_send_delay: millis("LINK_SEND_DELAY_MS", defaults.journey.link_send_delay),
                premium_basis: env_or(&lookup, "PREMIUM_BASIS", defaults.journey.premium_basis),
            },
        }
    }
}

fn env_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, fallback: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return fallback;
    };
    raw.trim().parse::<T>().unwrap_or_else(|_| {
        warn!(
            key,
            value = %raw,
            fallback = ?fallback,
            "Invalid configuration value, using default"
        );
        fallback
    })
}
