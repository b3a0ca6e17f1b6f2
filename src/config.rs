use anyhow::{Context, Result, anyhow};
use chrono::{Duration, FixedOffset, NaiveTime};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::clock::AvailabilityGate;
use crate::utils::time::{parse_hhmm, parse_offset};

/// Upper bound for every `*_SECS` setting (one week).
const MAX_SECS: u64 = 7 * 24 * 3600;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub log_dir: String,

    // Clock rules
    pub utc_offset: FixedOffset,
    pub debounce: Duration,
    pub gate_open: NaiveTime,
    pub gate_close: NaiveTime,
    pub clock_timeout: std::time::Duration,

    // Rate limiting
    pub rate_clock_per_min: u32,

    // Background jobs
    pub backup_dir: PathBuf,
    pub backup_interval: std::time::Duration,
    pub backup_keep: usize,
    pub keepalive_url: Option<String>,
    pub keepalive_interval: std::time::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; every key has a default except
    /// `KEEPALIVE_URL`, whose absence disables the keep-alive job.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secs = |key: &str, default: &str| -> Result<u64> {
            let n: u64 = get(key, default)
                .parse()
                .with_context(|| format!("{key} must be a number of seconds"))?;
            if !(1..=MAX_SECS).contains(&n) {
                return Err(anyhow!("{key} must be between 1 and {MAX_SECS} seconds, got {n}"));
            }
            Ok(n)
        };
        let hhmm = |key: &str, default: &str| -> Result<NaiveTime> {
            let raw = get(key, default);
            parse_hhmm(&raw).ok_or_else(|| anyhow!("{key} must be HH:MM, got {raw:?}"))
        };

        let offset_raw = get("CLOCK_UTC_OFFSET", "+05:30");
        let utc_offset = parse_offset(&offset_raw)
            .ok_or_else(|| anyhow!("CLOCK_UTC_OFFSET must be ±HH:MM, got {offset_raw:?}"))?;

        let debounce_secs = secs("CLOCK_DEBOUNCE_SECS", "300")?;

        Ok(Self {
            server_addr: get("SERVER_ADDR", "127.0.0.1:8080"),
            database_url: get("DATABASE_URL", "sqlite://employees.db?mode=rwc"),
            log_dir: get("LOG_DIR", "logs"),

            utc_offset,
            debounce: Duration::seconds(debounce_secs as i64),
            gate_open: hhmm("GATE_OPEN", "10:00")?,
            gate_close: hhmm("GATE_CLOSE", "23:59")?,
            clock_timeout: std::time::Duration::from_secs(secs("CLOCK_TIMEOUT_SECS", "5")?),

            rate_clock_per_min: get("RATE_CLOCK_PER_MIN", "60")
                .parse()
                .context("RATE_CLOCK_PER_MIN must be a number")?,

            backup_dir: PathBuf::from(get("BACKUP_DIR", "backups")),
            backup_interval: std::time::Duration::from_secs(secs("BACKUP_INTERVAL_SECS", "3600")?),
            backup_keep: get("BACKUP_KEEP", "24")
                .parse()
                .context("BACKUP_KEEP must be a number")?,
            keepalive_url: lookup("KEEPALIVE_URL").filter(|url| !url.trim().is_empty()),
            keepalive_interval: std::time::Duration::from_secs(secs(
                "KEEPALIVE_INTERVAL_SECS",
                "600",
            )?),
        })
    }

    pub fn gate(&self) -> AvailabilityGate {
        AvailabilityGate::new(self.gate_open, self.gate_close, self.utc_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_cover_ist_business_hours() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.utc_offset, FixedOffset::east_opt(19_800).unwrap());
        assert_eq!(cfg.debounce, Duration::minutes(5));
        assert_eq!(cfg.gate().describe(), "10:00 to 23:59");
        assert_eq!(cfg.keepalive_url, None);
        assert_eq!(cfg.backup_keep, 24);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("CLOCK_UTC_OFFSET", "+01:00"),
            ("CLOCK_DEBOUNCE_SECS", "60"),
            ("GATE_OPEN", "08:30"),
            ("KEEPALIVE_URL", "https://example.org/health"),
        ])
        .unwrap();
        assert_eq!(cfg.utc_offset, FixedOffset::east_opt(3600).unwrap());
        assert_eq!(cfg.debounce, Duration::minutes(1));
        assert_eq!(cfg.gate().describe(), "08:30 to 23:59");
        assert_eq!(cfg.keepalive_url.as_deref(), Some("https://example.org/health"));
    }

    #[test]
    fn invalid_values_fail_startup() {
        assert!(config(&[("GATE_CLOSE", "midnight")]).is_err());
        assert!(config(&[("CLOCK_UTC_OFFSET", "Mars/Olympus")]).is_err());
        assert!(config(&[("CLOCK_DEBOUNCE_SECS", "-5")]).is_err());
        assert!(config(&[("CLOCK_DEBOUNCE_SECS", "9223372036854775807")]).is_err());
        assert!(config(&[("CLOCK_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("BACKUP_INTERVAL_SECS", "0")]).is_err());
        assert!(config(&[("KEEPALIVE_INTERVAL_SECS", "0")]).is_err());
    }

    #[tokio::test]
    async fn accepted_intervals_drive_tokio_timers() {
        let cfg = config(&[("BACKUP_INTERVAL_SECS", "1"), ("KEEPALIVE_INTERVAL_SECS", "1")])
            .unwrap();
        for every in [cfg.backup_interval, cfg.keepalive_interval] {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
        }
    }
}
