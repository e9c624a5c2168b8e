//! Configuration management for SocialCmd

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, SocialCmdError};
use crate::platform::PlatformId;

/// Default backend location when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Poll period in humantime notation, e.g. "10s"
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
    /// Truncate the preview to the preview platform's limit
    #[serde(default = "default_sync_all")]
    pub sync_all: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// "local", "utc", or a fixed offset such as "+02:00"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_poll_interval() -> String {
    "10s".to_string()
}

fn default_platforms() -> Vec<String> {
    vec!["linkedin".to_string()]
}

fn default_sync_all() -> bool {
    true
}

fn default_timezone() -> String {
    "local".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platforms: default_platforms(),
            sync_all: default_sync_all(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults; `SOCIALCMD_API_URL` overrides the
    /// configured base URL either way.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SOCIALCMD_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }

    /// Check the fields that are only parsed lazily
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        self.poll_interval()?;
        self.default_platforms()?;
        self.schedule_zone()?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Result<Duration> {
        let interval = humantime::parse_duration(&self.queue.poll_interval).map_err(|e| {
            ConfigError::InvalidValue {
                field: "queue.poll_interval".to_string(),
                message: e.to_string(),
            }
        })?;
        if interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "queue.poll_interval".to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Platforms pre-selected on a fresh draft
    pub fn default_platforms(&self) -> Result<Vec<PlatformId>> {
        self.defaults
            .platforms
            .iter()
            .map(|p| {
                p.parse::<PlatformId>().map_err(|e| {
                    SocialCmdError::Config(ConfigError::InvalidValue {
                        field: "defaults.platforms".to_string(),
                        message: e.to_string(),
                    })
                })
            })
            .collect()
    }

    pub fn schedule_zone(&self) -> Result<ScheduleZone> {
        self.schedule.timezone.parse()
    }
}

/// Zone in which draft schedules are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleZone {
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl std::str::FromStr for ScheduleZone {
    type Err = SocialCmdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ScheduleZone::Local),
            "utc" | "z" => Ok(ScheduleZone::Utc),
            other => parse_offset(other).map(ScheduleZone::Fixed).ok_or_else(|| {
                SocialCmdError::Config(ConfigError::InvalidValue {
                    field: "schedule.timezone".to_string(),
                    message: format!("'{}' is not local, utc, or +HH:MM", s),
                })
            }),
        }
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours = offset_component(hours, 23)?;
    let minutes = offset_component(minutes, 59)?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// One or two ASCII digits no greater than `max`; signs are not allowed
fn offset_component(raw: &str, max: i32) -> Option<i32> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = raw.parse().ok()?;
    (value <= max).then_some(value)
}

impl ScheduleZone {
    /// Convert a wall-clock schedule to an absolute instant.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant;
    /// times that do not exist (DST spring-forward gap) are rejected.
    pub fn to_utc(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        match self {
            ScheduleZone::Local => resolve(&Local, naive),
            ScheduleZone::Utc => Ok(naive.and_utc()),
            ScheduleZone::Fixed(offset) => resolve(offset, naive),
        }
    }
}

fn resolve<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            SocialCmdError::InvalidInput(format!(
                "{} does not exist in the local time zone",
                naive.format("%Y-%m-%d %H:%M")
            ))
        })
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SOCIALCMD_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("socialcmd").join("config.toml"))
}

/// Resolve the data directory path following XDG Base Directory spec
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("socialcmd"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serial_test::serial;
    use std::io::Write;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval().unwrap(), Duration::from_secs(10));
        assert_eq!(config.default_platforms().unwrap(), vec![PlatformId::LinkedIn]);
        assert!(config.defaults.sync_all);
        assert_eq!(config.schedule_zone().unwrap(), ScheduleZone::Local);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://scheduler.example.com/api"
timeout_secs = 5

[queue]
poll_interval = "30s"

[defaults]
platforms = ["twitter", "threads"]
sync_all = false

[schedule]
timezone = "utc"
"#
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://scheduler.example.com/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.poll_interval().unwrap(), Duration::from_secs(30));
        assert_eq!(
            config.default_platforms().unwrap(),
            vec![PlatformId::Twitter, PlatformId::Threads]
        );
        assert!(!config.defaults.sync_all);
        assert_eq!(config.schedule_zone().unwrap(), ScheduleZone::Utc);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[queue]\npoll_interval = \"1m\"").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_poll_interval_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[queue]\npoll_interval = \"soon\"").unwrap();

        let err = Config::load_from_path(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("queue.poll_interval"));
    }

    #[test]
    fn test_unknown_default_platform_rejected() {
        let mut config = Config::default();
        config.defaults.platforms = vec!["myspace".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("SOCIALCMD_CONFIG", dir.path().join("missing.toml"));
        std::env::set_var("SOCIALCMD_API_URL", "http://10.0.0.5:9000");

        let config = Config::load().unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");

        std::env::remove_var("SOCIALCMD_API_URL");
        std::env::remove_var("SOCIALCMD_CONFIG");
    }

    #[test]
    fn test_schedule_zone_parse() {
        assert_eq!("UTC".parse::<ScheduleZone>().unwrap(), ScheduleZone::Utc);
        assert_eq!(
            "+02:00".parse::<ScheduleZone>().unwrap(),
            ScheduleZone::Fixed(FixedOffset::east_opt(7200).unwrap())
        );
        assert_eq!(
            "-05:30".parse::<ScheduleZone>().unwrap(),
            ScheduleZone::Fixed(FixedOffset::west_opt(5 * 3600 + 1800).unwrap())
        );
        assert!("Mars/Olympus".parse::<ScheduleZone>().is_err());
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        for raw in ["+99999999:00", "+24:00", "-12:60", "+1:999"] {
            let err = raw.parse::<ScheduleZone>().unwrap_err();
            assert!(
                matches!(err, SocialCmdError::Config(ConfigError::InvalidValue { .. })),
                "{} gave {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_signed_offset_components_rejected() {
        for raw in ["+01:-30", "-+01:00", "+01:+30", "+:30", "+01:"] {
            assert!(raw.parse::<ScheduleZone>().is_err(), "{} was accepted", raw);
        }
        assert_eq!(
            "+1:05".parse::<ScheduleZone>().unwrap(),
            ScheduleZone::Fixed(FixedOffset::east_opt(3600 + 300).unwrap())
        );
    }

    #[test]
    fn test_utc_zone_conversion() {
        let instant = ScheduleZone::Utc.to_utc(naive(2025, 1, 1, 10, 0)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_fixed_zone_conversion() {
        let zone: ScheduleZone = "+02:00".parse().unwrap();
        let instant = zone.to_utc(naive(2025, 1, 1, 10, 0)).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    }
}
