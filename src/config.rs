//! Runtime configuration for the carousel.
//!
//! Everything is read from `VIDREEL_*` environment variables. Values that fail
//! to parse are logged and replaced with the default so a typo never stops the
//! widget from starting.

use std::path::PathBuf;
use std::str::FromStr;

use directories::ProjectDirs;
use thiserror::Error;

use crate::carousel::VisibilityPolicy;
use crate::models::DEFAULT_DUPLICATE_THRESHOLD;

/// Pixels advanced per frame while the pointer is outside the carousel.
pub const DEFAULT_SCROLL_SPEED: f64 = 0.5;
/// Fraction of an item that must be inside the viewport to count as visible.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.25;
pub const DEFAULT_ITEM_WIDTH: i32 = 320;
pub const DEFAULT_ITEM_HEIGHT: i32 = 180;

const ENV_SCROLL_SPEED: &str = "VIDREEL_SCROLL_SPEED";
const ENV_DUPLICATE_THRESHOLD: &str = "VIDREEL_DUPLICATE_THRESHOLD";
const ENV_VISIBILITY_THRESHOLD: &str = "VIDREEL_VISIBILITY_THRESHOLD";
const ENV_VISIBILITY_POLICY: &str = "VIDREEL_VISIBILITY_POLICY";
const ENV_PLAYLIST: &str = "VIDREEL_PLAYLIST";

const PLAYLIST_FILE_NAME: &str = "playlist.txt";
const STYLE_FILE_NAME: &str = "style.css";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}: expected a number, got {value:?}")]
    NotANumber { key: &'static str, value: String },
    #[error("{key}: {value} is out of range ({range})")]
    OutOfRange {
        key: &'static str,
        value: f64,
        range: &'static str,
    },
    #[error("unknown visibility policy {0:?} (expected \"sticky\" or \"live\")")]
    UnknownPolicy(String),
}

impl FromStr for VisibilityPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sticky" | "once" => Ok(Self::Sticky),
            "live" | "tracking" => Ok(Self::Live),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub scroll_speed: f64,
    pub duplicate_threshold: usize,
    pub visibility_threshold: f64,
    pub visibility_policy: VisibilityPolicy,
    pub item_width: i32,
    pub item_height: i32,
    /// Explicit playlist file; `None` means the per-user default location.
    pub playlist_path: Option<PathBuf>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            scroll_speed: DEFAULT_SCROLL_SPEED,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            visibility_policy: VisibilityPolicy::default(),
            item_width: DEFAULT_ITEM_WIDTH,
            item_height: DEFAULT_ITEM_HEIGHT,
            playlist_path: None,
        }
    }
}

impl CarouselConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Invalid values fall back
    /// to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let scroll_speed = read_value(&lookup, ENV_SCROLL_SPEED, parse_scroll_speed)
            .unwrap_or(defaults.scroll_speed);
        let duplicate_threshold =
            read_value(&lookup, ENV_DUPLICATE_THRESHOLD, parse_duplicate_threshold)
                .unwrap_or(defaults.duplicate_threshold);
        let visibility_threshold =
            read_value(&lookup, ENV_VISIBILITY_THRESHOLD, parse_visibility_threshold)
                .unwrap_or(defaults.visibility_threshold);
        let visibility_policy = read_value(&lookup, ENV_VISIBILITY_POLICY, |_, v| v.parse())
            .unwrap_or(defaults.visibility_policy);
        let playlist_path = lookup(ENV_PLAYLIST)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let config = Self {
            scroll_speed,
            duplicate_threshold,
            visibility_threshold,
            visibility_policy,
            playlist_path,
            ..defaults
        };
        tracing::debug!(?config, "Loaded carousel config");
        config
    }

    /// Playlist file to read when the host supplies no items.
    pub fn resolved_playlist_path(&self) -> Option<PathBuf> {
        self.playlist_path
            .clone()
            .or_else(|| config_dir().map(|dir| dir.join(PLAYLIST_FILE_NAME)))
    }

    /// Optional user stylesheet overriding the embedded one.
    pub fn style_path(&self) -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(STYLE_FILE_NAME))
    }
}

fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "vidreel").map(|dirs| dirs.config_dir().to_path_buf())
}

fn read_value<F, T, P>(lookup: &F, key: &'static str, parse: P) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&'static str, &str) -> Result<T, ConfigError>,
{
    let raw = lookup(key)?;
    match parse(key, raw.trim()) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring invalid config value");
            None
        }
    }
}

fn parse_f64(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::NotANumber {
            key,
            value: value.to_string(),
        })
}

fn parse_scroll_speed(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    let speed = parse_f64(key, value)?;
    if speed <= 0.0 {
        return Err(ConfigError::OutOfRange {
            key,
            value: speed,
            range: "> 0",
        });
    }
    Ok(speed)
}

fn parse_duplicate_threshold(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::NotANumber {
        key,
        value: value.to_string(),
    })
}

fn parse_visibility_threshold(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    let threshold = parse_f64(key, value)?;
    if threshold <= 0.0 || threshold > 1.0 {
        return Err(ConfigError::OutOfRange {
            key,
            value: threshold,
            range: "0 < t <= 1",
        });
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CarouselConfig::from_lookup(|_| None);
        assert_eq!(config, CarouselConfig::default());
        assert_eq!(config.scroll_speed, 0.5);
        assert_eq!(config.duplicate_threshold, 20);
        assert_eq!(config.visibility_threshold, 0.25);
        assert_eq!(config.visibility_policy, VisibilityPolicy::Sticky);
    }

    #[test]
    fn test_values_parsed() {
        let config = CarouselConfig::from_lookup(lookup_from(&[
            ("VIDREEL_SCROLL_SPEED", "1.5"),
            ("VIDREEL_DUPLICATE_THRESHOLD", " 10 "),
            ("VIDREEL_VISIBILITY_THRESHOLD", "0.5"),
            ("VIDREEL_VISIBILITY_POLICY", "LIVE"),
            ("VIDREEL_PLAYLIST", "/tmp/list.txt"),
        ]));
        assert_eq!(config.scroll_speed, 1.5);
        assert_eq!(config.duplicate_threshold, 10);
        assert_eq!(config.visibility_threshold, 0.5);
        assert_eq!(config.visibility_policy, VisibilityPolicy::Live);
        assert_eq!(config.playlist_path, Some(PathBuf::from("/tmp/list.txt")));
        assert_eq!(
            config.resolved_playlist_path(),
            Some(PathBuf::from("/tmp/list.txt"))
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = CarouselConfig::from_lookup(lookup_from(&[
            ("VIDREEL_SCROLL_SPEED", "-2"),
            ("VIDREEL_DUPLICATE_THRESHOLD", "many"),
            ("VIDREEL_VISIBILITY_THRESHOLD", "1.5"),
            ("VIDREEL_VISIBILITY_POLICY", "sometimes"),
            ("VIDREEL_PLAYLIST", "  "),
        ]));
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn test_policy_parse_errors() {
        assert_eq!("once".parse::<VisibilityPolicy>(), Ok(VisibilityPolicy::Sticky));
        assert_eq!(
            "never".parse::<VisibilityPolicy>(),
            Err(ConfigError::UnknownPolicy("never".to_string()))
        );
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(
            parse_scroll_speed("k", "NaN"),
            Err(ConfigError::NotANumber { .. })
        ));
    }
}
