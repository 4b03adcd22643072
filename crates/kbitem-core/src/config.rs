//! Configuration for ordering, selection and output.
//!
//! Load order: `.kbitem/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KbItemConfig {
    pub order: OrderConfig,
    pub selection: SelectionConfig,
    pub output: OutputConfig,
}

/// Which ordered-sequence representation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStrategy {
    /// Flat vector, fully regrouped after every mutation.
    #[default]
    Rebuilding,
    /// Group order plus per-property lists, mutated in place.
    Incremental,
}

/// Which best-statement policy to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    PerProperty,
    Overall,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub strategy: OrderStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub policy: SelectionPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Error for an unrecognized enum name in an env var or CLI flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

macro_rules! named_variants {
    ($ty:ty, $kind:literal, { $($name:literal => $variant:path),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
                    $($name => Ok($variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($variant => $name,)+
                };
                f.write_str(name)
            }
        }
    };
}

named_variants!(OrderStrategy, "order strategy", {
    "rebuilding" => OrderStrategy::Rebuilding,
    "incremental" => OrderStrategy::Incremental,
});

named_variants!(SelectionPolicy, "selection policy", {
    "per_property" => SelectionPolicy::PerProperty,
    "overall" => SelectionPolicy::Overall,
});

named_variants!(OutputFormat, "output format", {
    "text" => OutputFormat::Text,
    "json" => OutputFormat::Json,
});

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(parsed) = v.parse()
    {
        *target = parsed;
    }
}

impl KbItemConfig {
    /// Load config from `.kbitem/config.toml` under `root`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(".kbitem").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("KBITEM_ORDER_STRATEGY", &mut config.order.strategy);
        env_override("KBITEM_SELECTION_POLICY", &mut config.selection.policy);
        env_override("KBITEM_OUTPUT_FORMAT", &mut config.output.format);

        tracing::debug!(
            strategy = %config.order.strategy,
            policy = %config.selection.policy,
            format = %config.output.format,
            "loaded configuration"
        );
        Ok(config)
    }
}
