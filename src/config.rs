//! Construction-time settings of a [`Generator`](crate::Generator).

use anyhow::Context as _;
use default_struct_builder::DefaultBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// Default buffer capacity. Larger buffers generate faster, but throughput
/// stops improving noticeably somewhere below a thousand slots.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Worker threads are named `"<thread_name> <n>"`, `n` being a process-wide
/// counter.
pub const DEFAULT_THREAD_NAME: &str = "Generator Thread";

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, DefaultBuilder)]
#[serde(rename_all = "kebab-case", default)]
#[non_exhaustive]
pub struct GeneratorConfig {
    /// Maximum number of undelivered items the buffer holds before the
    /// worker blocks.
    pub capacity: usize,
    /// Prefix of the worker thread names, [`DEFAULT_THREAD_NAME`] if unset.
    #[builder(into)]
    pub thread_name: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thread_name: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from json, filling in defaults for missing keys.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("malformed generator config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(GeneratorError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn thread_name_or_default(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(DEFAULT_THREAD_NAME)
    }
}
