use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::carousel::CarouselTimings;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Base URL of the breed/image API.
    pub api_base_url: String,
    /// Hard cap on an upstream fetch before it is treated as failed.
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Duration,
    /// How many images one gallery view requests for a breed.
    pub image_count: usize,
    /// Carousel slide transition duration.
    #[serde(with = "humantime_serde")]
    pub transition: Duration,
    /// Settle delay at the strip boundary before a backward wrap lands.
    #[serde(with = "humantime_serde")]
    pub backward_settle: Duration,
    /// Delay between a search keystroke and the committed query update.
    #[serde(with = "humantime_serde")]
    pub search_debounce: Duration,
    /// Where the session search query is persisted; `None` falls back to the
    /// default location under the OS temp directory.
    pub search_store_path: Option<PathBuf>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.api_base_url.trim().is_empty(),
            "api-base-url must not be empty"
        );
        ensure!(self.image_count > 0, "image-count must be greater than zero");
        ensure!(
            !self.fetch_timeout.is_zero(),
            "fetch-timeout must be greater than zero"
        );
        ensure!(
            !self.transition.is_zero(),
            "transition must be greater than zero"
        );
        Ok(self)
    }

    pub fn carousel_timings(&self) -> CarouselTimings {
        CarouselTimings {
            transition: self.transition,
            backward_settle: self.backward_settle,
        }
    }

    fn default_api_base_url() -> String {
        "https://dog.ceo/api".to_string()
    }

    const fn default_fetch_timeout() -> Duration {
        Duration::from_secs(10)
    }

    const fn default_image_count() -> usize {
        50
    }

    const fn default_transition() -> Duration {
        Duration::from_millis(300)
    }

    const fn default_backward_settle() -> Duration {
        Duration::from_millis(10)
    }

    const fn default_search_debounce() -> Duration {
        Duration::ZERO
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            fetch_timeout: Self::default_fetch_timeout(),
            image_count: Self::default_image_count(),
            transition: Self::default_transition(),
            backward_settle: Self::default_backward_settle(),
            search_debounce: Self::default_search_debounce(),
            search_store_path: None,
        }
    }
}
