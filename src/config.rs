use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LoadingTimings {
    /// How long the spinner may stay up after "next artwork" without new artwork arriving.
    #[serde(with = "humantime_serde")]
    pub fake_loading_timeout: Duration,
    /// Delay before the spinner appears, so fast loads never flash it.
    #[serde(with = "humantime_serde")]
    pub spinner_show_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub spinner_fade_in: Duration,
    #[serde(with = "humantime_serde")]
    pub spinner_fade_out: Duration,
}

impl Default for LoadingTimings {
    fn default() -> Self {
        Self {
            fake_loading_timeout: Duration::from_secs(10),
            spinner_show_delay: Duration::from_millis(700),
            spinner_fade_in: Duration::from_millis(300),
            spinner_fade_out: Duration::from_millis(1000),
        }
    }
}

impl LoadingTimings {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.fake_loading_timeout > Duration::ZERO,
            "loading.fake-loading-timeout must be positive"
        );
        ensure!(
            self.spinner_fade_in > Duration::ZERO,
            "loading.spinner-fade-in must be positive"
        );
        ensure!(
            self.spinner_fade_out > Duration::ZERO,
            "loading.spinner-fade-out must be positive"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Fake-loading and spinner timings.
    pub loading: LoadingTimings,
    /// Read EXIF orientation of newly loaded artwork off the UI thread.
    pub read_orientation: bool,
    /// Pan/zoom surface size used when the wallpaper size is not known.
    pub surface_size: Size,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            loading: LoadingTimings::default(),
            read_orientation: true,
            surface_size: Size::new(1080.0, 1920.0),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.loading
            .validate()
            .context("invalid loading configuration")?;
        let Size { width, height } = self.surface_size;
        ensure!(
            width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0,
            "surface-size must be finite and non-negative"
        );
        Ok(self)
    }
}
