use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use url::Url;

const DEFAULT_CONTROL_SOCKET_PATH: &str = "/run/event-gallery/control.sock";

/// Connection settings for the ERPNext project source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrmConfig {
    /// Base URL of the ERPNext instance, without a trailing `/api`.
    pub base_url: String,
    /// Project fields requested from the list endpoint.
    pub fields: Vec<String>,
    /// Upper bound for the initial project load before falling back.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Resolve each project's image with a follow-up request.
    pub fetch_images: bool,
}

impl CrmConfig {
    fn default_fields() -> Vec<String> {
        ["name", "project_name", "expected_end_date", "status", "notes"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("crm.base-url '{}' is not a valid URL", self.base_url))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "crm.base-url must use http or https"
        );
        Ok(url)
    }

    fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        ensure!(
            !self.fields.is_empty(),
            "crm.fields must include at least one entry"
        );
        ensure!(
            self.request_timeout > Duration::ZERO,
            "crm.request-timeout must be positive"
        );
        Ok(())
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            fields: Self::default_fields(),
            request_timeout: Duration::from_secs(10),
            fetch_images: false,
        }
    }
}

/// Timing of the carousel engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CarouselConfig {
    /// Frames per second of the tick loop.
    pub frame_rate: u32,
    /// Pixels advanced per frame while autoscrolling.
    pub autoscroll_step_px: f64,
    /// Wait before seeding the scroll position so widths are measurable.
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,
    /// Eased centering after a click.
    #[serde(with = "humantime_serde")]
    pub center_duration: Duration,
    /// Eased centering after arrow keys or carousel buttons.
    #[serde(with = "humantime_serde")]
    pub step_duration: Duration,
    /// Delay between closing the overlay on inquire and scrolling to contact.
    #[serde(with = "humantime_serde")]
    pub contact_scroll_delay: Duration,
}

impl CarouselConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.frame_rate > 0,
            "carousel.frame-rate must be greater than zero"
        );
        ensure!(
            self.autoscroll_step_px.is_finite() && self.autoscroll_step_px > 0.0,
            "carousel.autoscroll-step-px must be a positive number"
        );
        ensure!(
            self.center_duration > Duration::ZERO,
            "carousel.center-duration must be positive"
        );
        ensure!(
            self.step_duration > Duration::ZERO,
            "carousel.step-duration must be positive"
        );
        Ok(())
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            autoscroll_step_px: 1.0,
            settle_delay: Duration::from_millis(100),
            center_duration: Duration::from_millis(600),
            step_duration: Duration::from_millis(500),
            contact_scroll_delay: Duration::from_millis(600),
        }
    }
}

/// Geometry of the headless surface the carousel is laid out on.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewportConfig {
    pub width: f64,
    /// Viewports narrower than this use the two-row mobile layout.
    pub mobile_breakpoint: f64,
}

impl ViewportConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.width.is_finite() && self.width >= 0.0,
            "viewport.width must be a non-negative number"
        );
        ensure!(
            self.mobile_breakpoint.is_finite() && self.mobile_breakpoint > 0.0,
            "viewport.mobile-breakpoint must be positive"
        );
        Ok(())
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1440.0,
            mobile_breakpoint: 768.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Where projects come from.
    pub crm: CrmConfig,
    /// Carousel timing.
    pub carousel: CarouselConfig,
    /// Headless viewport geometry.
    pub viewport: ViewportConfig,
    /// Unix domain socket accepting interaction commands.
    pub control_socket_path: PathBuf,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        self.crm.validate().context("invalid crm configuration")?;
        self.carousel
            .validate()
            .context("invalid carousel configuration")?;
        self.viewport
            .validate()
            .context("invalid viewport configuration")?;
        ensure!(
            !self.control_socket_path.as_os_str().is_empty(),
            "control-socket-path must not be empty"
        );
        ensure!(
            self.control_socket_path.file_name().is_some(),
            "control-socket-path must include a socket file name"
        );
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            crm: CrmConfig::default(),
            carousel: CarouselConfig::default(),
            viewport: ViewportConfig::default(),
            control_socket_path: PathBuf::from(DEFAULT_CONTROL_SOCKET_PATH),
        }
    }
}
