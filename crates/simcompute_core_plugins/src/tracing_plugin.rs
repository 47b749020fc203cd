//! Logging for simulations.
//!
//! Provides [`TracingPlugin`], which installs a `tracing` subscriber and
//! publishes the chosen settings as the [`TracingConfig`] global.
//!
//! # Lifecycle
//!
//! - **`build()`** inserts [`TracingConfig`] so other plugins can read the
//!   intended settings while they build.
//! - **`ready()`** installs the subscriber. If a global subscriber already
//!   exists it is left in place.
//!
//! # Example
//!
//! ```
//! use simcompute_core_plugins::{TracingConfig, TracingFormat, TracingPlugin};
//! use simcompute_system::simulation::Simulation;
//! use tracing::Level;
//!
//! let mut sim = Simulation::new();
//! sim.add_plugins(
//!     TracingPlugin::default()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact),
//! );
//! sim.finish();
//!
//! assert_eq!(sim.get_global::<TracingConfig>().unwrap().level, Level::DEBUG);
//! ```

use core::str::FromStr;

use simcompute_system::plugin::Plugin;
use simcompute_system::simulation::Simulation;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TracingFormat {
    /// Multi-line, colored; meant for a terminal.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// Newline-delimited JSON objects.
    Json,
}

/// An unrecognized [`TracingFormat`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tracing format '{0}': expected pretty, compact or json")]
pub struct UnknownFormat(pub String);

impl FromStr for TracingFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_owned())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Settings the subscriber was installed with.
///
/// Plugins can check `level` before doing work that only feeds debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level applied to simcompute targets.
    pub level: Level,
    /// Rendering of each event.
    pub format: TracingFormat,
    /// The directive string handed to [`EnvFilter`].
    pub filter: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Installs the process-wide `tracing` subscriber.
///
/// Without an explicit filter, simcompute crates log at the configured level
/// and everything else at `warn`. Per-model state changes are emitted on the
/// `simcompute::state` target, so `simcompute::state=off` silences them.
///
/// # Globals Provided
///
/// | Global | Description |
/// |--------|-------------|
/// | [`TracingConfig`] | Effective tracing settings |
///
/// ```
/// use simcompute_core_plugins::{TracingFormat, TracingPlugin};
/// use tracing::Level;
///
/// // Local runs
/// let dev = TracingPlugin::default()
///     .with_level(Level::DEBUG)
///     .with_span_events(true);
///
/// // Batch runs collected by a log pipeline
/// let batch = TracingPlugin::default()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("simcompute=info,simcompute::state=debug");
/// ```
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    level: Level,
    format: TracingFormat,
    directives: Option<String>,
    spans: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingPlugin {
    /// `info` for simcompute targets, pretty output, no span events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::default(),
            directives: None,
            spans: false,
        }
    }

    /// Level for simcompute targets when no explicit filter is given.
    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    /// Rendering of each event.
    #[must_use]
    pub fn with_format(self, format: TracingFormat) -> Self {
        Self { format, ..self }
    }

    /// Replaces the default filter with `target=level,...` directives.
    #[must_use]
    pub fn with_env_filter(self, directives: impl Into<String>) -> Self {
        Self {
            directives: Some(directives.into()),
            ..self
        }
    }

    /// Also log span enter and exit.
    #[must_use]
    pub fn with_span_events(self, spans: bool) -> Self {
        Self { spans, ..self }
    }

    /// The filter directives this plugin will install.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        match &self.directives {
            Some(directives) => directives.clone(),
            None => format!("warn,simcompute={}", self.level.as_str().to_ascii_lowercase()),
        }
    }

    /// The settings published as the [`TracingConfig`] global.
    #[must_use]
    pub fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level,
            format: self.format,
            filter: self.filter_directives(),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.filter_directives())
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.spans {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let layer = tracing_subscriber::fmt::layer().with_span_events(spans);
        match self.format {
            TracingFormat::Pretty => layer.pretty().boxed(),
            TracingFormat::Compact => layer.compact().boxed(),
            TracingFormat::Json => layer.json().boxed(),
        }
    }
}

impl Plugin for TracingPlugin {
    fn build(&self, sim: &mut Simulation) {
        sim.insert_global(self.config());
    }

    fn ready(&self, _sim: &mut Simulation) {
        // Fails when another subscriber was installed first.
        let installed = tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(self.env_filter())
            .try_init()
            .is_ok();

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            installed,
            "tracing ready"
        );
    }

    fn cleanup(&self, _sim: &mut Simulation) {
        tracing::info!("simulation shutting down");
    }
}
