use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Settings for the library's own diagnostics.
///
/// These are the `tracing` events this crate emits about itself (backend
/// fallback, logger construction). They are unrelated to the lines written
/// by a [`Facade`](crate::facade::Facade) and always go to stderr so they
/// never interleave with log output on stdout.
///
/// **Fields**
/// - `max_level`: most verbose diagnostic level that is printed.
/// - `ansi`: whether to colorize stderr output.
#[derive(Clone, Debug)]
pub struct DiagnosticsConfig {
    pub max_level: LevelFilter,
    pub ansi: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_level: LevelFilter::WARN,
            ansi: false,
        }
    }
}

/// Install a global `tracing` subscriber that prints diagnostics to stderr.
///
/// Fails if another global subscriber is already installed; the existing
/// one is kept in that case.
pub fn init_diagnostics_with_config(
    config: DiagnosticsConfig,
) -> Result<(), SetGlobalDefaultError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(true);
    let subscriber = Registry::default().with(config.max_level).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
}

/// Equivalent to [`init_diagnostics_with_config`] with
/// [`DiagnosticsConfig::default`].
pub fn init_diagnostics() -> Result<(), SetGlobalDefaultError> {
    init_diagnostics_with_config(DiagnosticsConfig::default())
}
