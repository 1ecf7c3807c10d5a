use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// `RUST_LOG` wins when set; otherwise `verbose` switches this crate between debug and off.
fn filters(verbose: bool, env_filter: Option<EnvFilter>) -> (Option<Targets>, Option<EnvFilter>) {
    match env_filter {
        Some(env_filter) => (None, Some(env_filter)),
        None => {
            let level_filter = if verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::OFF
            };
            (Some(Targets::new().with_target("fxpulse", level_filter)), None)
        }
    }
}

/// Installs the global subscriber writing to stderr.
pub fn init_logging(verbose: bool) {
    let (app_filter, env_filter) = filters(verbose, EnvFilter::try_from_default_env().ok());

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .init();
}
