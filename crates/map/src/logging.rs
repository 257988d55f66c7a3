use std::panic::PanicHookInfo;
use std::sync::Once;

use tracing_subscriber::{
    filter::{FilterFn, LevelFilter},
    fmt::format::Format,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Install the process-wide subscriber and panic hook.
///
/// Only events from this workspace's crates are printed, to stderr. Later
/// calls are no-ops.
pub fn setup_logging(verbose: bool) {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        let filter = FilterFn::new(|metadata| is_own_module(metadata.module_path()));
        let layer = tracing_subscriber::fmt::layer()
            .event_format(Format::default().with_target(false).without_time())
            .with_writer(std::io::stderr);

        // Another subscriber may already be installed (embedding host, tests)
        if tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .with(level)
            .try_init()
            .is_ok()
        {
            std::panic::set_hook(Box::new(panic_hook));
        }
    })
}

fn is_own_module(module_path: Option<&str>) -> bool {
    let module = module_path.unwrap_or_default();
    module.starts_with("terezinha") || module.starts_with("stop_router")
}

fn panic_hook(info: &PanicHookInfo) {
    tracing::error!("{info}")
}
