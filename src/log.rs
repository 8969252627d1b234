use tracing_subscriber::fmt::time;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. Later calls are no-ops, so an
/// embedding host that already set one up wins.
pub fn setup_tracing(verbose: bool) {
    // The protocol modules are the ones worth following; curve and codec
    // internals only get chatty when explicitly asked for.
    let directives = if verbose {
        "randbeacon::core=debug,randbeacon::transport=debug,randbeacon=info"
    } else {
        "randbeacon::core=info,randbeacon=warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_timer(time::time())
        .with_target(true)
        .try_init();
}
