use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
///
/// Quiet by default so spinner and content output stay readable.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "edugen=debug" } else { "edugen=warn" }
}

/// Colour codes only when the log stream is a terminal.
fn ansi_for(stream: &impl IsTerminal) -> bool {
    stream.is_terminal()
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `--verbose`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi_for(&std::io::stderr()))
        .with_target(false)
        .init();
}
