// Logging setup: tracing events go to stderr so stdout only carries the
// conversation. The level comes from `-v` flags alone.

use tracing::Level;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Map the `-v` count to a level for this crate.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbosity: u8, ansi: bool) -> anyhow::Result<()> {
    let level = level_for(verbosity);
    // Our own events at the chosen level, dependencies held at warn.
    let filter = Targets::new()
        .with_target("perp_cli", level)
        .with_target("perp", level)
        .with_default(LevelFilter::WARN);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(3), Level::TRACE);
        assert_eq!(level_for(9), Level::TRACE);
    }

    #[test]
    fn second_init_fails() {
        // Whichever call comes first in this process may succeed; the
        // next one must not.
        let _ = init(0, false);
        assert!(init(0, false).is_err());
    }
}
