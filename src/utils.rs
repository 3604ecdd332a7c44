use std::time::{Duration, Instant};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Runs `f` and returns its output with the wall-clock time it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Installs a global `fmt` subscriber writing to stderr.
///
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn try_init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_returns_output() {
        let (sum, elapsed) = timed(|| (1..=100).sum::<u32>());
        assert_eq!(sum, 5050);
        assert!(elapsed < Duration::from_secs(5));
    }
}
