//! # Tracing Setup
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the structured fields
//! (`order`, `table`, `handle`) carry the context instead.
//!
//! ```bash
//! # One line per stored order, poller start/stop and every notice
//! RUST_LOG=info cargo run
//!
//! # Add per-request store traffic and scan summaries
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info`, a kiosk order changing shows up as:
//!
//! ```text
//! INFO Monitor started handle=poller_1 interval=2s
//! INFO Inserted id=order_1 size=1
//! INFO Floating order updated order=order_1 label="Kiosk 7"
//! ```

/// Installs the global subscriber. Later calls are ignored, so tests may call it freely.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
