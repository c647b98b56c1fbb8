//! Shared pieces of the release-blogger binaries.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`args`] | `clap` definitions and conversion into configuration values |
//! | [`observability`] | Tracing subscriber and OTLP exporter wiring |
//! | [`signal`] | Ctrl-C / SIGTERM shutdown future |

pub mod args;
pub mod observability;
pub mod signal;
