//! Profiling utilities based on the `puffin` crate.

use crate::config::ProfilingMode;
#[cfg(feature = "profiling")]
use std::sync::OnceLock;

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Address the puffin HTTP server listens on.
pub const PROFILING_SERVER_ADDR: &str = "0.0.0.0:8585";

#[cfg(feature = "profiling")]
static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Enable profiling scopes according to `mode`.
///
/// # Example
/// ```no_run
/// use htmlcard_core::config::ProfilingMode;
/// use htmlcard_core::profiling::init_profiling;
///
/// init_profiling(ProfilingMode::On);
/// ```
pub fn init_profiling(mode: ProfilingMode) {
    match mode {
        ProfilingMode::Off => puffin::set_scopes_on(false),
        ProfilingMode::On => puffin::set_scopes_on(true),
        ProfilingMode::WithWebServer => {
            puffin::set_scopes_on(true);
            start_server();
        }
    }
}

#[cfg(feature = "profiling")]
fn start_server() {
    if PROFILING_SERVER.get().is_some() {
        return;
    }
    match puffin_http::Server::new(PROFILING_SERVER_ADDR) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{}", PROFILING_SERVER_ADDR);
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

#[cfg(not(feature = "profiling"))]
fn start_server() {
    tracing::warn!("Built without the `profiling` feature; puffin server not started");
}

/// Mark a frame boundary, e.g. once per host update cycle.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
