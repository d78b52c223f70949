//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging bootstrap
//! - Player identity (who may start a shift)

/// Identity provider consulted before a shift may start
pub trait Identity {
    fn is_authenticated(&self) -> bool;
}

/// Signed-out visitor; cannot start a shift
#[derive(Debug, Clone, Copy, Default)]
pub struct Guest;

impl Identity for Guest {
    fn is_authenticated(&self) -> bool {
        false
    }
}

/// Signed-in player (stand-in for a real account backend)
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

impl Identity for Authenticated {
    fn is_authenticated(&self) -> bool {
        true
    }
}

/// Route `log` output to the browser console
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Route `log` output to stderr, filtered by `RUST_LOG` (info by default)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
