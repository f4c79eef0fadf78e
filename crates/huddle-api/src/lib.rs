pub mod config;
pub mod error;
pub mod providers;
pub mod router;
pub mod state;
pub mod token;
pub mod users;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use router::router;
pub use state::{AppState, AppStateInner};
