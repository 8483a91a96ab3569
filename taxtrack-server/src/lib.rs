pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::{build_state, open_state, serve};
pub use config::Config;
pub use state::AppState;
