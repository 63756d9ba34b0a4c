pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod region;
pub mod session;
pub mod source;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod viewport;

pub use error::{AppError, AppResult};

/// Entrypoint used by host integrations: initialises logging, loads the user
/// configuration, and returns a fresh annotation session.
pub fn new_session() -> session::Session {
    logging::init();
    let config = config::load_engine_config();
    tracing::info!("starting pixlabel session");
    session::Session::new(config)
}
