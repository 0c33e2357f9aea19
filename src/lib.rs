pub mod blobs;
pub mod config;
pub mod error;
pub mod external;
pub mod models;
pub mod pipeline;
pub mod prompts;

pub use error::{AirwatchError, Result};
pub use pipeline::{FinalResponse, Modality, Pipeline, Request, Stage};

// Load env from a simple, standardized location resolution:
// AIRWATCH_ENV_FILE when set, otherwise .env if present; missing files are
// silently ignored.
pub fn load_env() {
    if let Ok(env_path) = std::env::var("AIRWATCH_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::dotenv();
    }
}
