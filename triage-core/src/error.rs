use thiserror::Error;

use crate::client::FetchError;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] FetchError),
}
