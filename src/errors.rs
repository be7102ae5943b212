use std::io;

use thiserror::Error;
use warp::reject;

/// Enumerates high-level errors returned by this service.
///
/// The `Display` form of each variant is the exact message surfaced to
/// clients in the `{"message"}` body.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents a request field that failed validation.
    #[error("{0}")]
    Validation(String),

    /// Represents a request with no authorization header.
    #[error("Token não encontrado")]
    TokenMissing,

    /// Represents an authorization header that is not 16 characters long.
    #[error("Token inválido")]
    TokenInvalid,

    /// Represents a reference to a talker that does not exist.
    #[error("Pessoa palestrante não encontrada")]
    TalkerNotFound,

    /// Represents a collection file that could not be read or written.
    #[error("Erro ao acessar os dados")]
    Storage { source: io::Error },

    /// Represents a collection file that does not hold a valid collection.
    #[error("Erro ao acessar os dados")]
    MalformedCollection { source: serde_json::Error },
}

impl reject::Reject for BackendError {}
