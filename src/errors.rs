use thiserror::Error;

/// Recoverable failures of the price-base operations. Every variant is
/// surfaced to the user as a status message; none ends the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceBaseError {
    #[error("Formato inválido: {0}")]
    Format(String),

    #[error("Valores inválidos: {0}")]
    Validation(String),

    #[error("{code} ya existe en la base")]
    Duplicate { code: String },

    #[error("{code} no se encontró en la base")]
    NotFound { code: String },

    #[error("No se pudo exportar: {0}")]
    Export(String),

    #[error("Configuración inválida: {0}")]
    Config(String),
}

impl PriceBaseError {
    /// Wraps an infrastructure failure (calamine, csv, I/O) as a format error,
    /// keeping the whole context chain in the message.
    pub fn format(err: anyhow::Error) -> Self {
        PriceBaseError::Format(format!("{err:#}"))
    }

    pub fn export(err: anyhow::Error) -> Self {
        PriceBaseError::Export(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, PriceBaseError>;
