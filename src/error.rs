use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source file not found: {0}")]
    MissingSource(String),

    /// The file exists but is not a table of records (e.g. a JSON scalar).
    /// This is a contract violation, not a lenient data error.
    #[error("source is not a table of records: {0}")]
    MalformedSource(String),

    #[error("unsupported source format: {0}")]
    UnknownFormat(String),

    #[cfg(feature = "xlsx")]
    #[error("spreadsheet error: {0}")]
    Workbook(String),

    #[cfg(feature = "gate")]
    #[error("team leader not registered: {0}")]
    UnknownLeader(String),

    #[cfg(feature = "gate")]
    #[error("invalid PIN")]
    InvalidPin,

    #[error("settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
