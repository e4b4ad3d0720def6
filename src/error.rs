use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Already exists: {0}")]
    AlreadyExists(Cow<'static, str>),
    #[error("Invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),
    #[error("Malformed: {0}")]
    Malformed(Cow<'static, str>),
    #[error("Not found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Record corruption detected: {0}")]
    RecordCorruption(Cow<'static, str>),
    #[error("Storage error: {context}; {source}")]
    StorageError {
        context: Cow<'static, str>,
        #[source]
        source: storage_traits::Error,
    },
}

impl Error {
    pub fn storage_error(
        context: impl Into<Cow<'static, str>>,
        source: storage_traits::Error,
    ) -> Self {
        Self::StorageError {
            context: context.into(),
            source,
        }
    }
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Malformed(_) | Self::RecordCorruption(_) => ErrorKind::CorruptRecord,
            Self::StorageError { .. } => ErrorKind::StoreError,
        }
    }
}

/// The caller-visible classification of an Error, as surfaced by a host to its clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
pub enum ErrorKind {
    StoreError,
    NotFound,
    AlreadyExists,
    CorruptRecord,
    InvalidArgument,
}

impl ErrorKind {
    /// Only store failures are worth retrying as a whole transaction; every other kind is a
    /// deterministic function of the ledger state and the arguments.
    pub fn is_retryable(self) -> bool {
        self == Self::StoreError
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StoreError => "StoreError",
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::CorruptRecord => "CorruptRecord",
            Self::InvalidArgument => "InvalidArgument",
        };
        f.write_str(s)
    }
}

pub(crate) fn error_already_exists<E: std::fmt::Display>(e: E) -> Error {
    Error::AlreadyExists(e.to_string().into())
}

pub(crate) fn error_invalid_argument<E: std::fmt::Display>(e: E) -> Error {
    Error::InvalidArgument(e.to_string().into())
}

pub(crate) fn error_malformed<E: std::fmt::Display>(e: E) -> Error {
    Error::Malformed(e.to_string().into())
}

pub(crate) fn error_not_found<E: std::fmt::Display>(e: E) -> Error {
    Error::NotFound(e.to_string().into())
}

pub(crate) fn error_record_corruption<E: std::fmt::Display>(e: E) -> Error {
    Error::RecordCorruption(e.to_string().into())
}
