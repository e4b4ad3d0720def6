use std::borrow::Cow;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// Another transaction committed a change to state that this transaction read, so this
    /// transaction can't be committed.  Retrying the whole transaction may succeed.
    #[error("Transaction conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Storage backend error: {0}")]
    Backend(Cow<'static, str>),
}

impl Error {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

pub fn error_backend<E: std::fmt::Display>(e: E) -> Error {
    Error::Backend(e.to_string().into())
}

pub fn error_conflict<E: std::fmt::Display>(e: E) -> Error {
    Error::Conflict(e.to_string().into())
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(database_error) = &err {
            // SQLITE_BUSY, SQLITE_BUSY_RECOVERY and SQLITE_BUSY_SNAPSHOT.
            if matches!(
                database_error.code().as_deref(),
                Some("5") | Some("261") | Some("517")
            ) {
                return Self::Conflict(err.to_string().into());
            }
        }
        Self::Backend(err.to_string().into())
    }
}
