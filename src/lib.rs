mod did_record;
mod did_registry;
mod error;
mod invocation;

pub(crate) use crate::{
    did_registry::validate_did_argument,
    error::{
        error_already_exists, error_invalid_argument, error_malformed, error_not_found,
        error_record_corruption,
    },
};
pub use crate::{
    did_record::DIDRecord, did_registry::DIDRegistry, error::Error, error::ErrorKind,
    invocation::Invocation,
};
pub type Result<T> = std::result::Result<T, Error>;
