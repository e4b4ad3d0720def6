use crate::{error_malformed, error_record_corruption, Result};

/// The ledger value stored under a DID's key.  The on-ledger form is the JCS serialization of
/// this struct, with field names `did`, `name`, `credentials` and `verified`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DIDRecord {
    /// Opaque identifier; also the key under which this record is stored.
    pub did: String,
    /// Display name, possibly empty.
    pub name: String,
    /// Opaque credentials blob.
    pub credentials: String,
    /// Set by verify; stays set until the record is revoked.
    pub verified: bool,
}

impl DIDRecord {
    /// A freshly created record is always unverified.
    pub fn new_unverified(did: String, name: String, credentials: String) -> Self {
        Self {
            did,
            name,
            credentials,
            verified: false,
        }
    }
    /// Produce the canonical (JCS) byte representation.  Equal records always encode to equal bytes.
    pub fn encode(&self) -> Vec<u8> {
        serde_json_canonicalizer::to_string(self)
            .expect("programmer error: a DIDRecord always serializes")
            .into_bytes()
    }
    /// Parse bytes produced by encode.  Unknown fields are ignored; a missing field is an error.
    /// Field order is not enforced, so records written in a non-canonical order still decode.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(error_malformed)
    }
    /// This is rather pedantic, but a record whose did doesn't match the key it was read from
    /// means the ledger has been written by something other than this contract.
    pub fn validate_stored_under(&self, key: &str) -> Result<()> {
        if self.did != key {
            return Err(error_record_corruption(format!(
                "record stored under key {:?} has did {:?}",
                key, self.did
            )));
        }
        Ok(())
    }
}
