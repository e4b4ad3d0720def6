use crate::{
    error_already_exists, error_invalid_argument, error_not_found, error_record_corruption,
    DIDRecord, Error, Result,
};
use storage_traits::LedgerContext;

/// The DID lifecycle contract.  Every operation runs inside the caller's transactional context,
/// touches only the key equal to its DID argument, and issues at most one mutation.  Retrying
/// and committing are the caller's business.
#[derive(Clone, Copy, Debug, Default)]
pub struct DIDRegistry;

impl DIDRegistry {
    pub fn new() -> Self {
        Self
    }
    /// Create an unverified record for did.  Fails with AlreadyExists if did has a live record.
    pub async fn create_did<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        did: &str,
        name: &str,
        credentials: &str,
    ) -> Result<()> {
        validate_did_argument(did)?;
        if read_record_bytes(ctx, did).await?.is_some() {
            return Err(error_already_exists(did));
        }
        let did_record =
            DIDRecord::new_unverified(did.to_string(), name.to_string(), credentials.to_string());
        write_record(ctx, &did_record).await?;
        tracing::debug!("created DID {:?}", did);
        Ok(())
    }
    /// Replace the credentials of an existing record, leaving everything else (including the
    /// verified flag) unchanged.  Always writes, even if the credentials are unchanged, so that
    /// every successful call leaves an entry in the ledger's history.
    pub async fn update_credentials<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        did: &str,
        new_credentials: &str,
    ) -> Result<()> {
        validate_did_argument(did)?;
        let mut did_record = read_existing_record(ctx, did).await?;
        did_record.credentials = new_credentials.to_string();
        write_record(ctx, &did_record).await?;
        tracing::debug!("updated credentials of DID {:?}", did);
        Ok(())
    }
    /// Mark an existing record as verified.  Idempotent; an already-verified record is rewritten
    /// with the same payload.
    pub async fn verify_did<C: LedgerContext + ?Sized>(&self, ctx: &mut C, did: &str) -> Result<()> {
        validate_did_argument(did)?;
        let mut did_record = read_existing_record(ctx, did).await?;
        did_record.verified = true;
        write_record(ctx, &did_record).await?;
        tracing::debug!("verified DID {:?}", did);
        Ok(())
    }
    /// Delete an existing record.  The did may be created again afterward.
    pub async fn revoke_did<C: LedgerContext + ?Sized>(&self, ctx: &mut C, did: &str) -> Result<()> {
        validate_did_argument(did)?;
        if read_record_bytes(ctx, did).await?.is_none() {
            return Err(error_not_found(did));
        }
        ctx.del_state(did)
            .await
            .map_err(|err| Error::storage_error(format!("failed to delete DID {}", did), err))?;
        tracing::debug!("revoked DID {:?}", did);
        Ok(())
    }
    /// Read an existing record.  Never writes.
    pub async fn get_did<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        did: &str,
    ) -> Result<DIDRecord> {
        validate_did_argument(did)?;
        read_existing_record(ctx, did).await
    }
}

/// Empty DIDs are rejected before touching the store; otherwise a DID is opaque.
pub(crate) fn validate_did_argument(did: &str) -> Result<()> {
    if did.is_empty() {
        return Err(error_invalid_argument("DID must not be empty"));
    }
    Ok(())
}

/// A zero-length value is indistinguishable from absence.
async fn read_record_bytes<C: LedgerContext + ?Sized>(
    ctx: &mut C,
    did: &str,
) -> Result<Option<Vec<u8>>> {
    let value_o = ctx
        .get_state(did)
        .await
        .map_err(|err| Error::storage_error(format!("failed to read DID {}", did), err))?;
    Ok(value_o.filter(|value| !value.is_empty()))
}

async fn read_existing_record<C: LedgerContext + ?Sized>(
    ctx: &mut C,
    did: &str,
) -> Result<DIDRecord> {
    let value = read_record_bytes(ctx, did)
        .await?
        .ok_or_else(|| error_not_found(did))?;
    let did_record = DIDRecord::decode(&value).map_err(|err| {
        tracing::error!("stored record for DID {:?} failed to decode: {}", did, err);
        error_record_corruption(format!("DID {}: {}", did, err))
    })?;
    did_record.validate_stored_under(did)?;
    Ok(did_record)
}

async fn write_record<C: LedgerContext + ?Sized>(
    ctx: &mut C,
    did_record: &DIDRecord,
) -> Result<()> {
    ctx.put_state(did_record.did.as_str(), &did_record.encode())
        .await
        .map_err(|err| {
            Error::storage_error(format!("failed to write DID {}", did_record.did), err)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_did_argument() {
        assert!(matches!(
            validate_did_argument(""),
            Err(crate::Error::InvalidArgument(_))
        ));
        // Anything non-empty is accepted as-is.
        validate_did_argument("did:x:1").expect("pass");
        validate_did_argument(" ").expect("pass");
        validate_did_argument("not a did at all {\"\\}").expect("pass");
    }
}
