use crate::{error_invalid_argument, DIDRecord, DIDRegistry, Result};
use storage_traits::LedgerContext;

/// One call of a DID registry operation, as named by a host dispatcher.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invocation {
    CreateDID {
        did: String,
        name: String,
        credentials: String,
    },
    UpdateCredentials {
        did: String,
        new_credentials: String,
    },
    VerifyDID {
        did: String,
    },
    RevokeDID {
        did: String,
    },
    GetDID {
        did: String,
    },
}

impl Invocation {
    /// Build an Invocation from an operation name and its positional string arguments.
    pub fn from_function_and_args(function: &str, args: Vec<String>) -> Result<Self> {
        let invocation = match (function, args.as_slice()) {
            ("CreateDID", [did, name, credentials]) => Self::CreateDID {
                did: did.clone(),
                name: name.clone(),
                credentials: credentials.clone(),
            },
            ("UpdateCredentials", [did, new_credentials]) => Self::UpdateCredentials {
                did: did.clone(),
                new_credentials: new_credentials.clone(),
            },
            ("VerifyDID", [did]) => Self::VerifyDID { did: did.clone() },
            ("RevokeDID", [did]) => Self::RevokeDID { did: did.clone() },
            ("GetDID", [did]) => Self::GetDID { did: did.clone() },
            ("CreateDID", _) => return Err(error_wrong_arg_count(function, 3, args.len())),
            ("UpdateCredentials", _) => {
                return Err(error_wrong_arg_count(function, 2, args.len()))
            }
            ("VerifyDID" | "RevokeDID" | "GetDID", _) => {
                return Err(error_wrong_arg_count(function, 1, args.len()))
            }
            _ => {
                return Err(error_invalid_argument(format!(
                    "unknown function {:?}",
                    function
                )))
            }
        };
        Ok(invocation)
    }
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::CreateDID { .. } => "CreateDID",
            Self::UpdateCredentials { .. } => "UpdateCredentials",
            Self::VerifyDID { .. } => "VerifyDID",
            Self::RevokeDID { .. } => "RevokeDID",
            Self::GetDID { .. } => "GetDID",
        }
    }
    /// The DID (and therefore the only ledger key) this invocation touches.
    pub fn did(&self) -> &str {
        match self {
            Self::CreateDID { did, .. }
            | Self::UpdateCredentials { did, .. }
            | Self::VerifyDID { did }
            | Self::RevokeDID { did }
            | Self::GetDID { did } => did.as_str(),
        }
    }
    /// True if the invocation never writes, so its transaction need not commit.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::GetDID { .. })
    }
}

impl DIDRegistry {
    /// Run the invocation against ctx.  Returns the record for GetDID and None otherwise.
    pub async fn invoke<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        invocation: &Invocation,
    ) -> Result<Option<DIDRecord>> {
        tracing::trace!(
            "invoking {} on DID {:?}",
            invocation.function_name(),
            invocation.did()
        );
        match invocation {
            Invocation::CreateDID {
                did,
                name,
                credentials,
            } => self.create_did(ctx, did, name, credentials).await?,
            Invocation::UpdateCredentials {
                did,
                new_credentials,
            } => self.update_credentials(ctx, did, new_credentials).await?,
            Invocation::VerifyDID { did } => self.verify_did(ctx, did).await?,
            Invocation::RevokeDID { did } => self.revoke_did(ctx, did).await?,
            Invocation::GetDID { did } => return Ok(Some(self.get_did(ctx, did).await?)),
        }
        Ok(None)
    }
}

fn error_wrong_arg_count(function: &str, expected: usize, actual: usize) -> crate::Error {
    error_invalid_argument(format!(
        "{} expects {} argument(s) but got {}",
        function, expected, actual
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_function_and_args() {
        assert_eq!(
            Invocation::from_function_and_args(
                "CreateDID",
                vec!["did:x:1".into(), "Alice".into(), "cred-A".into()]
            )
            .expect("pass"),
            Invocation::CreateDID {
                did: "did:x:1".into(),
                name: "Alice".into(),
                credentials: "cred-A".into(),
            }
        );
        assert_eq!(
            Invocation::from_function_and_args(
                "UpdateCredentials",
                vec!["did:x:1".into(), "cred-B".into()]
            )
            .expect("pass"),
            Invocation::UpdateCredentials {
                did: "did:x:1".into(),
                new_credentials: "cred-B".into(),
            }
        );
        for function in ["VerifyDID", "RevokeDID", "GetDID"] {
            let invocation = Invocation::from_function_and_args(function, vec!["did:x:1".into()])
                .expect("pass");
            assert_eq!(invocation.function_name(), function);
            assert_eq!(invocation.did(), "did:x:1");
            assert_eq!(invocation.is_read_only(), function == "GetDID");
        }
    }

    #[test]
    fn test_from_function_and_args_rejects_bad_calls() {
        assert!(matches!(
            Invocation::from_function_and_args("DeleteEverything", vec![]),
            Err(crate::Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Invocation::from_function_and_args("CreateDID", vec!["did:x:1".into()]),
            Err(crate::Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Invocation::from_function_and_args(
                "GetDID",
                vec!["did:x:1".into(), "did:x:2".into()]
            ),
            Err(crate::Error::InvalidArgument(_))
        ));
    }
}
