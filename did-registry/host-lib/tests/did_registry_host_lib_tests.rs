use did_registry_host_lib::{HostConfig, InvocationRequest};
use storage_traits::{LedgerContext, LedgerStorage, LedgerTransaction};

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}

async fn wait_until_host_is_up(client: &reqwest::Client, health_url: &str) {
    loop {
        tracing::info!("Checking if host is up via HTTP GET {}", health_url);
        if let Ok(response) = client.get(health_url).send().await {
            if response.status() == reqwest::StatusCode::OK {
                break;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}

async fn invoke(
    client: &reqwest::Client,
    invoke_url: &str,
    function: &str,
    args: &[&str],
) -> (reqwest::StatusCode, String) {
    let response = client
        .post(invoke_url)
        .json(&InvocationRequest {
            function: function.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        })
        .send()
        .await
        .expect("pass");
    let status = response.status();
    let body = response.text().await.expect("pass");
    (status, body)
}

#[tokio::test]
async fn test_host_invocations() {
    let host_config = HostConfig {
        listen_port: 9185,
        ledger_url: "memory://".to_string(),
        database_max_connections: 1,
        max_transaction_attempts: 3,
    };
    let host_handle = did_registry_host_lib::spawn_host(host_config.clone())
        .await
        .expect("pass");

    let client = reqwest::Client::new();
    let base_url = format!("http://localhost:{}", host_config.listen_port);
    wait_until_host_is_up(&client, format!("{}/health", base_url).as_str()).await;
    let invoke_url = format!("{}/invoke", base_url);
    let invoke_url = invoke_url.as_str();

    let (status, body) = invoke(
        &client,
        invoke_url,
        "CreateDID",
        &["did:x:1", "Alice", "cred-A"],
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::OK, "{}", body);
    assert!(body.is_empty());

    let (status, body) = invoke(&client, invoke_url, "GetDID", &["did:x:1"]).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).expect("pass"),
        serde_json::json!({
            "did": "did:x:1",
            "name": "Alice",
            "credentials": "cred-A",
            "verified": false,
        })
    );

    let (status, _) = invoke(&client, invoke_url, "VerifyDID", &["did:x:1"]).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    let (status, _) = invoke(
        &client,
        invoke_url,
        "UpdateCredentials",
        &["did:x:1", "cred-B"],
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::OK);
    let (_, body) = invoke(&client, invoke_url, "GetDID", &["did:x:1"]).await;
    let value = serde_json::from_str::<serde_json::Value>(&body).expect("pass");
    assert_eq!(value["credentials"], "cred-B");
    assert_eq!(value["verified"], true);

    let (status, body) = invoke(
        &client,
        invoke_url,
        "CreateDID",
        &["did:x:1", "Eve", "cred-C"],
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::CONFLICT);
    assert!(body.starts_with("AlreadyExists"), "{}", body);

    let (status, _) = invoke(&client, invoke_url, "RevokeDID", &["did:x:1"]).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    let (status, body) = invoke(&client, invoke_url, "GetDID", &["did:x:1"]).await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert!(body.starts_with("NotFound"), "{}", body);

    let (status, _) = invoke(&client, invoke_url, "GetDID", &[""]).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    let (status, _) = invoke(&client, invoke_url, "GetDID", &[]).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    let (status, _) = invoke(&client, invoke_url, "TransferDID", &["did:x:1"]).await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);

    tracing::info!("Shutting down host");
    host_handle.abort();
}

#[tokio::test]
async fn test_unsupported_ledger_url() {
    let host_config = HostConfig {
        listen_port: 9186,
        ledger_url: "postgres:///ledger".to_string(),
        database_max_connections: 1,
        max_transaction_attempts: 1,
    };
    assert!(did_registry_host_lib::spawn_host(host_config).await.is_err());
}

/// Ledger whose first `failing_commit_count` commits fail with a conflict, to exercise the host's
/// whole-transaction retry.
struct FlakyLedgerStorage {
    inner: did_registry_storage_mock::LedgerStorageMock,
    remaining_failures_a: std::sync::Arc<std::sync::atomic::AtomicU32>,
}

struct FlakyLedgerTransaction {
    inner_o: Option<Box<dyn storage_traits::LedgerTransaction>>,
    remaining_failures_a: std::sync::Arc<std::sync::atomic::AtomicU32>,
}

impl FlakyLedgerTransaction {
    fn inner_mut(&mut self) -> storage_traits::Result<&mut Box<dyn LedgerTransaction>> {
        self.inner_o
            .as_mut()
            .ok_or_else(|| storage_traits::error_backend("transaction already finished"))
    }
}

impl std::ops::Drop for FlakyLedgerTransaction {
    fn drop(&mut self) {}
}

#[async_trait::async_trait]
impl storage_traits::LedgerStorage for FlakyLedgerStorage {
    async fn begin_transaction(
        &self,
    ) -> storage_traits::Result<Box<dyn storage_traits::LedgerTransaction>> {
        Ok(Box::new(FlakyLedgerTransaction {
            inner_o: Some(self.inner.begin_transaction().await?),
            remaining_failures_a: self.remaining_failures_a.clone(),
        }))
    }
}

#[async_trait::async_trait]
impl storage_traits::LedgerContext for FlakyLedgerTransaction {
    async fn get_state(&mut self, key: &str) -> storage_traits::Result<Option<Vec<u8>>> {
        self.inner_mut()?.get_state(key).await
    }
    async fn put_state(&mut self, key: &str, value: &[u8]) -> storage_traits::Result<()> {
        self.inner_mut()?.put_state(key, value).await
    }
    async fn del_state(&mut self, key: &str) -> storage_traits::Result<()> {
        self.inner_mut()?.del_state(key).await
    }
}

#[async_trait::async_trait]
impl storage_traits::LedgerTransaction for FlakyLedgerTransaction {
    async fn commit(mut self: Box<Self>) -> storage_traits::Result<()> {
        use std::sync::atomic::Ordering;
        let failed = self
            .remaining_failures_a
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(storage_traits::error_conflict("injected commit conflict"));
        }
        match self.inner_o.take() {
            Some(inner) => inner.commit().await,
            None => Err(storage_traits::error_backend("transaction already finished")),
        }
    }
    async fn rollback(self: Box<Self>) -> storage_traits::Result<()> {
        Ok(())
    }
}

fn host_app_state_with_flaky_ledger(
    failing_commit_count: u32,
    max_transaction_attempts: u32,
) -> (did_registry_host_lib::HostAppState, did_registry_storage_mock::LedgerStorageMock) {
    let inner = did_registry_storage_mock::LedgerStorageMock::new();
    let host_app_state = did_registry_host_lib::HostAppState {
        ledger_storage_a: std::sync::Arc::new(FlakyLedgerStorage {
            inner: inner.clone(),
            remaining_failures_a: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(
                failing_commit_count,
            )),
        }),
        did_registry: did_registry::DIDRegistry::new(),
        host_config: HostConfig {
            listen_port: 0,
            ledger_url: "memory://".to_string(),
            database_max_connections: 1,
            max_transaction_attempts,
        },
    };
    (host_app_state, inner)
}

#[tokio::test]
async fn test_commit_conflicts_are_retried() {
    let (host_app_state, ledger) = host_app_state_with_flaky_ledger(2, 3);
    let invocation = did_registry::Invocation::CreateDID {
        did: "did:x:retry".to_string(),
        name: "Alice".to_string(),
        credentials: "cred-A".to_string(),
    };
    assert_eq!(host_app_state.invoke(&invocation).await.expect("pass"), None);
    assert!(ledger.snapshot().expect("pass").contains_key("did:x:retry"));
}

#[tokio::test]
async fn test_commit_conflicts_exhaust_attempts() {
    let (host_app_state, ledger) = host_app_state_with_flaky_ledger(3, 3);
    let invocation = did_registry::Invocation::CreateDID {
        did: "did:x:retry".to_string(),
        name: "Alice".to_string(),
        credentials: "cred-A".to_string(),
    };
    let err = host_app_state.invoke(&invocation).await.expect_err("pass");
    assert_eq!(err.kind(), did_registry::ErrorKind::StoreError);
    assert!(ledger.snapshot().expect("pass").is_empty());
}

#[tokio::test]
async fn test_get_did_does_not_commit() {
    // One injected commit conflict and a single attempt: any invocation that commits fails.
    let (host_app_state, ledger) = host_app_state_with_flaky_ledger(1, 1);
    {
        let mut transaction_b = ledger.begin_transaction().await.expect("pass");
        did_registry::DIDRegistry::new()
            .create_did(&mut *transaction_b, "did:x:1", "Alice", "cred-A")
            .await
            .expect("pass");
        transaction_b.commit().await.expect("pass");
    }

    let get_did = did_registry::Invocation::GetDID {
        did: "did:x:1".to_string(),
    };
    for _ in 0..2 {
        let did_record = host_app_state
            .invoke(&get_did)
            .await
            .expect("pass")
            .expect("pass");
        assert_eq!(did_record.credentials, "cred-A");
    }

    // The injected conflict is still pending, so the first committing invocation hits it.
    let verify_did = did_registry::Invocation::VerifyDID {
        did: "did:x:1".to_string(),
    };
    let err = host_app_state.invoke(&verify_did).await.expect_err("pass");
    assert_eq!(err.kind(), did_registry::ErrorKind::StoreError);
    assert_eq!(host_app_state.invoke(&verify_did).await.expect("pass"), None);
}
