use crate::HostAppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use did_registry::{ErrorKind, Invocation};

/// The wire form of one invocation: an operation name and its positional string arguments.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct InvocationRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

pub fn get_routes(host_app_state: HostAppState) -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .with_state(host_app_state)
}

#[tracing::instrument(err(Debug), skip(host_app_state))]
async fn invoke(
    State(host_app_state): State<HostAppState>,
    Json(invocation_request): Json<InvocationRequest>,
) -> Result<String, (StatusCode, String)> {
    let invocation = Invocation::from_function_and_args(
        invocation_request.function.as_str(),
        invocation_request.args,
    )
    .map_err(error_response)?;
    let did_record_o = host_app_state
        .invoke(&invocation)
        .await
        .map_err(error_response)?;
    match did_record_o {
        Some(did_record) => serde_json::to_string(&did_record).map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to serialize DID record into JSON".to_string(),
            )
        }),
        None => Ok(String::new()),
    }
}

fn error_response(err: did_registry::Error) -> (StatusCode, String) {
    let status_code = match err.kind() {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::CorruptRecord => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::StoreError => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, format!("{}: {}", err.kind(), err))
}
