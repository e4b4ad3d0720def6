use anyhow::Context;
use did_registry_host_lib::{HostConfig, LogFormat};

/// DID registry host: serves CreateDID, UpdateCredentials, VerifyDID, RevokeDID and GetDID
/// invocations against a transactional ledger.
#[derive(clap::Parser)]
pub struct Root {
    #[command(flatten)]
    pub host_config: HostConfig,
    /// Specify the format of the logs.
    #[arg(
        name = "log-format",
        env = "DID_REGISTRY_HOST_LOG_FORMAT",
        long,
        value_name = "FORMAT",
        default_value = "compact",
        value_enum
    )]
    pub log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Ignore errors, since there may not be a .env file (e.g. in docker image)
    let _ = dotenvy::dotenv();

    use clap::Parser;
    let root = Root::parse();

    // It's necessary to specify EnvFilter::from_default_env in order to use RUST_LOG env var.
    let tracing_subscriber_fmt = tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    match root.log_format {
        LogFormat::Compact => tracing_subscriber_fmt.compact().init(),
        LogFormat::Pretty => tracing_subscriber_fmt.pretty().init(),
    }

    let host_join_handle = did_registry_host_lib::spawn_host(root.host_config)
        .await
        .context("Failed to start DID registry host")?;
    tracing::info!("DID registry host is serving invocations");
    host_join_handle.await?;

    Ok(())
}
