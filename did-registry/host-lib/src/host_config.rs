#[derive(clap::Args, Clone, Debug)]
pub struct HostConfig {
    /// Specify the port on which the host will listen for HTTP invocations.
    #[arg(
        name = "listen-port",
        env = "DID_REGISTRY_HOST_LISTEN_PORT",
        long,
        value_name = "PORT",
        default_value = "80"
    )]
    pub listen_port: u16,
    /// Specify the ledger backend.  "memory://" keeps the ledger in process memory (lost on exit).
    /// "sqlite://name.db?mode=rwc" (read+write, create if it doesn't yet exist) uses a SQLite database,
    /// and requires the `sqlite` cargo feature.
    #[arg(
        name = "ledger-url",
        env = "DID_REGISTRY_HOST_LEDGER_URL",
        long,
        value_name = "URL",
        default_value = "memory://"
    )]
    pub ledger_url: String,
    /// Specify the maximum number of connections to the database.  Ignored for "memory://".
    #[arg(
        name = "database-max-connections",
        env = "DID_REGISTRY_HOST_DATABASE_MAX_CONNECTIONS",
        long,
        value_name = "CONNECTIONS",
        default_value = "10"
    )]
    pub database_max_connections: u32,
    /// Specify how many times an invocation's transaction is attempted before a store error is
    /// reported to the client.  Values below 1 are treated as 1.
    #[arg(
        name = "max-transaction-attempts",
        env = "DID_REGISTRY_HOST_MAX_TRANSACTION_ATTEMPTS",
        long,
        value_name = "ATTEMPTS",
        default_value = "3"
    )]
    pub max_transaction_attempts: u32,
}
