//! Acquiring query handles.

use async_trait::async_trait;
use dataset_verify::QueryHandle;
use tokio_postgres::NoTls;
use tracing::{debug, error};

/// Turns a connection string into a live query handle.
///
/// Each [`compare`](crate::DbComparer::compare) call acquires one handle and
/// drops it when the call returns.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    type Handle: QueryHandle;

    /// Open a handle for `connection_string`.
    async fn connect(&self, connection_string: &str) -> anyhow::Result<Self::Handle>;
}

/// Connects to PostgreSQL with `tokio-postgres`, without TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresConnectionFactory;

#[async_trait]
impl ConnectionFactory for PostgresConnectionFactory {
    type Handle = tokio_postgres::Client;

    async fn connect(&self, connection_string: &str) -> anyhow::Result<Self::Handle> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // The connection task ends once the client is dropped.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {e}");
            }
        });

        debug!("Connected to PostgreSQL");
        Ok(client)
    }
}
