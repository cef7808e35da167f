//! Connection setup for MongoDB
//!
//! Deliberately thin: parse the URI, apply timeouts, build the client, and
//! verify the server answers a ping. The export loop itself needs nothing
//! beyond a [`Database`] handle.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, Result};

/// Connect to MongoDB and return a database handle
///
/// # Arguments
/// * `config` - Connection configuration (URI, database name, timeout)
///
/// # Returns
/// * `Result<Database>` - Database handle, or a connection error
pub async fn connect(config: &ConnectionConfig) -> Result<Database> {
    debug!("Parsing connection URI");
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(|e| ConnectionError::InvalidUri(format!("{}: {}", config.uri, e)))?;

    let timeout = std::time::Duration::from_secs(config.timeout);
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
    options.app_name = Some("mongocsv".to_string());

    let client = Client::with_options(options)
        .map_err(|e| ConnectionError::ConnectionFailed(e.to_string()))?;
    let database = client.database(&config.database);

    // The driver connects lazily; ping so a bad URI fails here rather than
    // on the first page fetch.
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| ConnectionError::PingFailed(e.to_string()))?;

    info!(database = %config.database, "Connected to MongoDB");
    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;

    #[tokio::test]
    async fn test_connect_rejects_malformed_uri() {
        let config = ConnectionConfig {
            uri: "not-a-mongodb-uri".into(),
            database: "test".into(),
            timeout: 1,
        };
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::MongocsvError::Connection(ConnectionError::InvalidUri(_))
        ));
    }
}
