use serde::{Deserialize, Serialize};
use mongodb::{error::Error as MongoError, options::ClientOptions, Client, Collection, Database};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Invalid MongoDB URI: {0}")]
    InvalidUri(String),

    #[error("Failed to connect to MongoDB: {0}")]
    Connection(#[from] MongoError),
}

#[derive(Clone, Debug)]
pub struct MongoContext {
    db: Database
}

impl MongoContext {

    pub async fn init(uri: &str, db_name: &str) -> Result<MongoContext, ContextError> {
        Self::validate_mongo_uri(uri)?;
        log::info!("Connecting to MongoDB database '{}'", db_name);

        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some("PeopleService".to_string());

        let client = Client::with_options(client_options)?;

        client.list_database_names()
            .await
            .inspect_err(|e| log::error!("MongoDB did not answer: {}", e))?;

        let db = client.database(db_name);
        log::info!("Connected to MongoDB database '{}'", db_name);

        Ok(MongoContext { db })
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync + Unpin + for<'de> Deserialize<'de> + Serialize,
    {
        self.db.collection::<T>(name)
    }

    fn validate_mongo_uri(uri: &str) -> Result<(), ContextError> {
        let trimmed_uri = uri.trim();
        if trimmed_uri.is_empty() {
            return Err(ContextError::InvalidUri("cannot be empty or whitespace".to_string()));
        }

        let host_part = match trimmed_uri
            .strip_prefix("mongodb://")
            .or_else(|| trimmed_uri.strip_prefix("mongodb+srv://"))
        {
            Some(rest) => rest,
            None => {
                return Err(ContextError::InvalidUri(format!(
                    "must start with 'mongodb://' or 'mongodb+srv://'. Got: {}", uri
                )));
            }
        };

        if host_part.trim().is_empty() {
            return Err(ContextError::InvalidUri("missing host after protocol".to_string()));
        }

        if uri.contains(char::is_whitespace) {
            return Err(ContextError::InvalidUri("cannot contain whitespace".to_string()));
        }

        let re = Regex::new(r"^mongodb(\+srv)?://([^/\s]+)(/.*)?$")
            .map_err(|e| ContextError::InvalidUri(e.to_string()))?;
        if !re.is_match(trimmed_uri) {
            return Err(ContextError::InvalidUri(format!(
                "expected mongodb://host[:port][/database] or mongodb+srv://host[/database]. Got: {}", uri
            )));
        }

        Ok(())
    }

}
