// src/mongo.rs
use crate::config::RunnerConfig;
use anyhow::{Context, Result};
use bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::info;

pub const APP_NAME: &str = "plp-queries";

/// The one client a run owns, plus handles to its database and collection.
///
/// Building it does no network I/O; the driver connects on first use.
/// [`BookstoreConnection::close`] consumes the value so it runs once.
pub struct BookstoreConnection {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl BookstoreConnection {
    pub async fn open(config: &RunnerConfig) -> Result<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_uri)
            .await
            .with_context(|| format!("Invalid MongoDB URI '{}'", config.mongo_uri))?;
        client_options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(client_options)?;
        let database = client.database(&config.db);
        let collection = database.collection::<Document>(&config.collection);

        Ok(BookstoreConnection {
            client,
            database,
            collection,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB did not answer ping")?;
        info!(namespace = %self.collection.namespace(), "connected to MongoDB");
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    pub async fn close(self) {
        let BookstoreConnection { client, .. } = self;
        client.shutdown().await;
        info!("MongoDB connection closed");
    }
}
