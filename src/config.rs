// src/config.rs
use crate::cli::Cli;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB: &str = "plp_bookstore";
pub const DEFAULT_COLLECTION: &str = "books";

/// Connection names plus the parameter of every step.
///
/// Resolution order is CLI flags, then the YAML file, then these defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub mongo_uri: String,
    pub db: String,
    pub collection: String,
    pub genre: String,
    pub published_after: i32,
    pub author: String,
    pub update_title: String,
    pub new_price: f64,
    pub delete_title: String,
    pub in_stock_after: i32,
    pub page_size: u64,
    pub explain_title: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            db: DEFAULT_DB.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            genre: "Fiction".to_string(),
            published_after: 1950,
            author: "George Orwell".to_string(),
            update_title: "1984".to_string(),
            new_price: 15.99,
            delete_title: "Moby Dick".to_string(),
            in_stock_after: 2010,
            page_size: 5,
            explain_title: "The Hobbit".to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RunnerConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn resolve(args: &Cli) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => RunnerConfig::default(),
        };

        if let Some(uri) = &args.mongo_uri {
            config.mongo_uri = uri.clone();
        }
        if let Some(db) = &args.db {
            config.db = db.clone();
        }
        if let Some(collection) = &args.collection {
            config.collection = collection.clone();
        }
        if let Some(page_size) = args.page_size {
            config.page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }

    /// The server reads a zero `limit` as no limit at all.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        Ok(())
    }
}
