// src/runner.rs
use crate::book::Book;
use crate::config::RunnerConfig;
use crate::mongo::BookstoreConnection;
use crate::report::Reporter;
use crate::seed::replace_collection;
use crate::step::{DeleteSummary, FindRequest, Outcome, Request, Step, UpdateSummary};
use anyhow::{Context, Result};
use bson::Document;
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database};
use std::io::Write;
use tracing::{debug, info};

/// Executes steps one at a time against a single collection.
pub struct QueryRunner<'a> {
    database: &'a Database,
    collection: &'a Collection<Document>,
    config: &'a RunnerConfig,
}

impl<'a> QueryRunner<'a> {
    pub fn new(connection: &'a BookstoreConnection, config: &'a RunnerConfig) -> Self {
        QueryRunner {
            database: connection.database(),
            collection: connection.collection(),
            config,
        }
    }

    pub async fn execute(&self, request: Request) -> Result<Outcome> {
        let outcome = match request {
            Request::Find(find) => Outcome::Documents(self.find(find).await?),
            Request::UpdateOne { filter, update } => {
                let result = self.collection.update_one(filter, update).await?;
                Outcome::Updated(UpdateSummary::from(&result))
            }
            Request::DeleteOne { filter } => {
                let result = self.collection.delete_one(filter).await?;
                Outcome::Deleted(DeleteSummary::from(&result))
            }
            Request::Aggregate { pipeline } => {
                let cursor = self.collection.aggregate(pipeline).await?;
                Outcome::Documents(cursor.try_collect().await?)
            }
            Request::CreateIndex { model } => {
                let result = self.collection.create_index(model).await?;
                Outcome::IndexCreated(result.index_name)
            }
            Request::Explain { command } => Outcome::Plan(self.database.run_command(command).await?),
        };
        Ok(outcome)
    }

    async fn find(&self, request: FindRequest) -> Result<Vec<Document>> {
        let mut find = self.collection.find(request.filter);
        if let Some(projection) = request.projection {
            find = find.projection(projection);
        }
        if let Some(sort) = request.sort {
            find = find.sort(sort);
        }
        if let Some(page) = request.page {
            find = find.skip(page.offset()).limit(page.limit());
        }

        let cursor = find.await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs)
    }

    pub async fn run_step(&self, step: Step) -> Result<Outcome> {
        let label = step.label(self.config);
        debug!(step = %label, "running step");

        let request = step.request(self.config, self.collection.name());
        let outcome = self
            .execute(request)
            .await
            .with_context(|| format!("Step '{}' failed", label))?;

        info!(step = %label, result = %outcome.brief(), "step finished");
        Ok(outcome)
    }

    /// Runs the whole tour, stopping at the first failing step.
    pub async fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> Result<()> {
        for step in Step::sequence() {
            let outcome = self.run_step(step).await?;
            reporter.report(&step.label(self.config), &outcome)?;
        }
        Ok(())
    }
}

/// Prints every step's request without connecting.
pub fn dry_run<W: Write>(config: &RunnerConfig, reporter: &mut Reporter<W>) -> Result<()> {
    for step in Step::sequence() {
        let request = step.request(config, &config.collection);
        reporter.request(&step.label(config), &request.describe(&config.collection))?;
    }
    Ok(())
}

/// Opens the connection, runs the tour, and shuts the client down whatever
/// happened in between. Seed data, when given, replaces the collection first.
pub async fn run_scoped<W: Write>(
    config: &RunnerConfig,
    seed: Option<Vec<Book>>,
    reporter: &mut Reporter<W>,
) -> Result<()> {
    let connection = BookstoreConnection::open(config).await?;
    let result = run_connected(&connection, config, seed, reporter).await;
    connection.close().await;
    result
}

async fn run_connected<W: Write>(
    connection: &BookstoreConnection,
    config: &RunnerConfig,
    seed: Option<Vec<Book>>,
    reporter: &mut Reporter<W>,
) -> Result<()> {
    connection.ping().await?;

    if let Some(books) = seed {
        replace_collection(connection.collection(), &books).await?;
    }

    QueryRunner::new(connection, config).run(reporter).await
}
