// src/step.rs
//! The fixed tour: which steps run, in which order, and what each one asks
//! the server for.

use crate::config::RunnerConfig;
use crate::query::{self, Page, SortOrder};
use bson::{doc, Bson, Document};
use mongodb::results::{DeleteResult, UpdateResult};
use mongodb::IndexModel;

/// Pages fetched by the pagination steps.
pub const PAGES: [u64; 2] = [1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ByGenre,
    PublishedAfter,
    ByAuthor,
    UpdatePrice,
    DeleteByTitle,
    InStockPublishedAfter,
    TitleAuthorPrice,
    SortByPrice(SortOrder),
    Page(u64),
    AveragePriceByGenre,
    AuthorWithMostBooks,
    BooksByDecade,
    CreateTitleIndex,
    CreateAuthorYearIndex,
    ExplainTitleLookup,
}

impl Step {
    pub fn sequence() -> Vec<Step> {
        let mut steps = vec![
            Step::ByGenre,
            Step::PublishedAfter,
            Step::ByAuthor,
            Step::UpdatePrice,
            Step::DeleteByTitle,
            Step::InStockPublishedAfter,
            Step::TitleAuthorPrice,
            Step::SortByPrice(SortOrder::Ascending),
            Step::SortByPrice(SortOrder::Descending),
        ];
        steps.extend(PAGES.iter().map(|page| Step::Page(*page)));
        steps.extend([
            Step::AveragePriceByGenre,
            Step::AuthorWithMostBooks,
            Step::BooksByDecade,
            Step::CreateTitleIndex,
            Step::CreateAuthorYearIndex,
            Step::ExplainTitleLookup,
        ]);
        steps
    }

    pub fn label(&self, config: &RunnerConfig) -> String {
        match self {
            Step::ByGenre => format!("Books in the {} genre", config.genre),
            Step::PublishedAfter => format!("Books published after {}", config.published_after),
            Step::ByAuthor => format!("Books by {}", config.author),
            Step::UpdatePrice => format!(
                "Updated price of \"{}\" to {}",
                config.update_title, config.new_price
            ),
            Step::DeleteByTitle => format!("Deleted \"{}\"", config.delete_title),
            Step::InStockPublishedAfter => format!(
                "Books in stock and published after {}",
                config.in_stock_after
            ),
            Step::TitleAuthorPrice => "Books with only title, author, and price".to_string(),
            Step::SortByPrice(SortOrder::Ascending) => {
                "Books sorted by price (ascending)".to_string()
            }
            Step::SortByPrice(SortOrder::Descending) => {
                "Books sorted by price (descending)".to_string()
            }
            Step::Page(number) => format!("Page {} ({} books per page)", number, config.page_size),
            Step::AveragePriceByGenre => "Average price of books by genre".to_string(),
            Step::AuthorWithMostBooks => "Author with the most books".to_string(),
            Step::BooksByDecade => "Books grouped by publication decade".to_string(),
            Step::CreateTitleIndex => "Index created on title".to_string(),
            Step::CreateAuthorYearIndex => {
                "Compound index created on author and published_year".to_string()
            }
            Step::ExplainTitleLookup => format!(
                "Explain output for indexed query on title \"{}\"",
                config.explain_title
            ),
        }
    }

    pub fn request(&self, config: &RunnerConfig, collection: &str) -> Request {
        match self {
            Step::ByGenre => Request::find(query::genre_is(&config.genre)),
            Step::PublishedAfter => Request::find(query::published_after(config.published_after)),
            Step::ByAuthor => Request::find(query::author_is(&config.author)),
            Step::UpdatePrice => Request::UpdateOne {
                filter: query::title_is(&config.update_title),
                update: query::set_price(config.new_price),
            },
            Step::DeleteByTitle => Request::DeleteOne {
                filter: query::title_is(&config.delete_title),
            },
            Step::InStockPublishedAfter => {
                Request::find(query::in_stock_published_after(config.in_stock_after))
            }
            Step::TitleAuthorPrice => Request::Find(FindRequest {
                projection: Some(query::title_author_price()),
                ..FindRequest::default()
            }),
            Step::SortByPrice(order) => Request::Find(FindRequest {
                sort: Some(query::by_price(*order)),
                ..FindRequest::default()
            }),
            Step::Page(number) => Request::Find(FindRequest {
                page: Some(Page::new(*number, config.page_size)),
                ..FindRequest::default()
            }),
            Step::AveragePriceByGenre => Request::Aggregate {
                pipeline: query::average_price_by_genre(),
            },
            Step::AuthorWithMostBooks => Request::Aggregate {
                pipeline: query::author_with_most_books(),
            },
            Step::BooksByDecade => Request::Aggregate {
                pipeline: query::books_by_decade(),
            },
            Step::CreateTitleIndex => Request::CreateIndex {
                model: query::title_index(),
            },
            Step::CreateAuthorYearIndex => Request::CreateIndex {
                model: query::author_year_index(),
            },
            Step::ExplainTitleLookup => Request::Explain {
                command: query::explain_find(collection, query::title_is(&config.explain_title)),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindRequest {
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub page: Option<Page>,
}

/// What a step hands to the driver.
#[derive(Debug, Clone)]
pub enum Request {
    Find(FindRequest),
    UpdateOne { filter: Document, update: Document },
    DeleteOne { filter: Document },
    Aggregate { pipeline: Vec<Document> },
    CreateIndex { model: IndexModel },
    Explain { command: Document },
}

impl Request {
    fn find(filter: Document) -> Self {
        Request::Find(FindRequest {
            filter,
            ..FindRequest::default()
        })
    }

    /// Command-shaped rendering used by dry runs.
    pub fn describe(&self, collection: &str) -> Document {
        match self {
            Request::Find(find) => {
                let mut command = doc! { "find": collection, "filter": find.filter.clone() };
                if let Some(projection) = &find.projection {
                    command.insert("projection", projection.clone());
                }
                if let Some(sort) = &find.sort {
                    command.insert("sort", sort.clone());
                }
                if let Some(page) = &find.page {
                    command.insert("skip", Bson::Int64(page.offset() as i64));
                    command.insert("limit", Bson::Int64(page.limit()));
                }
                command
            }
            Request::UpdateOne { filter, update } => doc! {
                "updateOne": collection,
                "filter": filter.clone(),
                "update": update.clone(),
            },
            Request::DeleteOne { filter } => doc! {
                "deleteOne": collection,
                "filter": filter.clone(),
            },
            Request::Aggregate { pipeline } => doc! {
                "aggregate": collection,
                "pipeline": pipeline.clone(),
            },
            Request::CreateIndex { model } => doc! {
                "createIndex": collection,
                "key": model.keys.clone(),
            },
            Request::Explain { command } => command.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

impl From<&UpdateResult> for UpdateSummary {
    fn from(result: &UpdateResult) -> Self {
        UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: u64,
}

impl From<&DeleteResult> for DeleteSummary {
    fn from(result: &DeleteResult) -> Self {
        DeleteSummary {
            deleted: result.deleted_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Documents(Vec<Document>),
    Updated(UpdateSummary),
    Deleted(DeleteSummary),
    IndexCreated(String),
    Plan(Document),
}

impl Outcome {
    /// One-line summary for log output.
    pub fn brief(&self) -> String {
        match self {
            Outcome::Documents(docs) => format!("{} documents", docs.len()),
            Outcome::Updated(summary) => {
                format!("matched {}, modified {}", summary.matched, summary.modified)
            }
            Outcome::Deleted(summary) => format!("deleted {}", summary.deleted),
            Outcome::IndexCreated(name) => format!("index {}", name),
            Outcome::Plan(_) => "plan".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tour_runs_in_the_documented_order() {
        let steps = Step::sequence();
        assert_eq!(steps.len(), 17);
        assert_eq!(steps[0], Step::ByGenre);
        assert_eq!(steps[3], Step::UpdatePrice);
        assert_eq!(steps[4], Step::DeleteByTitle);
        assert_eq!(steps[7], Step::SortByPrice(SortOrder::Ascending));
        assert_eq!(steps[8], Step::SortByPrice(SortOrder::Descending));
        assert_eq!(steps[9], Step::Page(1));
        assert_eq!(steps[10], Step::Page(2));
        assert_eq!(steps[16], Step::ExplainTitleLookup);
    }

    #[test]
    fn labels_carry_the_configured_values() {
        let config = RunnerConfig {
            genre: "Fantasy".to_string(),
            published_after: 1990,
            ..RunnerConfig::default()
        };
        assert_eq!(Step::ByGenre.label(&config), "Books in the Fantasy genre");
        assert_eq!(Step::PublishedAfter.label(&config), "Books published after 1990");
        assert_eq!(Step::Page(2).label(&config), "Page 2 (5 books per page)");
    }

    #[test]
    fn every_label_is_distinct() {
        let config = RunnerConfig::default();
        let mut labels: Vec<String> = Step::sequence().iter().map(|s| s.label(&config)).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Step::sequence().len());
    }

    #[test]
    fn second_page_skips_one_page_size() {
        let config = RunnerConfig {
            page_size: 4,
            ..RunnerConfig::default()
        };
        let described = Step::Page(2).request(&config, "books").describe("books");
        assert_eq!(described.get_i64("skip").unwrap(), 4);
        assert_eq!(described.get_i64("limit").unwrap(), 4);
        assert_eq!(described.get_document("filter").unwrap(), &doc! {});
    }

    #[test]
    fn mutations_target_configured_titles() {
        let config = RunnerConfig::default();
        let update = Step::UpdatePrice.request(&config, "books").describe("books");
        assert_eq!(update.get_str("updateOne").unwrap(), "books");
        assert_eq!(update.get_document("filter").unwrap(), &doc! { "title": "1984" });
        assert_eq!(
            update.get_document("update").unwrap(),
            &doc! { "$set": { "price": 15.99 } }
        );

        let delete = Step::DeleteByTitle.request(&config, "books").describe("books");
        assert_eq!(delete.get_document("filter").unwrap(), &doc! { "title": "Moby Dick" });
    }

    #[test]
    fn explain_targets_the_running_collection() {
        let config = RunnerConfig::default();
        let described = Step::ExplainTitleLookup
            .request(&config, "shelf")
            .describe("shelf");
        assert_eq!(
            described.get_document("explain").unwrap().get_str("find").unwrap(),
            "shelf"
        );
    }

    #[test]
    fn brief_summaries() {
        assert_eq!(Outcome::Documents(vec![doc! {}, doc! {}]).brief(), "2 documents");
        assert_eq!(
            Outcome::Updated(UpdateSummary { matched: 0, modified: 0 }).brief(),
            "matched 0, modified 0"
        );
        assert_eq!(Outcome::Deleted(DeleteSummary { deleted: 1 }).brief(), "deleted 1");
    }
}
