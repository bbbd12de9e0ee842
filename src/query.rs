// src/query.rs
//! Declarative request documents for every step of the query tour.
//!
//! Nothing here talks to the server: each function only builds the filter,
//! update, pipeline or index model the runner hands to the driver.

use bson::{doc, Document};
use mongodb::IndexModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// A window of `size` records. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn new(number: u64, size: u64) -> Self {
        Page { number, size }
    }

    /// Page 0 is read as page 1.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1) * self.size
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }
}

pub fn genre_is(genre: &str) -> Document {
    doc! { "genre": genre }
}

pub fn published_after(year: i32) -> Document {
    doc! { "published_year": { "$gt": year } }
}

pub fn author_is(author: &str) -> Document {
    doc! { "author": author }
}

pub fn title_is(title: &str) -> Document {
    doc! { "title": title }
}

pub fn set_price(price: f64) -> Document {
    doc! { "$set": { "price": price } }
}

pub fn in_stock_published_after(year: i32) -> Document {
    doc! {
        "in_stock": true,
        "published_year": { "$gt": year },
    }
}

pub fn title_author_price() -> Document {
    doc! { "title": 1, "author": 1, "price": 1, "_id": 0 }
}

pub fn by_price(order: SortOrder) -> Document {
    doc! { "price": order.direction() }
}

pub fn average_price_by_genre() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": "$genre",
            "averagePrice": { "$avg": "$price" },
        }
    }]
}

/// Ties on the count are resolved by the server's ordering.
pub fn author_with_most_books() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$author",
                "bookCount": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "bookCount": -1 } },
        doc! { "$limit": 1 },
    ]
}

/// Buckets `published_year` into decade labels such as `"1980s"`.
pub fn books_by_decade() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": {
                    "$concat": [
                        {
                            "$substr": [
                                { "$subtract": ["$published_year", { "$mod": ["$published_year", 10] }] },
                                0,
                                4
                            ]
                        },
                        "s"
                    ]
                },
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

pub fn title_index() -> IndexModel {
    IndexModel::builder().keys(doc! { "title": 1 }).build()
}

pub fn author_year_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "author": 1, "published_year": -1 })
        .build()
}

/// `explain` command for a `find` on `collection`, with execution statistics.
pub fn explain_find(collection: &str, filter: Document) -> Document {
    doc! {
        "explain": {
            "find": collection,
            "filter": filter,
        },
        "verbosity": "executionStats",
    }
}
