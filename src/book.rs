// src/book.rs
use serde::{Deserialize, Serialize};

/// A book record as the sample catalogue and the CSV seed files describe it.
///
/// The collection itself is schema-less; the runner reads plain documents and
/// never checks these fields. This type only gives seeding and tests a typed
/// view of the conventional shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl Book {
    pub fn new(
        title: &str,
        author: &str,
        genre: &str,
        published_year: i32,
        price: f64,
        in_stock: bool,
    ) -> Self {
        Book {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            published_year,
            price,
            in_stock,
            pages: None,
            publisher: None,
        }
    }

    pub fn with_details(mut self, pages: i32, publisher: &str) -> Self {
        self.pages = Some(pages);
        self.publisher = Some(publisher.to_string());
        self
    }
}
