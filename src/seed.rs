// src/seed.rs
use crate::book::Book;
use anyhow::{Context, Result};
use bson::Document;
use csv::ReaderBuilder;
use mongodb::Collection;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// The built-in catalogue loaded by `--seed`.
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("To Kill a Mockingbird", "Harper Lee", "Fiction", 1960, 12.99, true)
            .with_details(336, "J. B. Lippincott & Co."),
        Book::new("1984", "George Orwell", "Dystopian", 1949, 10.99, true)
            .with_details(328, "Secker & Warburg"),
        Book::new("The Great Gatsby", "F. Scott Fitzgerald", "Fiction", 1925, 9.99, true)
            .with_details(180, "Charles Scribner's Sons"),
        Book::new("Brave New World", "Aldous Huxley", "Dystopian", 1932, 11.50, false)
            .with_details(311, "Chatto & Windus"),
        Book::new("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.49, true)
            .with_details(310, "George Allen & Unwin"),
        Book::new("The Catcher in the Rye", "J.D. Salinger", "Fiction", 1951, 8.99, true)
            .with_details(224, "Little, Brown and Company"),
        Book::new("Pride and Prejudice", "Jane Austen", "Romance", 1813, 7.99, true)
            .with_details(432, "T. Egerton"),
        Book::new("Animal Farm", "George Orwell", "Political Satire", 1945, 8.50, false)
            .with_details(112, "Secker & Warburg"),
        Book::new("Moby Dick", "Herman Melville", "Adventure", 1851, 12.50, false)
            .with_details(635, "Harper & Brothers"),
        Book::new("Beloved", "Toni Morrison", "Fiction", 1987, 13.99, true)
            .with_details(324, "Alfred A. Knopf"),
        Book::new("Room", "Emma Donoghue", "Fiction", 2010, 11.99, false)
            .with_details(321, "Little, Brown and Company"),
        Book::new("Project Hail Mary", "Andy Weir", "Science Fiction", 2021, 18.99, true)
            .with_details(496, "Ballantine Books"),
    ]
}

/// Reads books from headered CSV whose columns are the `Book` fields.
pub fn books_from_csv<R: Read>(reader: R) -> Result<Vec<Book>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut books = Vec::new();
    for (index, result) in rdr.deserialize::<Book>().enumerate() {
        let book = result.with_context(|| format!("Row {}: invalid book record", index + 1))?;
        books.push(book);
    }
    Ok(books)
}

pub fn books_from_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<Book>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open seed file {}", path.display()))?;
    books_from_csv(BufReader::new(file))
        .with_context(|| format!("Failed to load seed file {}", path.display()))
}

/// Drops `collection` and inserts `books`. Returns how many were inserted.
pub async fn replace_collection(collection: &Collection<Document>, books: &[Book]) -> Result<usize> {
    collection
        .drop()
        .await
        .with_context(|| format!("Failed to drop {}", collection.namespace()))?;
    debug!(namespace = %collection.namespace(), "collection dropped");

    if books.is_empty() {
        info!("seed data is empty, collection left empty");
        return Ok(0);
    }

    let typed = collection.clone_with_type::<Book>();
    let result = typed
        .insert_many(books)
        .await
        .with_context(|| format!("Failed to seed {}", collection.namespace()))?;

    let inserted = result.inserted_ids.len();
    info!(inserted, namespace = %collection.namespace(), "collection seeded");
    Ok(inserted)
}
