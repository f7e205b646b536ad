use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;
use crate::validation::{FieldSpec, Rule, Schema};

pub const GENRES: &[&str] = &["Mystery", "Fantasy", "Biography", "History", "Self-Help"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Mystery,
    Fantasy,
    Biography,
    History,
    #[serde(rename = "Self-Help")]
    SelfHelp,
}

/// A catalogued book. `author` is free text, not a reference to an
/// Author record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Genre,
    pub publication_year: i32,
    pub pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub available: bool,
}

impl Document for Book {
    const COLLECTION: &'static str = "books";
    const UNIQUE_FIELD: &'static str = "isbn";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_value(&self) -> String {
        self.isbn.clone()
    }
}

/// Validation rules for book bodies. Checked before any store call;
/// see the generic validator for collection semantics.
pub const BOOK_SCHEMA: Schema = &[
    FieldSpec { field: "title", required: true, rules: &[Rule::Length { min: 1, max: 200 }] },
    FieldSpec { field: "author", required: true, rules: &[Rule::Length { min: 1, max: 100 }] },
    FieldSpec { field: "isbn", required: true, rules: &[Rule::Digits(&[10, 13])] },
    FieldSpec { field: "genre", required: true, rules: &[Rule::OneOf(GENRES)] },
    FieldSpec { field: "publicationYear", required: true, rules: &[Rule::YearRange { min: 1000 }] },
    FieldSpec { field: "pages", required: true, rules: &[Rule::IntRange { min: 1, max: 10_000 }] },
    FieldSpec { field: "description", required: false, rules: &[Rule::MaxLength(1000)] },
    FieldSpec { field: "available", required: false, rules: &[Rule::Boolean] },
];

/// A validated create payload. Deserialized from a body that already
/// passed [`BOOK_SCHEMA`] in create mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Genre,
    pub publication_year: i32,
    pub pages: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl From<NewBook> for Book {
    fn from(new: NewBook) -> Self {
        Book {
            id: Uuid::new_v4(),
            title: new.title,
            author: new.author,
            isbn: new.isbn,
            genre: new.genre,
            publication_year: new.publication_year,
            pages: new.pages,
            description: new.description,
            available: new.available.unwrap_or(true),
        }
    }
}

/// A validated partial-update payload. Only supplied fields overwrite;
/// everything else keeps its prior value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<Genre>,
    pub publication_year: Option<i32>,
    pub pages: Option<u32>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl BookPatch {
    pub fn apply(self, mut book: Book) -> Book {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(year) = self.publication_year {
            book.publication_year = year;
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
        if let Some(description) = self.description {
            book.description = Some(description);
        }
        if let Some(available) = self.available {
            book.available = available;
        }
        book
    }
}
