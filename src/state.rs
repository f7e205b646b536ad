use crate::models::{Author, Book};
use crate::store::Collection;

/// Shared application state: one document collection per resource.
/// Cloning shares the underlying collections.
#[derive(Clone, Default)]
pub struct AppState {
    pub books: Collection<Book>,
    pub authors: Collection<Author>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
