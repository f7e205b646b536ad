pub mod author;
pub mod book;

pub use author::{Author, Gender};
pub use book::{Book, Genre};
