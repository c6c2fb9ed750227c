pub mod db;
pub mod deals;
pub mod document_chunks;
pub mod dynamic_facts;
mod error;
pub mod messages;
mod models;
pub mod schema;
pub mod sessions;
#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
