pub mod catalog;
pub mod error;
pub mod matching;
pub mod models;
pub mod resolver;
pub mod utils;

pub use error::ResolveError;
pub use resolver::ServiceResolver;
