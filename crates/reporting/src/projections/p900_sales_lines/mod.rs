pub mod loader;
pub mod raw;

pub use loader::{load_from_reader, load_snapshot, LoadError, ParseError, SalesSnapshot};
