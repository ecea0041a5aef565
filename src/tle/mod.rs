mod error;
mod loader;
mod parser;

pub use error::{LoadError, TleError};
pub use loader::{load_file, parse_catalog, parse_catalog_sets, TleLoader};
pub use parser::{checksum, parse_packed_exponent, TleRecord};
