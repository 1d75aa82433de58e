pub mod catalog;
pub mod dates;
pub mod export;
pub mod facets;
pub mod filter;
pub mod header;
pub mod present;
pub mod record;
pub mod saved;
pub mod tabular;

#[cfg(feature = "store")]
pub mod storage;
