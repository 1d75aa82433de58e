mod case_id;
mod export;
mod facets;
mod filter;
mod ingest;
mod util;

pub use case_id::CaseId;
pub use export::Export;
pub use facets::Facets;
pub use filter::Filter;
pub use ingest::Ingest;
