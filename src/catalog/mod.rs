// Catalog module: search access to the external product provider.

pub mod client;
pub mod traits;

pub use client::RapidApiCatalog;
pub use traits::CatalogSearch;
