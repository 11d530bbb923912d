pub mod api;
pub mod client;
pub mod error;
pub mod images;
pub mod traits;

pub use api::Endpoint;
pub use client::TmdbClient;
pub use error::CatalogError;
pub use images::{PosterSize, poster_url};
pub use traits::Catalog;
