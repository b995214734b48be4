//! Source acquisition for OBS books.
//!
//! Resolves a book source either through the Door43 catalog (by
//! language code) or directly from a git.door43.org repository
//! archive, extracts it into a temporary workspace and loads the
//! [`Book`](obs_model::Book) from the container layout.

mod archive;
mod catalog;
mod content;
mod error;
mod manifest;

pub use archive::{DOOR43_SITE_URL, SourceWorkspace, http_agent, repo_archive_url};
pub use catalog::{CATALOG_URL, Catalog, fetch_catalog, find_zip_url};
pub use content::{load_book, strip_trailing_hashes};
pub use error::SourceError;
pub use manifest::Manifest;
