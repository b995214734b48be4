//! Rendering engine converting a parsed OBS [`Book`](obs_model::Book)
//! into a ConTeXt source document.
//!
//! The pipeline has three text-level stages and one structural stage:
//!
//! - [`markup`]: ordered rewrite rules turning wiki/markdown inline
//!   markup (`**bold**`, `== section ==`, `<red>`, links, ...) into
//!   ConTeXt commands. Pure line transforms.
//! - [`refs`]: narrow non-breaking-space corrections applied only to
//!   scripture-reference strings.
//! - [`pagination`]: lays story frames out two per physical page,
//!   using look-ahead to budget vertical space through the
//!   [`snippets`] resource set.
//! - [`assembler`]: renders front/back matter, splits the front matter
//!   into about/license sections and substitutes everything into the
//!   master template together with the [`RenderConfig`] tokens.
//!
//! Everything here is synchronous and pure apart from reading the
//! snippet resources; callers can render different books on different
//! threads freely.

mod assembler;
mod config;
mod error;
pub mod markup;
mod matter;
mod pagination;
pub mod refs;
mod snippets;

pub use assembler::Assembler;
pub use config::RenderConfig;
pub use error::TypesetError;
pub use matter::{render_matter, split_front_matter};
pub use pagination::{PaginationOptions, paginate};
pub use snippets::SnippetSet;
