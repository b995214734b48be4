//! Document model for Open Bible Stories content.
//!
//! OBS is a fixed set of 50 illustrated stories. Each story ("chapter")
//! is a markdown file with a title heading, a sequence of illustrated
//! frames and a closing scripture reference. This crate provides:
//!
//! - [`Book`], [`Chapter`] and [`Frame`]: typed records for one
//!   translated edition,
//! - [`Chapter::from_markdown`]: the chapter parser,
//! - [`validate`]: structural validation against the fixed
//!   frame-count table ([`FRAME_COUNTS`]).
//!
//! Parsing is tolerant (a chapter without a title still parses);
//! [`validate`] collects every structural problem across the whole
//! book before the caller decides to abort.

mod book;
mod counts;
mod parser;
mod validate;

pub use book::{Book, Chapter, Direction, Frame};
pub use counts::FRAME_COUNTS;
pub use parser::ParseError;
pub use validate::validate;
