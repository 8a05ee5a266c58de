//! Component Story Format (CSF)
//!
//! The read-only story-module model consumed by the transform engine, plus the
//! collaborators that produce it.
//!
//! # Core Concepts
//!
//! - [`StoryModule`]: a module's resolved title, default tags and stories in
//!   declaration order
//! - [`StoryRecord`]: one exported story with its own tags and play flag
//! - [`CsfParser`]: structural parser from source text into a [`StoryModule`]
//! - [`TitleResolver`]: remaps the declared title before anything uses it
//! - [`story_name_from_export`] / [`to_id`]: display names and stable story ids
//!
//! # Example
//!
//! ```rust,ignore
//! use scaffold_csf::{CsfParser, IdentityTitle};
//!
//! let module = CsfParser::new().parse(source, &IdentityTitle)?;
//! for story in module.stories() {
//!     println!("{}", story.export_key());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod model;
pub mod naming;
pub mod parser;
pub mod title;

pub use error::{IdPart, IdentityError, ParseError};
pub use model::{StoryModule, StoryRecord, TagSet};
pub use naming::{sanitize, story_name_from_export, to_id};
pub use parser::{CsfParser, SourceDialect};
pub use title::{IdentityTitle, TitleResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
