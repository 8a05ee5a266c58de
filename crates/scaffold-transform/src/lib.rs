//! Storyscaffold Transform Engine
//!
//! Turns a story module into the same module plus generated end-to-end test
//! scaffolding: one test per story, grouped per story and per module.
//!
//! # Pipeline
//!
//! ```text
//! source ──► CsfParser ──► StoryModule ──► TagPolicy::classify (per story)
//!                                               │ Included(skip)
//!                                               ▼
//!                     IdentityResolver ──► TestContext ──► TestBodyStrategy
//!                                                               │
//!                     ScaffoldAssembler ◄───────────────────────┘
//!                            │ Option<TestGroup>
//!                            ▼
//!                     DocumentComposer ──► Renderer ──► output text
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use scaffold_transform::{transform_csf, TransformOptions, TagPolicy};
//! use scaffold_transform::strategies::PlaywrightBodyStrategy;
//!
//! let strategy = PlaywrightBodyStrategy::new();
//! let policy = TagPolicy::new().with_skip(["skip-test"]);
//! let options = TransformOptions::new(&strategy).with_tag_policy(&policy);
//! let output = transform_csf(source, &options)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod assembler;
pub mod compose;
pub mod context;
pub mod error;
pub mod identity;
pub mod policy;
pub mod render;
pub mod strategies;
pub mod strategy;
pub mod tree;

pub use assembler::ScaffoldAssembler;
pub use compose::{transform_csf, DocumentComposer, TransformOptions};
pub use context::TestContext;
pub use error::{StrategyError, TransformError, TransformResult};
pub use identity::{CsfIdentity, IdentityResolver};
pub use policy::{classify, parse_tag_list, Classification, TagPolicy};
pub use render::{js_string, JsRenderer, Renderer};
pub use strategy::{Body, ModuleSetupStrategy, TestBodyStrategy};
pub use tree::{CaseKind, TestCase, TestGroup, TestNode};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building transforms
    pub use crate::compose::{transform_csf, DocumentComposer, TransformOptions};
    pub use crate::context::TestContext;
    pub use crate::error::{StrategyError, TransformError, TransformResult};
    pub use crate::policy::{Classification, TagPolicy};
    pub use crate::strategy::{Body, ModuleSetupStrategy, TestBodyStrategy};
    pub use scaffold_csf::{CsfParser, StoryModule, StoryRecord, TitleResolver};
}
