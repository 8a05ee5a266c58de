//! Story identity seam
//!
//! The engine only ever asks for a display name and a story id through
//! [`IdentityResolver`], so the slug algorithm can be swapped without
//! touching the assembler.

use scaffold_csf::{story_name_from_export, to_id, IdentityError};

/// Display names and story ids
pub trait IdentityResolver {
    /// Human display name for an export key
    fn display_name(&self, export_key: &str) -> String;

    /// Globally stable id for a story
    ///
    /// # Errors
    /// Returns [`IdentityError`] if the title or name cannot form an id
    fn story_id(&self, title: &str, name: &str) -> Result<String, IdentityError>;
}

/// Storybook-compatible naming: start-case names, `title--name` slugs
#[derive(Debug, Clone, Copy, Default)]
pub struct CsfIdentity;

impl IdentityResolver for CsfIdentity {
    #[inline]
    fn display_name(&self, export_key: &str) -> String {
        story_name_from_export(export_key)
    }

    #[inline]
    fn story_id(&self, title: &str, name: &str) -> Result<String, IdentityError> {
        to_id(title, name)
    }
}
