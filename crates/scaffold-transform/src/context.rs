//! Per-story test context handed to body strategies

use scaffold_csf::StoryRecord;
use serde::Serialize;

use crate::error::{TransformError, TransformResult};
use crate::identity::IdentityResolver;

/// Immutable facts about one qualifying story
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestContext {
    export_key: String,
    display_name: String,
    title: String,
    id: String,
}

impl TestContext {
    /// Build the context for `story` under `title`
    ///
    /// # Errors
    /// - [`TransformError::MissingTitle`] if `title` is empty
    /// - [`TransformError::Identity`] if no id can be formed
    pub fn build(
        story: &StoryRecord,
        title: &str,
        identity: &dyn IdentityResolver,
    ) -> TransformResult<Self> {
        if title.is_empty() {
            return Err(TransformError::MissingTitle {
                export_key: story.export_key().to_string(),
            });
        }
        let display_name = identity.display_name(story.export_key());
        let id = identity.story_id(title, &display_name)?;
        Ok(Self {
            export_key: story.export_key().to_string(),
            display_name,
            title: title.to_string(),
            id,
        })
    }

    /// Export key of the story
    #[inline]
    #[must_use]
    pub fn export_key(&self) -> &str {
        &self.export_key
    }

    /// Display name derived from the export key
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Resolved module title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stable story id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}
