//! Story module model
//!
//! Built fresh per parse and never mutated by the transform engine.

use indexmap::IndexSet;
use serde::Serialize;

/// Tags attached to a story or module, in first-seen order without duplicates
pub type TagSet = IndexSet<String>;

/// One exported story
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryRecord {
    export_key: String,
    tags: TagSet,
    has_own_play_function: bool,
}

impl StoryRecord {
    /// Create untagged story without a play function
    #[inline]
    #[must_use]
    pub fn new(export_key: impl Into<String>) -> Self {
        Self {
            export_key: export_key.into(),
            tags: TagSet::new(),
            has_own_play_function: false,
        }
    }

    /// With story-level tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// With play function flag
    #[inline]
    #[must_use]
    pub fn with_play_function(mut self, has_play: bool) -> Self {
        self.has_own_play_function = has_play;
        self
    }

    /// Identifier the story was exported under
    #[inline]
    #[must_use]
    pub fn export_key(&self) -> &str {
        &self.export_key
    }

    /// Tags declared on the story itself
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Whether this story (not the meta) declares a play function
    #[inline]
    #[must_use]
    pub fn has_own_play_function(&self) -> bool {
        self.has_own_play_function
    }

    /// Tags used for filtering: the story's own, else the module defaults
    #[inline]
    #[must_use]
    pub fn effective_tags<'a>(&'a self, module: &'a StoryModule) -> &'a TagSet {
        if self.tags.is_empty() {
            module.default_tags()
        } else {
            &self.tags
        }
    }
}

/// A parsed story module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoryModule {
    title: Option<String>,
    default_tags: TagSet,
    stories: Vec<StoryRecord>,
}

impl StoryModule {
    /// Create module with a resolved title (or none)
    #[inline]
    #[must_use]
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            default_tags: TagSet::new(),
            stories: Vec::new(),
        }
    }

    /// With module-level default tags
    #[must_use]
    pub fn with_default_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Append a story; declaration order is preserved
    #[inline]
    #[must_use]
    pub fn with_story(mut self, story: StoryRecord) -> Self {
        self.stories.push(story);
        self
    }

    /// Append a story in place
    #[inline]
    pub fn push_story(&mut self, story: StoryRecord) {
        self.stories.push(story);
    }

    /// Resolved title, `None` when undeclared and unresolvable
    #[inline]
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Tags inherited by stories that declare none
    #[inline]
    #[must_use]
    pub fn default_tags(&self) -> &TagSet {
        &self.default_tags
    }

    /// Stories in declaration order
    #[inline]
    #[must_use]
    pub fn stories(&self) -> &[StoryRecord] {
        &self.stories
    }

    /// Replace the title, as done by a title override
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}
