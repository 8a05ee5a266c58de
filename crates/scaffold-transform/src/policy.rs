//! Tag policy evaluation
//!
//! Three tag sets decide each story's fate: `include` (if non-empty, a story
//! needs one of them), `exclude` (any match drops the story, winning over
//! `include`) and `skip` (any match keeps the story but marks it skipped).

use std::collections::BTreeSet;

use scaffold_csf::TagSet;
use serde::{Deserialize, Serialize};

/// Outcome of classifying one story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// No test is generated
    Excluded,
    /// A test is generated, optionally skipped
    Included {
        /// Emit the case as skipped
        skip: bool,
    },
}

impl Classification {
    /// Check if a test is generated
    #[inline]
    #[must_use]
    pub fn is_included(&self) -> bool {
        matches!(self, Self::Included { .. })
    }
}

/// Include / exclude / skip tag sets, immutable per run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPolicy {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
    skip: BTreeSet<String>,
}

impl TagPolicy {
    /// Policy with no tags in any set
    pub const EMPTY: TagPolicy = TagPolicy {
        include: BTreeSet::new(),
        exclude: BTreeSet::new(),
        skip: BTreeSet::new(),
    };

    /// Create empty policy (every story included, none skipped)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With include tags
    #[must_use]
    pub fn with_include<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(tags.into_iter().map(Into::into));
        self
    }

    /// With exclude tags
    #[must_use]
    pub fn with_exclude<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(tags.into_iter().map(Into::into));
        self
    }

    /// With skip tags
    #[must_use]
    pub fn with_skip<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Include tags
    #[inline]
    #[must_use]
    pub fn include(&self) -> &BTreeSet<String> {
        &self.include
    }

    /// Exclude tags
    #[inline]
    #[must_use]
    pub fn exclude(&self) -> &BTreeSet<String> {
        &self.exclude
    }

    /// Skip tags
    #[inline]
    #[must_use]
    pub fn skip(&self) -> &BTreeSet<String> {
        &self.skip
    }

    /// Classify a story's effective tags
    #[inline]
    #[must_use]
    pub fn classify(&self, tags: &TagSet) -> Classification {
        classify(tags, self)
    }
}

/// Decide whether a story with `tags` gets a test, and whether it is skipped
#[must_use]
pub fn classify(tags: &TagSet, policy: &TagPolicy) -> Classification {
    let included = policy.include.is_empty() || intersects(tags, &policy.include);
    let excluded = intersects(tags, &policy.exclude);

    if excluded || !included {
        return Classification::Excluded;
    }
    Classification::Included {
        skip: intersects(tags, &policy.skip),
    }
}

fn intersects(tags: &TagSet, set: &BTreeSet<String>) -> bool {
    tags.iter().any(|tag| set.contains(tag))
}

/// Split a comma-separated tag list, trimming entries and dropping blanks
#[must_use]
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tags(list: &[&str]) -> TagSet {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn empty_policy_includes_everything() {
        let policy = TagPolicy::new();
        assert_eq!(
            policy.classify(&tags(&[])),
            Classification::Included { skip: false }
        );
        assert_eq!(
            policy.classify(&tags(&["anything"])),
            Classification::Included { skip: false }
        );
    }

    #[test]
    fn include_requires_a_match() {
        let policy = TagPolicy::new().with_include(["play", "design"]);
        assert_eq!(policy.classify(&tags(&[])), Classification::Excluded);
        assert_eq!(policy.classify(&tags(&["other"])), Classification::Excluded);
        assert!(policy.classify(&tags(&["design"])).is_included());
    }

    #[test]
    fn exclude_wins_over_include() {
        let policy = TagPolicy::new().with_include(["play"]).with_exclude(["play"]);
        assert_eq!(policy.classify(&tags(&["play"])), Classification::Excluded);
    }

    #[test]
    fn skip_marks_but_keeps() {
        let policy = TagPolicy::new().with_skip(["skip-test"]);
        assert_eq!(
            policy.classify(&tags(&["skip-test"])),
            Classification::Included { skip: true }
        );
    }

    #[test]
    fn excluded_story_is_never_skipped() {
        let policy = TagPolicy::new().with_exclude(["flaky"]).with_skip(["flaky"]);
        assert_eq!(policy.classify(&tags(&["flaky"])), Classification::Excluded);
    }

    #[test]
    fn comma_lists_are_trimmed() {
        assert_eq!(parse_tag_list(" play , design,, "), vec!["play", "design"]);
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ").is_empty());
    }

    fn tag_strategy() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(prop_oneof!["a", "b", "c", "d", "e"], 0..4)
    }

    proptest! {
        #[test]
        fn prop_exclude_takes_precedence(
            story in tag_strategy(),
            include in tag_strategy(),
            exclude in tag_strategy(),
            skip in tag_strategy(),
        ) {
            let policy = TagPolicy::new()
                .with_include(include)
                .with_exclude(exclude.clone())
                .with_skip(skip);
            let story: TagSet = story.into_iter().collect();

            if story.iter().any(|t| exclude.contains(t)) {
                prop_assert_eq!(policy.classify(&story), Classification::Excluded);
            }
        }

        #[test]
        fn prop_skip_never_drops(
            story in tag_strategy(),
            skip in tag_strategy(),
        ) {
            let with_skip = TagPolicy::new().with_skip(skip);
            let story: TagSet = story.into_iter().collect();

            prop_assert!(with_skip.classify(&story).is_included());
        }

        #[test]
        fn prop_classification_is_idempotent(
            story in tag_strategy(),
            include in tag_strategy(),
            exclude in tag_strategy(),
            skip in tag_strategy(),
        ) {
            let policy = TagPolicy::new()
                .with_include(include)
                .with_exclude(exclude)
                .with_skip(skip);
            let story: TagSet = story.into_iter().collect();

            prop_assert_eq!(policy.classify(&story), policy.classify(&story));
        }
    }
}
