//! Title resolution from file paths
//!
//! A declared title is only prefixed. Without one, the title comes from the
//! file's path below the stories directory:
//!
//! ```text
//! stories/components/Button/Button.stories.tsx  ->  components/Button
//! stories/forms/index.stories.js                ->  forms
//! ```

use std::path::{Component, Path, PathBuf};

use scaffold_csf::TitleResolver;

/// Suffix markers that end the title part of a story file name
const STORY_MARKERS: [&str; 2] = [".stories.", ".story."];

/// Resolves titles for one story file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoTitle {
    file: PathBuf,
    stories_dir: Option<PathBuf>,
    prefix: Option<String>,
}

impl AutoTitle {
    /// Create resolver for `file`
    #[inline]
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            stories_dir: None,
            prefix: None,
        }
    }

    /// With the directory auto titles are relative to
    #[inline]
    #[must_use]
    pub fn with_stories_dir(mut self, dir: Option<impl Into<PathBuf>>) -> Self {
        self.stories_dir = dir.map(Into::into);
        self
    }

    /// With a prefix for every title
    #[inline]
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<impl Into<String>>) -> Self {
        self.prefix = prefix.map(Into::into);
        self
    }

    /// Title derived from the file path alone
    #[must_use]
    pub fn path_title(&self) -> Option<String> {
        let file = normalize(&self.file);
        let relative = self
            .stories_dir
            .as_deref()
            .and_then(|dir| file.strip_prefix(normalize(dir)).ok())
            .unwrap_or(file.as_path());

        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let file_name = segments.pop()?;
        segments.push(story_stem(&file_name).to_string());

        if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
            segments.pop();
        }
        if matches!(segments.as_slice(), [.., parent, last] if parent == last) {
            segments.pop();
        }

        let title = segments.join("/");
        (!title.is_empty()).then_some(title)
    }

    fn prefixed(&self, title: &str) -> String {
        let title = title.trim_matches('/');
        match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{title}"),
            _ => title.to_string(),
        }
    }
}

impl TitleResolver for AutoTitle {
    fn resolve(&self, user_title: Option<&str>) -> Option<String> {
        let title = match user_title {
            Some(title) => title.to_string(),
            None => self.path_title()?,
        };
        Some(self.prefixed(&title))
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn story_stem(file_name: &str) -> &str {
    STORY_MARKERS
        .iter()
        .find_map(|marker| file_name.find(marker).map(|at| &file_name[..at]))
        .unwrap_or_else(|| file_name.split('.').next().unwrap_or(file_name))
}
