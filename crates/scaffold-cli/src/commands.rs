//! `transform` and `inspect` subcommands

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use scaffold_csf::{CsfParser, StoryModule};
use scaffold_transform::strategies::{
    PageSetupStrategy, PlaywrightBodyStrategy, SmokeBodyStrategy,
};
use scaffold_transform::{
    Classification, CsfIdentity, DocumentComposer, IdentityResolver, TestBodyStrategy,
    TransformOptions, TransformResult,
};
use serde::Serialize;

use crate::config::{ScaffoldConfig, StrategyKind};
use crate::title::AutoTitle;

/// Suffix replacing the input's last extension
const TEST_FILE_SUFFIX: &str = ".test.js";

/// Output path for `input` inside `out_dir`
///
/// `stories/Button.stories.tsx` becomes `<out_dir>/Button.stories.test.js`.
#[must_use]
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "stories".into(), |s| s.to_string_lossy());
    out_dir.join(format!("{stem}{TEST_FILE_SUFFIX}"))
}

fn title_resolver(path: &Path, config: &ScaffoldConfig) -> AutoTitle {
    AutoTitle::new(path)
        .with_stories_dir(config.stories_dir.clone())
        .with_prefix(config.title_prefix.clone())
}

/// Transform one story source as if it were read from `path`
///
/// # Errors
/// Parse, identity and strategy failures from the engine
pub fn transform_source(
    source: &str,
    path: &Path,
    config: &ScaffoldConfig,
) -> TransformResult<String> {
    let titles = title_resolver(path, config);
    let policy = config.tag_policy();
    let playwright = PlaywrightBodyStrategy::new();
    let smoke = SmokeBodyStrategy::new();
    let test_body: &dyn TestBodyStrategy = match config.strategy {
        StrategyKind::Playwright => &playwright,
        StrategyKind::Smoke => &smoke,
    };

    let mut options = TransformOptions::new(test_body)
        .with_tag_policy(&policy)
        .with_title_override(&titles)
        .with_clear_body(config.clear_body)
        .with_insert_test_if_empty(config.insert_test_if_empty);
    if config.page_setup {
        options = options.with_module_setup(&PageSetupStrategy);
    }

    DocumentComposer::new(options)
        .with_parser(CsfParser::for_path(path))
        .transform(source)
}

/// Transform files, writing into `out_dir`, next to each input, or to stdout
///
/// Output goes to stdout only for a single input with no `out_dir`.
///
/// # Errors
/// Fails on the first file that cannot be read, transformed or written
pub fn transform_files(
    files: &[PathBuf],
    out_dir: Option<&Path>,
    config: &ScaffoldConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    }

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read '{}'", file.display()))?;
        let output = transform_source(&source, file, config)
            .with_context(|| format!("failed to transform '{}'", file.display()))?;

        if out_dir.is_none() && files.len() == 1 {
            std::io::stdout()
                .lock()
                .write_all(output.as_bytes())
                .context("failed to write to stdout")?;
            return Ok(written);
        }

        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| file.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let target = output_path(file, &dir);
        fs::write(&target, output)
            .with_context(|| format!("failed to write '{}'", target.display()))?;
        tracing::info!(input = %file.display(), output = %target.display(), "wrote test file");
        written.push(target);
    }
    Ok(written)
}

/// Per-story view printed by `inspect`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryReport {
    /// Export key
    pub export_key: String,
    /// Display name
    pub display_name: String,
    /// Story id, absent when the module has no usable title
    pub id: Option<String>,
    /// Tags the policy was evaluated against
    pub effective_tags: Vec<String>,
    /// Policy outcome
    pub classification: Classification,
}

/// Output of `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    /// Inspected file
    pub file: PathBuf,
    /// Parsed module with the resolved title
    pub module: StoryModule,
    /// Classification of every story, in declaration order
    pub stories: Vec<StoryReport>,
}

/// Parse `source` and classify each story
///
/// # Errors
/// Fails if the source is not a story module
pub fn inspect_source(
    source: &str,
    path: &Path,
    config: &ScaffoldConfig,
) -> anyhow::Result<Inspection> {
    let titles = title_resolver(path, config);
    let module = CsfParser::for_path(path)
        .parse(source, &titles)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    let policy = config.tag_policy();
    let identity = CsfIdentity;

    let stories = module
        .stories()
        .iter()
        .map(|story| {
            let display_name = identity.display_name(story.export_key());
            let id = module
                .title()
                .and_then(|title| identity.story_id(title, &display_name).ok());
            let tags = story.effective_tags(&module);
            StoryReport {
                export_key: story.export_key().to_string(),
                display_name,
                id,
                effective_tags: tags.iter().cloned().collect(),
                classification: policy.classify(tags),
            }
        })
        .collect();

    Ok(Inspection {
        file: path.to_path_buf(),
        module,
        stories,
    })
}

/// Print the inspection of `file` as pretty JSON on stdout
///
/// # Errors
/// Fails if the file cannot be read or parsed
pub fn inspect_file(file: &Path, config: &ScaffoldConfig) -> anyhow::Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let inspection = inspect_source(&source, file, config)?;
    let json = serde_json::to_string_pretty(&inspection).context("failed to encode inspection")?;
    writeln!(std::io::stdout().lock(), "{json}").context("failed to write to stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "export default { title: 'foo/bar', component: Button };
export const A = { tags: ['skip-test'] };
export const B = { play: async () => {} };
";

    #[test]
    fn output_path_keeps_stories_stem() {
        assert_eq!(
            output_path(Path::new("stories/Button.stories.tsx"), Path::new("out")),
            PathBuf::from("out/Button.stories.test.js")
        );
    }

    #[test]
    fn transform_uses_prefix_and_strategy() {
        let config = ScaffoldConfig {
            title_prefix: Some("Example".into()),
            skip_tags: vec!["skip-test".into()],
            strategy: StrategyKind::Smoke,
            clear_body: true,
            ..ScaffoldConfig::default()
        };
        let path = Path::new("stories/Header.stories.js");
        let output = transform_source(HEADER, path, &config).unwrap();
        let expected = r#"if (!require.main) {
  describe("Example/foo/bar", () => {
    describe("A", () => {
      it.skip("smoke-test", async () => {
        await __test("example-foo-bar--a");
      });
    });
    describe("B", () => {
      it("play-test", async () => {
        await __test("example-foo-bar--b");
      });
    });
  });
}
"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn page_setup_adds_before_each() {
        let config = ScaffoldConfig {
            page_setup: true,
            ..ScaffoldConfig::default()
        };
        let output = transform_source(HEADER, Path::new("Header.stories.js"), &config).unwrap();
        let setup = "    beforeEach(async () => {\n      await globalThis.__sbSetupPage(";
        assert!(output.contains(setup));
        assert!(output.contains("const testFn = async () => {"));
    }

    #[test]
    fn inspect_reports_classification() {
        let config = ScaffoldConfig {
            exclude_tags: vec!["skip-test".into()],
            ..ScaffoldConfig::default()
        };
        let inspection = inspect_source(HEADER, Path::new("Header.stories.js"), &config).unwrap();
        assert_eq!(inspection.module.title(), Some("foo/bar"));
        assert_eq!(inspection.stories[0].classification, Classification::Excluded);
        assert_eq!(
            inspection.stories[1].classification,
            Classification::Included { skip: false }
        );
        assert_eq!(inspection.stories[1].id.as_deref(), Some("foo-bar--b"));

        let json = serde_json::to_value(&inspection).unwrap();
        assert_eq!(json["stories"][0]["exportKey"], "A");
        assert_eq!(json["stories"][0]["effectiveTags"][0], "skip-test");
    }
}
