//! File-level transform and config discovery

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use scaffold_cli::{transform_files, ConfigError, ScaffoldConfig, StrategyKind};
use tempfile::TempDir;

const BUTTON: &str = "export default { component: Button };
export const Primary = {};
export const Secondary = { tags: ['visual'] };
";

const HEADER: &str = "export default { title: 'Header', tags: ['visual'] };
export const LoggedIn = {};
";

fn write(dir: &TempDir, relative: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn writes_test_files_into_out_dir() {
    let dir = TempDir::new().unwrap();
    let button = write(&dir, "stories/Button/Button.stories.tsx", BUTTON);
    let header = write(&dir, "stories/Header.stories.js", HEADER);
    let out = dir.path().join("generated");

    let config = ScaffoldConfig {
        stories_dir: Some(dir.path().join("stories")),
        title_prefix: Some("Example".into()),
        strategy: StrategyKind::Smoke,
        clear_body: true,
        ..ScaffoldConfig::default()
    };
    let written = transform_files(&[button, header], Some(&out), &config).unwrap();

    assert_eq!(
        written,
        vec![out.join("Button.stories.test.js"), out.join("Header.stories.test.js")]
    );
    let button_test = fs::read_to_string(&written[0]).unwrap();
    assert!(button_test.contains("describe(\"Example/Button\", () => {"));
    assert!(button_test.contains("await __test(\"example-button--secondary\");"));
    let header_test = fs::read_to_string(&written[1]).unwrap();
    assert!(header_test.contains("describe(\"Example/Header\", () => {"));
}

#[test]
fn excluded_file_without_placeholder_is_copied() {
    let dir = TempDir::new().unwrap();
    let header = write(&dir, "Header.stories.js", HEADER);
    let other = write(&dir, "Other.stories.js", BUTTON);

    let config = ScaffoldConfig {
        exclude_tags: vec!["visual".into()],
        ..ScaffoldConfig::default()
    };
    let written = transform_files(&[header, other], None, &config).unwrap();

    assert_eq!(written[0], dir.path().join("Header.stories.test.js"));
    assert_eq!(fs::read_to_string(&written[0]).unwrap(), HEADER);
}

#[test]
fn parse_failure_names_the_file() {
    let dir = TempDir::new().unwrap();
    let broken = write(&dir, "Broken.stories.js", "export const A = {};\n");
    let other = write(&dir, "Header.stories.js", HEADER);

    let err = transform_files(&[broken, other], Some(dir.path()), &ScaffoldConfig::default())
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Broken.stories.js"));
    assert!(message.contains("missing default export"));
}

#[test]
fn discovers_config_in_directory() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        ScaffoldConfig::discover(None, dir.path()).unwrap(),
        ScaffoldConfig::default()
    );

    write(&dir, "storyscaffold.toml", "skip_tags = [\"flaky\"]\nstrategy = \"smoke\"\n");
    let config = ScaffoldConfig::discover(None, dir.path()).unwrap();
    assert_eq!(config.skip_tags, vec!["flaky"]);
    assert_eq!(config.strategy, StrategyKind::Smoke);
}

#[test]
fn explicit_config_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        ScaffoldConfig::discover(Some(&missing), dir.path()),
        Err(ConfigError::Read { .. })
    ));

    let bad = write(&dir, "bad.toml", "strategy = \"jest\"\n");
    assert!(matches!(
        ScaffoldConfig::discover(Some(&bad), dir.path()),
        Err(ConfigError::Parse { .. })
    ));
}
