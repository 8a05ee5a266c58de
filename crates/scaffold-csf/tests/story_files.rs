//! Parsing realistic story files through the public API

use pretty_assertions::assert_eq;
use scaffold_csf::{CsfParser, IdentityTitle, ParseError, SourceDialect, StoryModule, StoryRecord};
use std::path::Path;

const BUTTON_TSX: &str = r#"import type { Meta, StoryObj } from '@storybook/react';
import { fn, expect, userEvent, within } from '@storybook/test';
import { Button } from './Button';

const meta = {
  title: 'Example/Button',
  component: Button,
  parameters: { layout: 'centered' },
  tags: ['autodocs'],
  argTypes: { backgroundColor: { control: 'color' } },
  args: { onClick: fn() },
} satisfies Meta<typeof Button>;

export default meta;
type Story = StoryObj<typeof meta>;

export const Primary: Story = {
  args: { primary: true, label: 'Button' },
};

export const Secondary: Story = {
  args: { label: 'Button' },
  tags: ['!autodocs', 'visual'],
};

export const Clicked: Story = {
  render: (args) => <Button {...args} />,
  async play({ canvasElement }) {
    const canvas = within(canvasElement);
    await userEvent.click(canvas.getByRole('button'));
    await expect(canvas.getByRole('button')).toBeInTheDocument();
  },
};

export const __namedExportsOrder = ['Primary', 'Secondary', 'Clicked'];
"#;

const HEADER_TS: &str = r#"import { Header } from './Header';

export default {
  title: `Example/Header`,
  excludeStories: /.*Data$/,
};

export const mockData = { user: { name: 'Jane Doe' } };

export const LoggedIn = {
  args: mockData,
};

export const LoggedOut = {} as const;
"#;

fn keys(module: &StoryModule) -> Vec<&str> {
    module.stories().iter().map(StoryRecord::export_key).collect()
}

#[test]
fn tsx_meta_binding_with_render_and_play() {
    let module = CsfParser::for_path(Path::new("src/Button.stories.tsx"))
        .parse(BUTTON_TSX, &IdentityTitle)
        .unwrap();

    assert_eq!(module.title(), Some("Example/Button"));
    assert_eq!(keys(&module), vec!["Primary", "Secondary", "Clicked"]);
    assert!(module.default_tags().contains("autodocs"));

    let secondary = &module.stories()[1];
    let own: Vec<&str> = secondary.tags().iter().map(String::as_str).collect();
    assert_eq!(own, vec!["!autodocs", "visual"]);
    assert!(module.stories()[2].has_own_play_function());
    assert!(!module.stories()[0].has_own_play_function());
}

#[test]
fn typescript_template_title_and_exclude_regex() {
    let parser = CsfParser::for_path(Path::new("stories/Header.stories.ts"));
    assert_eq!(parser.dialect(), SourceDialect::TypeScript);

    let module = parser.parse(HEADER_TS, &IdentityTitle).unwrap();
    assert_eq!(module.title(), Some("Example/Header"));
    assert_eq!(keys(&module), vec!["LoggedIn", "LoggedOut"]);
}

#[test]
fn resolver_sees_declared_title() {
    let module = CsfParser::new()
        .parse(BUTTON_TSX, &|title: Option<&str>| {
            title.map(|t| t.replace("Example/", "Kit/"))
        })
        .unwrap();
    assert_eq!(module.title(), Some("Kit/Button"));
}

#[test]
fn broken_source_is_a_syntax_error() {
    let err = CsfParser::new()
        .parse("export default { title: 'x' ;\n", &IdentityTitle)
        .unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}
