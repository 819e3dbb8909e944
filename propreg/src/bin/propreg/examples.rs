use std::fmt::Write;

use crate::commands::{create, init, list, show, suggest, update, validate};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> [CommandExample; 7] {
    [
        ("init", init::EXAMPLES),
        ("list", list::EXAMPLES),
        ("suggest", suggest::EXAMPLES),
        ("show", show::EXAMPLES),
        ("create", create::EXAMPLES),
        ("update", update::EXAMPLES),
        ("validate", validate::EXAMPLES),
    ]
    .map(|(name, groups)| CommandExample { name, groups })
}

/// Plain-text `Examples:` block for `after_long_help`.
pub fn render(groups: &[ExampleGroup]) -> String {
    let mut text = String::from("Examples:");
    for group in groups {
        let _ = write!(text, "\n  {}:", group.title);
        for command in group.commands {
            let _ = write!(text, "\n    $ {command}");
        }
    }
    text
}
