// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::sync::LazyLock;

use regex::Regex;

static VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(Version:[ \t]*)").expect("valid regex"));
static SETUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^%setup(?:[ \t]|$)").expect("valid regex"));
static SOURCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(Source0?:[ \t]*)").expect("valid regex"));

/// A single-line field of a spec file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `Version:` tag value
    Version,
    /// Arguments of the `%setup` macro, value is the unpacked directory
    Setup,
    /// `Source:` or `Source0:` tag value
    Source,
}

impl Field {
    /// Rewrite `line` (without its terminator) if it declares this field
    fn rewrite(&self, line: &str, value: &str) -> Option<String> {
        match self {
            Field::Version => VERSION
                .captures(line)
                .map(|captures| format!("{}{value}", &captures[1])),
            Field::Setup => SETUP.is_match(line).then(|| format!("%setup -q -n {value}")),
            Field::Source => SOURCE
                .captures(line)
                .map(|captures| format!("{}{value}", &captures[1])),
        }
    }
}

/// Apply update operations to a spec file.
///
/// Each operation rewrites only the first line declaring its field, every
/// other byte of the input is kept as is.
#[derive(Debug, Default)]
pub struct Updater {
    operations: Vec<Operation>,
}

impl Updater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, field: Field, value: impl ToString) {
        self.operations.push(Operation {
            field,
            value: value.to_string(),
        });
    }

    pub fn apply(&self, input: impl ToString) -> String {
        self.operations
            .iter()
            .fold(input.to_string(), |input, operation| operation.apply(&input))
    }
}

#[derive(Debug)]
struct Operation {
    field: Field,
    value: String,
}

impl Operation {
    fn apply(&self, source: &str) -> String {
        let mut output = String::with_capacity(source.len() + self.value.len());
        let mut matched = false;

        for line in source.split_inclusive('\n') {
            if matched {
                output.push_str(line);
                continue;
            }

            let (body, terminator) = split_terminator(line);

            match self.field.rewrite(body, &self.value) {
                Some(rewritten) => {
                    output.push_str(&rewritten);
                    output.push_str(terminator);
                    matched = true;
                }
                None => output.push_str(line),
            }
        }

        output
    }
}

/// Split `line` into its content and `\n` / `\r\n` terminator
fn split_terminator(line: &str) -> (&str, &str) {
    let content = line.strip_suffix('\n').unwrap_or(line);
    let content = content.strip_suffix('\r').unwrap_or(content);

    line.split_at(content.len())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_update() {
        let raw = r#"Name:           foo
Version:        0.9
Release:        0
Source0:        https://example.com/foo-0.9.tar.gz
Source1:        foo.service

%prep
%setup -q -n old-name

%build
Version:        not-a-tag
"#;
        let expected = r#"Name:           foo
Version:        1.0+git.1700000000.abc1234
Release:        0
Source0:        foo-1.2.3.tar.gz
Source1:        foo.service

%prep
%setup -q -n foo-1.2.3

%build
Version:        not-a-tag
"#;

        let mut updater = Updater::new();
        updater.update(Field::Version, "1.0+git.1700000000.abc1234");
        updater.update(Field::Setup, "foo-1.2.3");
        updater.update(Field::Source, "foo-1.2.3.tar.gz");

        let actual = updater.apply(raw);

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_version_line() {
        let mut updater = Updater::new();
        updater.update(Field::Version, "1.0+git.1700000000.abc1234");

        assert_eq!(
            updater.apply("Version:        0.9\n"),
            "Version:        1.0+git.1700000000.abc1234\n"
        );
    }

    #[test]
    fn test_setup_line() {
        let mut updater = Updater::new();
        updater.update(Field::Setup, "foo-1.2.3");

        assert_eq!(updater.apply("%setup -q -n old-name\n"), "%setup -q -n foo-1.2.3\n");
        assert_eq!(updater.apply("%setup\n"), "%setup -q -n foo-1.2.3\n");
        // Other macros sharing the prefix are left alone
        assert_eq!(updater.apply("%setupextra -a\n"), "%setupextra -a\n");
    }

    #[test]
    fn test_source_without_index() {
        let mut updater = Updater::new();
        updater.update(Field::Source, "bar-2.0.tar.xz");

        assert_eq!(
            updater.apply("Source: bar-1.0.tar.xz\nSource0: untouched\n"),
            "Source: bar-2.0.tar.xz\nSource0: untouched\n"
        );
    }

    #[test]
    fn test_preserves_bytes() {
        let raw = "Summary: x\r\nVersion:\t0.1\r\n\r\nno trailing newline";
        let expected = "Summary: x\r\nVersion:\t0.2\r\n\r\nno trailing newline";

        let mut updater = Updater::new();
        updater.update(Field::Version, "0.2");
        // Nothing to match, nothing changes
        updater.update(Field::Setup, "foo");

        assert_eq!(updater.apply(raw), expected);
    }

    #[test]
    fn test_reapply() {
        let mut updater = Updater::new();
        updater.update(Field::Version, "2.0");

        let once = updater.apply("Version: 1.0\n");
        let twice = updater.apply(&once);

        assert_eq!(once, twice);
    }
}
