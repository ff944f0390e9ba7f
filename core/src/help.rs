//! Help text rendering from registered parser state.
//!
//! Rendering is a pure function of the declarations: it never parses,
//! never mutates, and produces identical text for identical state. The
//! engine only builds the text content; writing it to a stream is the
//! caller's concern.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use crate::option::OptionSpec;
use crate::parser::Parser;
use crate::positional::PositionalMode;

/// Fixed column where descriptions begin. Name cells that would overflow
/// it push their description to the next line instead of truncating.
const DESCRIPTION_COLUMN: usize = 24;

const INDENT: &str = "  ";

impl<A: Default + 'static> Parser<A> {
    /// Renders the full help text into any [`fmt::Write`] sink.
    ///
    /// Layout: overview, synthesized usage line, one alphabetically
    /// sorted option block per category (uncategorized first, then
    /// categories by name), and, in subcommand mode, a sorted command
    /// listing.
    pub fn write_help<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "OVERVIEW: {}", self.overview)?;
        writeln!(out)?;
        writeln!(out, "USAGE: {}", self.usage_line())?;
        writeln!(out)?;

        let mut uncategorized: Vec<&OptionSpec<A>> = Vec::new();
        let mut categories: BTreeMap<&str, Vec<&OptionSpec<A>>> = BTreeMap::new();
        for spec in &self.options {
            match spec.opt.category.as_deref() {
                None => uncategorized.push(spec),
                Some(category) => categories.entry(category).or_default().push(spec),
            }
        }

        if !uncategorized.is_empty() || self.options.is_empty() {
            write_option_block(out, "OPTIONS:", &mut uncategorized)?;
        }
        for (category, mut specs) in categories {
            write_option_block(out, &format!("{category} OPTIONS:"), &mut specs)?;
        }

        if let PositionalMode::Subcommand { catalog, .. } = &self.positional {
            writeln!(out, "SUBCOMMANDS:")?;
            for (name, description) in catalog {
                write_entry(out, name, description)?;
            }
        }
        Ok(())
    }

    /// Convenience form of [`write_help`](Parser::write_help) returning
    /// the rendered text.
    pub fn help_text(&self) -> String {
        let mut text = String::new();
        self.write_help(&mut text)
            .expect("formatting into a String cannot fail");
        text
    }

    fn usage_line(&self) -> String {
        let mut usage = self.tool_name.clone();
        if !self.options.is_empty() {
            usage.push_str(" [OPTION]");
        }
        match &self.positional {
            PositionalMode::None => {}
            PositionalMode::Single(_) => {
                usage.push(' ');
                usage.push_str(&self.input_name);
            }
            PositionalMode::Multi(_) => {
                usage.push_str(" [");
                usage.push_str(&self.input_name);
                usage.push(']');
            }
            PositionalMode::Subcommand { .. } => usage.push_str(" COMMAND"),
        }
        usage
    }
}

fn write_option_block<A, W: Write>(
    out: &mut W,
    header: &str,
    specs: &mut Vec<&OptionSpec<A>>,
) -> fmt::Result {
    specs.sort_by(|a, b| a.opt.name.cmp(&b.opt.name));
    writeln!(out, "{header}")?;
    for spec in specs.iter() {
        let name_cell = match spec.opt.alias.as_deref() {
            Some(alias) => format!("{}, {alias}", spec.opt.name),
            None => spec.opt.name.clone(),
        };
        let description = match spec.default_display.as_deref() {
            Some(default) => format!("{} [default: {default}]", spec.opt.description),
            None => spec.opt.description.clone(),
        };
        write_entry(out, &name_cell, &description)?;
    }
    writeln!(out)
}

fn write_entry<W: Write>(out: &mut W, name_cell: &str, description: &str) -> fmt::Result {
    write!(out, "{INDENT}{name_cell}")?;
    let mut padding = DESCRIPTION_COLUMN.saturating_sub(name_cell.chars().count());
    if padding <= 1 {
        writeln!(out)?;
        write!(out, "{INDENT}")?;
        padding = DESCRIPTION_COLUMN;
    }
    write!(out, "{:width$}", "", width = padding)?;
    writeln!(out, "{description}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::Opt;

    #[derive(Debug, Default)]
    struct Args {
        configuration: String,
        verbose: bool,
        inputs: Vec<String>,
    }

    fn configured() -> Parser<Args> {
        let mut parser = Parser::<Args>::new("tool", "Does tool things.");
        parser.add_value_option(
            Opt::new("-c", "build configuration").with_alias("--configuration"),
            |args| &mut args.configuration,
        );
        parser.add_flag_option(
            Opt::new("-v", "verbose output").with_category("Logging"),
            true,
            |args| &mut args.verbose,
        );
        parser.set_multi_positional(|args| &mut args.inputs);
        parser
    }

    #[test]
    fn test_usage_line_reflects_options_and_mode() {
        let parser = configured();
        assert_eq!(parser.usage_line(), "tool [OPTION] [INPUT]");

        let bare = Parser::<Args>::new("tool", "nothing");
        assert_eq!(bare.usage_line(), "tool");

        let mut single = Parser::<Args>::new("tool", "single")
            .with_input_name("FILE");
        single.set_single_positional(|args| &mut args.configuration);
        assert_eq!(single.usage_line(), "tool FILE");
    }

    #[test]
    fn test_blocks_are_grouped_and_sorted() {
        let text = configured().help_text();

        let options_at = text.find("OPTIONS:\n").unwrap();
        let logging_at = text.find("Logging OPTIONS:\n").unwrap();
        assert!(options_at < logging_at, "uncategorized block renders first");
        assert!(text.contains("-c, --configuration"));
        assert!(text.contains("verbose output"));
    }

    #[test]
    fn test_overflowing_name_cell_wraps_description() {
        let mut parser = Parser::<Args>::new("tool", "wrap check");
        parser.add_value_option(
            Opt::new("--a-very-long-option-name", "short words").with_alias("--with-long-alias"),
            |args| &mut args.configuration,
        );

        let text = parser.help_text();
        let line = "  --a-very-long-option-name, --with-long-alias\n";
        assert!(text.contains(line), "name cell gets its own line");
        let wrapped = format!("{INDENT}{:width$}short words", "", width = DESCRIPTION_COLUMN);
        assert!(text.contains(&wrapped), "description wraps to the full offset");
    }

    #[test]
    fn test_default_annotation_renders_only_when_requested() {
        #[derive(Debug)]
        struct Seeded {
            level: u32,
            silent: u32,
        }
        impl Default for Seeded {
            fn default() -> Self {
                Self { level: 2, silent: 7 }
            }
        }

        let mut parser = Parser::<Seeded>::new("tool", "defaults");
        parser.add_value_option(Opt::new("-l", "level").show_default(), |args| &mut args.level);
        parser.add_value_option(Opt::new("-s", "silent"), |args| &mut args.silent);

        let text = parser.help_text();
        assert!(text.contains("level [default: 2]"));
        assert!(!text.contains("silent [default"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let parser = configured();
        assert_eq!(parser.help_text(), parser.help_text());
    }
}
