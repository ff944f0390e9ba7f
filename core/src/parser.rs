//! The parser engine: option registry, positional-mode configuration, and
//! the single-pass token dispatch loop.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::coerce::ArgValue;
use crate::error::{ParseError, RegistryViolation};
use crate::option::{Declared, Opt, OptionSpec, OPTION_PREFIX};
use crate::positional::{PositionalMode, Subcommand, SubcommandFn};

/// A configured argument parser producing values of `A`.
///
/// `A` is the typed configuration being populated: it must be
/// default-constructible, and every registration binds an option or
/// positional slot to one of its fields through a closure-captured
/// accessor. The engine is mutated only by registration calls;
/// [`parse`](Parser::parse) takes `&self`, holds no per-parse state, and is
/// safe to call repeatedly or concurrently on the same configured engine.
///
/// # Examples
///
/// ```
/// use declarg_core::{Opt, Parser};
///
/// #[derive(Debug, Default)]
/// struct Args {
///     configuration: String,
///     verbose: bool,
///     inputs: Vec<String>,
/// }
///
/// let mut parser = Parser::<Args>::new("builder", "Builds things.");
/// parser.add_value_option(
///     Opt::new("-c", "build configuration").with_alias("--configuration"),
///     |args| &mut args.configuration,
/// );
/// parser.add_flag_option(Opt::new("-v", "verbose output"), true, |args| &mut args.verbose);
/// parser.set_multi_positional(|args| &mut args.inputs);
///
/// let args = parser.parse(["-c", "release", "-v", "src/main.rs"]).unwrap();
/// assert_eq!(args.configuration, "release");
/// assert!(args.verbose);
/// assert_eq!(args.inputs, vec!["src/main.rs"]);
/// ```
pub struct Parser<A> {
    pub(crate) tool_name: String,
    pub(crate) overview: String,
    pub(crate) input_name: String,
    pub(crate) options: Vec<OptionSpec<A>>,
    pub(crate) positional: PositionalMode<A>,
}

impl<A: Default + 'static> Parser<A> {
    /// Creates an engine with no options and no positional mode.
    ///
    /// `tool_name` and `overview` feed the help header; the positional
    /// input's display name defaults to `INPUT` (see
    /// [`with_input_name`](Parser::with_input_name)).
    pub fn new(tool_name: &str, overview: &str) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            overview: overview.to_string(),
            input_name: "INPUT".to_string(),
            options: Vec::new(),
            positional: PositionalMode::None,
        }
    }

    /// Sets the display name used for the positional input in usage lines.
    pub fn with_input_name(mut self, input_name: &str) -> Self {
        self.input_name = input_name.to_string();
        self
    }

    /// Registers an option with a raw apply handler.
    ///
    /// Value-requiring options receive the *next* token as `token`; flag
    /// options receive the option token itself. This is the primitive the
    /// typed convenience forms build on.
    ///
    /// # Panics
    ///
    /// Panics if the name or alias is empty, lacks the `-` prefix, or
    /// collides with an existing registration. These are programmer
    /// errors, distinct from parse-time failures.
    pub fn add_option(
        &mut self,
        opt: Opt,
        requires_value: bool,
        handler: impl Fn(&str, &mut A) -> Result<(), ParseError> + Send + Sync + 'static,
    ) {
        self.register(OptionSpec {
            opt,
            requires_value,
            default_display: None,
            apply: Box::new(handler),
        });
    }

    /// Registers a value option: coerces the value token and assigns it
    /// into the accessed field.
    pub fn add_value_option<V>(
        &mut self,
        opt: Opt,
        field: impl Fn(&mut A) -> &mut V + Send + Sync + 'static,
    ) where
        V: ArgValue,
    {
        let default_display = opt.show_default.then(|| {
            let mut template = A::default();
            field(&mut template).to_token()
        });
        self.register(OptionSpec {
            opt,
            requires_value: true,
            default_display,
            apply: Box::new(move |token, result| {
                *field(result) = V::from_token(token)?;
                Ok(())
            }),
        });
    }

    /// Registers a repeatable value option: each occurrence coerces its
    /// value token and appends it to the accessed sequence field.
    pub fn add_array_value_option<V>(
        &mut self,
        opt: Opt,
        field: impl Fn(&mut A) -> &mut Vec<V> + Send + Sync + 'static,
    ) where
        V: ArgValue,
    {
        self.register(OptionSpec {
            opt,
            requires_value: true,
            default_display: None,
            apply: Box::new(move |token, result| {
                field(result).push(V::from_token(token)?);
                Ok(())
            }),
        });
    }

    /// Registers an optional-value option: the value token coerces through
    /// the wrapped type and is stored as `Some`.
    pub fn add_optional_value_option<V>(
        &mut self,
        opt: Opt,
        field: impl Fn(&mut A) -> &mut Option<V> + Send + Sync + 'static,
    ) where
        V: ArgValue,
    {
        let default_display = opt.show_default.then(|| {
            let mut template = A::default();
            field(&mut template).to_token()
        });
        self.register(OptionSpec {
            opt,
            requires_value: true,
            default_display,
            apply: Box::new(move |token, result| {
                *field(result) = Option::<V>::from_token(token)?;
                Ok(())
            }),
        });
    }

    /// Registers a flag: each occurrence unconditionally assigns
    /// `set_value` into the accessed boolean field. Register the same
    /// field twice with opposite `set_value`s for a `--flag`/`--no-flag`
    /// pair; occurrences apply left to right, so the last one wins.
    pub fn add_flag_option(
        &mut self,
        opt: Opt,
        set_value: bool,
        field: impl Fn(&mut A) -> &mut bool + Send + Sync + 'static,
    ) {
        let default_display = opt.show_default.then(|| {
            let mut template = A::default();
            field(&mut template).to_token()
        });
        self.register(OptionSpec {
            opt,
            requires_value: false,
            default_display,
            apply: Box::new(move |_, result| {
                *field(result) = set_value;
                Ok(())
            }),
        });
    }

    /// Registers a value option declared on the field itself.
    ///
    /// The [`Declared`] wrapper's metadata and default value are read once
    /// from a template (`A::default()`) instance; parsing assigns into the
    /// wrapper's inner value.
    pub fn add_declared<V>(
        &mut self,
        field: impl Fn(&mut A) -> &mut Declared<V> + Send + Sync + 'static,
    ) where
        V: ArgValue,
    {
        let mut template = A::default();
        let declared = field(&mut template);
        let opt = declared.opt.clone();
        let default_display = opt.show_default.then(|| declared.value.to_token());
        self.register(OptionSpec {
            opt,
            requires_value: true,
            default_display,
            apply: Box::new(move |token, result| {
                field(result).value = V::from_token(token)?;
                Ok(())
            }),
        });
    }

    /// Accepts exactly one bare token, written into the accessed `String`
    /// field. A second bare token fails with
    /// [`ExtraPositionalInput`](ParseError::ExtraPositionalInput).
    pub fn set_single_positional(
        &mut self,
        field: impl Fn(&mut A) -> &mut String + Send + Sync + 'static,
    ) {
        self.positional = PositionalMode::Single(Box::new(field));
    }

    /// Appends every bare token, in encounter order, to the accessed
    /// sequence field.
    pub fn set_multi_positional(
        &mut self,
        field: impl Fn(&mut A) -> &mut Vec<String> + Send + Sync + 'static,
    ) {
        self.positional = PositionalMode::Multi(Box::new(field));
    }

    /// Interprets the first bare token as a command name and delegates:
    /// the command field is set and all remaining tokens are collected
    /// verbatim, unparsed, into the accessed arguments field so a
    /// sub-parser can re-tokenize them independently.
    pub fn set_subcommand<C>(
        &mut self,
        command: impl Fn(&mut A) -> &mut C + Send + Sync + 'static,
        args: impl Fn(&mut A) -> &mut Vec<String> + Send + Sync + 'static,
    ) where
        C: Subcommand + 'static,
    {
        let handler: SubcommandFn<A> = Box::new(move |name, trailing, result| {
            let Some(case) = C::from_name(name) else {
                return Err(ParseError::InvalidSubcommand(name.to_string()));
            };
            *command(result) = case;
            *args(result) = trailing;
            Ok(())
        });
        self.positional = PositionalMode::Subcommand {
            handler,
            catalog: C::catalog(),
        };
    }

    /// Like [`set_subcommand`](Parser::set_subcommand), but the command
    /// takes no further input at this level: any remaining tokens fail
    /// with
    /// [`UnexpectedSubcommandArguments`](ParseError::UnexpectedSubcommandArguments).
    pub fn set_subcommand_strict<C>(
        &mut self,
        command: impl Fn(&mut A) -> &mut C + Send + Sync + 'static,
    ) where
        C: Subcommand + 'static,
    {
        let handler: SubcommandFn<A> = Box::new(move |name, trailing, result| {
            let Some(case) = C::from_name(name) else {
                return Err(ParseError::InvalidSubcommand(name.to_string()));
            };
            if !trailing.is_empty() {
                return Err(ParseError::UnexpectedSubcommandArguments(trailing));
            }
            *command(result) = case;
            Ok(())
        });
        self.positional = PositionalMode::Subcommand {
            handler,
            catalog: C::catalog(),
        };
    }

    /// Parses an ordered token sequence into a fresh `A`.
    ///
    /// A single forward pass, no backtracking: tokens matching a
    /// registered name or alias dispatch to their option (value options
    /// consume the next token), other `-`-prefixed tokens are unknown, and
    /// bare tokens go to the active positional mode. The first error
    /// aborts the scan.
    pub fn parse<I>(&self, tokens: I) -> Result<A, ParseError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let lookup = self.lookup();
        let mut result = A::default();
        let mut single_consumed = false;
        let mut tokens = tokens.into_iter().map(Into::into);

        while let Some(token) = tokens.next() {
            if let Some(&index) = lookup.get(token.as_str()) {
                let option = &self.options[index];
                if option.requires_value {
                    let Some(value) = tokens.next() else {
                        return Err(ParseError::NoRequiredValue(token));
                    };
                    trace!(option = %option.opt.name, value = %value, "Applying option value");
                    (option.apply)(&value, &mut result)?;
                } else {
                    trace!(option = %option.opt.name, "Applying flag");
                    (option.apply)(&token, &mut result)?;
                }
            } else if token.starts_with(OPTION_PREFIX) {
                return Err(ParseError::UnknownOption(token));
            } else {
                match &self.positional {
                    PositionalMode::None => {
                        return Err(ParseError::UnallowedPositionalInput(token));
                    }
                    PositionalMode::Single(field) => {
                        if single_consumed {
                            return Err(ParseError::ExtraPositionalInput(token));
                        }
                        trace!(input = %token, "Consuming single positional input");
                        *field(&mut result) = token;
                        single_consumed = true;
                    }
                    PositionalMode::Multi(field) => {
                        trace!(input = %token, "Appending positional input");
                        field(&mut result).push(token);
                    }
                    PositionalMode::Subcommand { handler, .. } => {
                        let trailing: Vec<String> = tokens.by_ref().collect();
                        debug!(
                            command = %token,
                            trailing = trailing.len(),
                            "Dispatching subcommand"
                        );
                        handler(&token, trailing, &mut result)?;
                        break;
                    }
                }
            }
        }

        debug!(tool = %self.tool_name, "Token sequence parsed");
        Ok(result)
    }

    /// Builds the name/alias lookup for one parse pass. Registration
    /// already rejects collisions; re-check here in debug builds in case
    /// that invariant ever regresses.
    fn lookup(&self) -> HashMap<&str, usize> {
        let mut lookup = HashMap::new();
        for (index, spec) in self.options.iter().enumerate() {
            let previous = lookup.insert(spec.opt.name.as_str(), index);
            debug_assert!(previous.is_none(), "duplicate option name: {}", spec.opt.name);
            if let Some(alias) = spec.opt.alias.as_deref() {
                let previous = lookup.insert(alias, index);
                debug_assert!(previous.is_none(), "duplicate option name: {alias}");
            }
        }
        lookup
    }

    fn register(&mut self, spec: OptionSpec<A>) {
        if let Err(violation) = self.check_registration(&spec.opt) {
            panic!("invalid option registration: {violation}");
        }
        debug!(
            name = %spec.opt.name,
            alias = ?spec.opt.alias,
            requires_value = spec.requires_value,
            "Registered option"
        );
        self.options.push(spec);
    }

    fn check_registration(&self, opt: &Opt) -> Result<(), RegistryViolation> {
        opt.validate()?;
        for candidate in [Some(opt.name.as_str()), opt.alias.as_deref()]
            .into_iter()
            .flatten()
        {
            if self.options.iter().any(|existing| existing.opt.matches(candidate)) {
                return Err(RegistryViolation::DuplicateName(candidate.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Args {
        level: u32,
        verbose: bool,
        name: String,
    }

    fn parser() -> Parser<Args> {
        Parser::new("tool", "test fixture")
    }

    #[test]
    fn test_default_display_is_captured_from_the_template() {
        #[derive(Debug)]
        struct Seeded {
            level: u32,
        }
        impl Default for Seeded {
            fn default() -> Self {
                Self { level: 3 }
            }
        }

        let mut parser = Parser::<Seeded>::new("tool", "test fixture");
        parser.add_value_option(Opt::new("-l", "level").show_default(), |args| {
            &mut args.level
        });

        assert_eq!(parser.options[0].default_display.as_deref(), Some("3"));

        // Parsing does not disturb the captured display text.
        let parsed = parser.parse(["-l", "9"]).unwrap();
        assert_eq!(parsed.level, 9);
        assert_eq!(parser.options[0].default_display.as_deref(), Some("3"));
    }

    #[test]
    fn test_flag_handler_receives_the_option_token_itself() {
        let mut parser = parser();
        parser.add_option(Opt::new("--mark", "records its own spelling"), false, |token, args| {
            args.name = token.to_string();
            Ok(())
        });

        let args = parser.parse(["--mark"]).unwrap();
        assert_eq!(args.name, "--mark");
    }

    #[test]
    #[should_panic(expected = "duplicate option name: '-v'")]
    fn test_duplicate_name_registration_panics() {
        let mut parser = parser();
        parser.add_flag_option(Opt::new("-v", "verbose"), true, |args| &mut args.verbose);
        parser.add_value_option(Opt::new("-v", "level"), |args| &mut args.level);
    }

    #[test]
    #[should_panic(expected = "duplicate option name: '--verbose'")]
    fn test_alias_collision_with_existing_name_panics() {
        let mut parser = parser();
        parser.add_flag_option(Opt::new("--verbose", "verbose"), true, |args| {
            &mut args.verbose
        });
        parser.add_value_option(Opt::new("-l", "level").with_alias("--verbose"), |args| {
            &mut args.level
        });
    }

    #[test]
    #[should_panic(expected = "must start with '-'")]
    fn test_unprefixed_name_registration_panics() {
        let mut parser = parser();
        parser.add_flag_option(Opt::new("verbose", "verbose"), true, |args| {
            &mut args.verbose
        });
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_exact() {
        let mut parser = parser();
        parser.add_flag_option(Opt::new("-v", "verbose").with_alias("--verbose"), true, |args| {
            &mut args.verbose
        });

        assert!(parser.parse(["-v"]).unwrap().verbose);
        assert!(parser.parse(["--verbose"]).unwrap().verbose);
        assert_eq!(
            parser.parse(["-V"]).unwrap_err(),
            ParseError::UnknownOption("-V".to_string())
        );
        assert_eq!(
            parser.parse(["--verbos"]).unwrap_err(),
            ParseError::UnknownOption("--verbos".to_string())
        );
    }
}
