//! Option declarations, registered records, and the per-field metadata
//! wrapper.

use std::ops::{Deref, DerefMut};

use crate::error::{ParseError, RegistryViolation};

/// Marker every option name and alias must start with.
pub(crate) const OPTION_PREFIX: char = '-';

/// Declaration metadata for a single option.
///
/// Built with [`Opt::new`] plus chained builder methods, then handed to one
/// of the `Parser::add_*` registration calls. Tokens are matched against
/// the name and alias by exact string identity; there is no `--opt=value`
/// syntax and no short-option clustering.
///
/// # Examples
///
/// ```
/// use declarg_core::Opt;
///
/// let opt = Opt::new("-c", "build configuration")
///     .with_alias("--configuration")
///     .with_category("Build")
///     .show_default();
/// assert_eq!(opt.name, "-c");
/// assert_eq!(opt.alias.as_deref(), Some("--configuration"));
/// assert!(opt.matches("--configuration"));
/// assert!(!opt.matches("--Configuration"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt {
    /// Primary name, e.g. `-c` or `--configuration`.
    pub name: String,
    /// Optional second name matched identically to the primary.
    pub alias: Option<String>,
    /// One-line description shown in help output.
    pub description: String,
    /// Help category; uncategorized options render first.
    pub category: Option<String>,
    /// Whether help output shows the field's pre-parse default value.
    pub show_default: bool,
}

impl Opt {
    /// Creates a declaration with the given primary name and description.
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            description: description.to_string(),
            category: None,
            show_default: false,
        }
    }

    /// Adds an alias matched exactly like the primary name.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Assigns the option to a help category.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Shows the bound field's default value in help output.
    pub fn show_default(mut self) -> Self {
        self.show_default = true;
        self
    }

    /// Checks whether a token is this option's name or alias.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.alias.as_deref() == Some(token)
    }

    /// Validates the name/alias invariants: non-empty, `-`-prefixed, and
    /// the alias distinct from the name.
    pub(crate) fn validate(&self) -> Result<(), RegistryViolation> {
        Self::validate_name(&self.name)?;
        if let Some(alias) = self.alias.as_deref() {
            Self::validate_name(alias)?;
            if alias == self.name {
                return Err(RegistryViolation::DuplicateName(alias.to_string()));
            }
        }
        Ok(())
    }

    fn validate_name(name: &str) -> Result<(), RegistryViolation> {
        if name.is_empty() {
            return Err(RegistryViolation::EmptyName);
        }
        if !name.starts_with(OPTION_PREFIX) {
            return Err(RegistryViolation::MissingPrefix(name.to_string()));
        }
        Ok(())
    }
}

pub(crate) type ApplyFn<A> = Box<dyn Fn(&str, &mut A) -> Result<(), ParseError> + Send + Sync>;

/// A registered option: declaration metadata, value arity, the default
/// display text captured at registration time, and the bound apply handler
/// invoked during parsing.
pub(crate) struct OptionSpec<A> {
    pub(crate) opt: Opt,
    pub(crate) requires_value: bool,
    pub(crate) default_display: Option<String>,
    pub(crate) apply: ApplyFn<A>,
}

/// A result-type field that carries its own option declaration.
///
/// [`Parser::add_declared`](crate::Parser::add_declared) reads the
/// declaration and the default value out of the template (`Default`)
/// instance of the result type, so an option's metadata can live next to
/// the field it configures instead of at the registration site. The
/// wrapper dereferences to the inner value.
///
/// # Examples
///
/// ```
/// use declarg_core::{Declared, Opt, Parser};
///
/// #[derive(Debug)]
/// struct Args {
///     jobs: Declared<u32>,
/// }
///
/// impl Default for Args {
///     fn default() -> Self {
///         Self {
///             jobs: Declared::new(
///                 Opt::new("-j", "parallel jobs").with_alias("--jobs").show_default(),
///                 1,
///             ),
///         }
///     }
/// }
///
/// let mut parser = Parser::<Args>::new("tool", "demo");
/// parser.add_declared(|args| &mut args.jobs);
///
/// let args = parser.parse(["--jobs", "8"]).unwrap();
/// assert_eq!(*args.jobs, 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Declared<V> {
    /// The option declaration read out of the template instance.
    pub opt: Opt,
    /// The current (initially default) field value.
    pub value: V,
}

impl<V> Declared<V> {
    /// Binds a declaration to a default value.
    pub fn new(opt: Opt, value: V) -> Self {
        Self { opt, value }
    }
}

impl<V> Deref for Declared<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

impl<V> DerefMut for Declared<V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.value
    }
}
