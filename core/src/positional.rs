//! Positional-token consumption strategies and the subcommand contract.

use std::collections::BTreeMap;

use crate::error::ParseError;

pub(crate) type FieldFn<A, V> = Box<dyn Fn(&mut A) -> &mut V + Send + Sync>;
pub(crate) type SubcommandFn<A> =
    Box<dyn Fn(&str, Vec<String>, &mut A) -> Result<(), ParseError> + Send + Sync>;

/// How bare (non-option) tokens are consumed.
///
/// Exactly one mode is active at parse time; the last mode-setter call
/// wins.
pub(crate) enum PositionalMode<A> {
    /// Bare tokens are rejected.
    None,
    /// The first bare token fills a single `String` field; a second one is
    /// an error.
    Single(FieldFn<A, String>),
    /// Every bare token is appended to a sequence field in encounter
    /// order.
    Multi(FieldFn<A, Vec<String>>),
    /// The first bare token selects a command and the rest of the
    /// sequence is handed to the bound handler verbatim, unparsed.
    Subcommand {
        handler: SubcommandFn<A>,
        catalog: BTreeMap<String, String>,
    },
}

/// A closed, enumerable set of named commands.
///
/// Implementors expose the full case list plus a stable name and one-line
/// description per case. The provided methods derive name lookup and the
/// sorted name→description catalog used for coercion and help rendering.
///
/// # Examples
///
/// ```
/// use declarg_core::Subcommand;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Action {
///     #[default]
///     Build,
///     Test,
/// }
///
/// impl Subcommand for Action {
///     fn variants() -> Vec<Self> {
///         vec![Action::Build, Action::Test]
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Action::Build => "build",
///             Action::Test => "test",
///         }
///     }
///
///     fn description(&self) -> &'static str {
///         match self {
///             Action::Build => "compile the project",
///             Action::Test => "run the test suite",
///         }
///     }
/// }
///
/// assert_eq!(Action::from_name("test"), Some(Action::Test));
/// assert_eq!(Action::from_name("deploy"), None);
/// assert_eq!(Action::catalog()["build"], "compile the project");
/// ```
pub trait Subcommand: Sized {
    /// Every command case, in declaration order.
    fn variants() -> Vec<Self>;

    /// Stable name the command is selected by.
    fn name(&self) -> &'static str;

    /// One-line human-readable description.
    fn description(&self) -> &'static str;

    /// Resolves a command-name token by exact, case-sensitive match.
    fn from_name(token: &str) -> Option<Self> {
        Self::variants().into_iter().find(|case| case.name() == token)
    }

    /// Name → description table over the full case list, sorted by name.
    fn catalog() -> BTreeMap<String, String> {
        Self::variants()
            .into_iter()
            .map(|case| (case.name().to_string(), case.description().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Verb {
        Fetch,
        Push,
        Sync,
    }

    impl Subcommand for Verb {
        fn variants() -> Vec<Self> {
            vec![Verb::Sync, Verb::Fetch, Verb::Push]
        }

        fn name(&self) -> &'static str {
            match self {
                Verb::Fetch => "fetch",
                Verb::Push => "push",
                Verb::Sync => "sync",
            }
        }

        fn description(&self) -> &'static str {
            match self {
                Verb::Fetch => "download remote state",
                Verb::Push => "upload local state",
                Verb::Sync => "fetch then push",
            }
        }
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(Verb::from_name("push"), Some(Verb::Push));
        assert_eq!(Verb::from_name("Push"), None);
        assert_eq!(Verb::from_name("pushh"), None);
    }

    #[test]
    fn test_catalog_is_sorted_regardless_of_declaration_order() {
        let catalog = Verb::catalog();
        let names: Vec<&str> = catalog.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["fetch", "push", "sync"]);
        assert_eq!(catalog["sync"], "fetch then push");
    }
}
