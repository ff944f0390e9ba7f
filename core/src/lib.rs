//! Declarative command-line argument parsing engine.
//!
//! This crate converts a flat sequence of string tokens into a
//! strongly-typed configuration value, following declared option and
//! positional-argument rules, and renders a usage/help summary from the
//! same declarations:
//!
//! - [`Parser`] — owns the option registry and positional mode; a single
//!   forward pass over the tokens populates a fresh result value.
//! - [`Opt`] / [`Declared`] — option declarations, either at the
//!   registration site or carried on the result field itself.
//! - [`ArgValue`] — the string→typed coercion contract, with layered
//!   strategies for enumerations ([`named_variant`], [`backed_variant`]),
//!   primitives ([`lossless`]), and optionals.
//! - [`Subcommand`] — a closed, described set of command variants the
//!   first positional token can select, with strict or delegating
//!   argument handling.
//! - [`ParseError`] — the typed failure taxonomy; registration mistakes
//!   panic instead (they are programmer errors, not bad input).
//!
//! The engine produces text content only: argv acquisition, stream
//! writing, and exit codes belong to the embedding binary.
//!
//! # Example
//!
//! ```
//! use declarg_core::{Opt, Parser, Subcommand};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Default)]
//! enum Action {
//!     #[default]
//!     Build,
//!     Test,
//! }
//!
//! impl Subcommand for Action {
//!     fn variants() -> Vec<Self> {
//!         vec![Action::Build, Action::Test]
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         match self {
//!             Action::Build => "build",
//!             Action::Test => "test",
//!         }
//!     }
//!
//!     fn description(&self) -> &'static str {
//!         match self {
//!             Action::Build => "compile the project",
//!             Action::Test => "run the test suite",
//!         }
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! struct Args {
//!     jobs: u32,
//!     action: Action,
//!     action_args: Vec<String>,
//! }
//!
//! let mut parser = Parser::<Args>::new("runner", "Runs project actions.");
//! parser.add_value_option(Opt::new("-j", "parallel jobs").with_alias("--jobs"), |args| {
//!     &mut args.jobs
//! });
//! parser.set_subcommand(|args| &mut args.action, |args| &mut args.action_args);
//!
//! let args = parser.parse(["-j", "4", "test", "--filter", "io"]).unwrap();
//! assert_eq!(args.jobs, 4);
//! assert_eq!(args.action, Action::Test);
//! assert_eq!(args.action_args, vec!["--filter", "io"]);
//!
//! assert!(parser.help_text().contains("SUBCOMMANDS:"));
//! ```

mod coerce;
mod error;
mod help;
mod option;
mod parser;
mod positional;
mod schema;

pub use coerce::{ArgValue, InvalidValue, backed_variant, lossless, named_variant};
pub use error::{ParseError, RegistryViolation};
pub use option::{Declared, Opt};
pub use parser::Parser;
pub use positional::Subcommand;
pub use schema::{OptionSchema, ParserSchema, PositionalSchema, SubcommandInfo};
