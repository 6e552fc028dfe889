//! Field catalog and value coercion for tag-annotated configuration structs
//!
//! `configurator` is the core an environment/flag binder is built on. It walks a
//! configuration struct, lists every bindable field together with the env var
//! and flag keys it answers to, and turns raw strings into typed field values.
//! It never reads the environment or the command line itself, and it has no
//! opinion on which source wins: that is the binder's job.
//!
//! # Example
//!
//! ```rust
//! use configurator::{build_catalog, Configure};
//!
//! #[derive(Debug, Default, Configure)]
//! struct Config {
//!     #[config(tag = "env,flag")]
//!     pub host: String,
//!
//!     #[config(tag = "env=SERVICE_PORT,default=8080")]
//!     pub port: u16,
//! }
//!
//! # fn main() -> Result<(), configurator::Error> {
//! let mut config = Config::default();
//! let mut catalog = build_catalog(&mut config)?;
//!
//! for field in catalog.iter_mut() {
//!     let raw = match field.env_key().as_str() {
//!         "HOST" => "0.0.0.0".to_string(),
//!         _ => field.default_value().to_string(),
//!     };
//!     field.coerce(&raw)?;
//! }
//! drop(catalog);
//!
//! assert_eq!(config.host, "0.0.0.0");
//! assert_eq!(config.port, 8080);
//! # Ok(())
//! # }
//! ```
//!
//! # Tags
//!
//! `#[config(tag = "...")]` holds a comma-separated list of directives:
//!
//! | Directive | Meaning |
//! |---|---|
//! | `env` | env key derived from the field path: `database.max_conns` → `DATABASE_MAX_CONNS` |
//! | `env=KEY` | env key `KEY` |
//! | `flag` | flag key derived from the field path: `database.max_conns` → `database-max-conns` |
//! | `flag=name` | flag key `name` |
//! | `default=VALUE` | default value string handed to the binder |
//!
//! Other directives are ignored. An explicit form with an empty value
//! (`env=`) is rejected with [`Error::InvalidTagFormat`].
//!
//! # Nesting
//!
//! - Struct fields are walked; their leaves get the field name as a path prefix.
//! - `#[config(embed)]` flattens a struct field: no path prefix is added.
//! - `Option<Struct>` fields that are `None` are filled with
//!   `Default::default()` during [`build_catalog`], so nested structs must
//!   implement `Default`.
//! - `Option<T>` for a scalar `T` stays `None` until a value is coerced into it.
//! - Private fields and `#[config(skip)]` fields are never cataloged.
//!
//! # Supported field types
//!
//! `bool`, all integer widths up to 64 bits plus `isize`/`usize`, `f32`, `f64`,
//! `String`, `std::time::Duration` (humantime literals like `1h30m`),
//! `chrono::DateTime<FixedOffset>` and `DateTime<Utc>` (RFC 3339), and
//! `Option`/`Box` of any of these. `Vec<T>` fields are cataloged but coercion
//! leaves them untouched.

// Lets the derive macro's `::configurator` paths resolve inside this crate.
extern crate self as configurator;

mod catalog;
mod coerce;
mod error;
mod key;
mod tag;
mod types;
mod walk;

pub use catalog::{Catalog, FieldDescriptor, FieldSummary, Lineage};
pub use coerce::coerce;
pub use configurator_derive::Configure;
pub use error::{Error, ErrorKind, ParseError};
pub use key::{default_value, env_key, flag_key};
pub use tag::{parse_tag, Directive, DirectiveSet, TagError};
pub use types::{Bindable, Configure, DeclaredType, FieldSlot, Indirect, Shape, Value};
pub use walk::build_catalog;
