//! Key derivation from a field's nesting path.

use crate::tag::DirectiveSet;

/// Environment variable key, or `""` when the field is not env-bindable.
///
/// Bare `env` joins the path with `_` and upper-cases it:
/// `database.max_conns` becomes `DATABASE_MAX_CONNS`.
pub fn env_key(path: &[&str], directives: &DirectiveSet) -> String {
    match &directives.env {
        Some(Some(explicit)) => explicit.clone(),
        Some(None) => path.join("_").to_uppercase(),
        None => String::new(),
    }
}

/// Flag key, or `""` when the field is not flag-bindable.
///
/// Bare `flag` joins the path with `-` and lower-cases it, rendering the
/// underscores of snake_case field names as `-` too:
/// `database.max_conns` becomes `database-max-conns`.
pub fn flag_key(path: &[&str], directives: &DirectiveSet) -> String {
    match &directives.flag {
        Some(Some(explicit)) => explicit.clone(),
        Some(None) => path.join("-").replace('_', "-").to_lowercase(),
        None => String::new(),
    }
}

/// Explicit default value, or `""`.
pub fn default_value(directives: &DirectiveSet) -> &str {
    directives.default_value().unwrap_or_default()
}
