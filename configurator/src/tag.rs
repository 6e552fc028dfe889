//! Parsing of per-field annotation strings.
//!
//! An annotation is a comma-separated list of directives:
//!
//! ```text
//! env,flag=listen-port,default=8080
//! ```
//!
//! Each of `env`, `flag` and `default` may appear bare or with an explicit
//! `=VALUE`. Unknown directives are ignored so annotations can be shared with
//! other tools.

const SEPARATOR: char = ',';

/// One directive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Env,
    Flag,
    Default,
}

impl Directive {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "env" => Some(Self::Env),
            "flag" => Some(Self::Flag),
            "default" => Some(Self::Default),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Flag => "flag",
            Self::Default => "default",
        }
    }

    /// Placeholder shown for the explicit form in error messages.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Env => "ENV_KEY",
            Self::Flag => "flag-key",
            Self::Default => "value",
        }
    }
}

/// An explicit directive was written with nothing after `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagError {
    pub directive: Directive,
}

/// Parsed directives of one field.
///
/// Each directive is:
/// - `None`: absent
/// - `Some(None)`: bare, the key is derived from the field path
/// - `Some(Some(value))`: explicit, never empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    pub env: Option<Option<String>>,
    pub flag: Option<Option<String>>,
    pub default: Option<Option<String>>,
}

impl DirectiveSet {
    pub fn has_env(&self) -> bool {
        self.env.is_some()
    }

    pub fn has_flag(&self) -> bool {
        self.flag.is_some()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Explicit env key, if one was given.
    pub fn env(&self) -> Option<&str> {
        self.env.as_ref().and_then(|v| v.as_deref())
    }

    /// Explicit flag key, if one was given.
    pub fn flag(&self) -> Option<&str> {
        self.flag.as_ref().and_then(|v| v.as_deref())
    }

    /// Explicit default value, if one was given.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_ref().and_then(|v| v.as_deref())
    }

    fn slot(&mut self, directive: Directive) -> &mut Option<Option<String>> {
        match directive {
            Directive::Env => &mut self.env,
            Directive::Flag => &mut self.flag,
            Directive::Default => &mut self.default,
        }
    }
}

/// Parse one annotation string.
///
/// A later directive of the same family replaces an earlier one.
pub fn parse_tag(tag: &str) -> Result<DirectiveSet, TagError> {
    let mut set = DirectiveSet::default();

    for token in tag.split(SEPARATOR).map(str::trim) {
        let (key, value) = match token.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (token, None),
        };

        let Some(directive) = Directive::from_key(key) else {
            continue;
        };

        let parsed = match value {
            Some("") => return Err(TagError { directive }),
            Some(value) => Some(value.to_string()),
            None => None,
        };
        *set.slot(directive) = Some(parsed);
    }

    Ok(set)
}
