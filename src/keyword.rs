use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Namespace shared by the reserved payload keys.
pub const RESERVED_NAMESPACE: &str = "arachne.error";

/// `:arachne.error/message`
pub const MESSAGE_KEY: Keyword = Keyword::from_static(RESERVED_NAMESPACE, "message");

/// `:arachne.error/type`
pub const TYPE_KEY: Keyword = Keyword::from_static(RESERVED_NAMESPACE, "type");

/// A symbolic, optionally namespaced identifier used as a payload key.
///
/// Two keywords are equal when both namespace and name match, so keywords can
/// be built at runtime from parsed input and still hit the same map slot as
/// the `const` reserved keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keyword {
    namespace: Option<Cow<'static, str>>,
    name: Cow<'static, str>,
}

impl Keyword {
    pub const fn from_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Some(Cow::Borrowed(namespace)),
            name: Cow::Borrowed(name),
        }
    }

    pub const fn simple_static(name: &'static str) -> Self {
        Self {
            namespace: None,
            name: Cow::Borrowed(name),
        }
    }

    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(Cow::Owned(namespace.into())),
            name: Cow::Owned(name.into()),
        }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: Cow::Owned(name.into()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":")?;
        if let Some(ns) = &self.namespace {
            write_escaped(f, ns)?;
            f.write_str("/")?;
        }
        write_escaped(f, &self.name)
    }
}

/// `/` separates namespace from name, so it is escaped inside either part.
fn write_escaped(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    for c in part.chars() {
        if matches!(c, '\\' | '/') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

/// Splits on the first unescaped `/` and unescapes both halves.
fn split_escaped(body: &str) -> (Option<String>, String) {
    let mut namespace = None;
    let mut current = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            '/' if namespace.is_none() => namespace = Some(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    (namespace, current)
}

fn valid_part(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(char::is_whitespace)
}

impl Keyword {
    /// Inverse of `Display`: never fails, and `from_encoded(&k.to_string()) == k`
    /// for every keyword.
    ///
    /// A missing leading `:` is tolerated, so plain map keys such as
    /// `"resource"` decode as simple keywords.
    pub fn from_encoded(s: &str) -> Self {
        let body = s.strip_prefix(':').unwrap_or(s);
        match split_escaped(body) {
            (Some(ns), name) => Self::new(ns, name),
            (None, name) => Self::simple(name),
        }
    }
}

impl FromStr for Keyword {
    type Err = Error;

    /// Accepts `:ns/name`, `ns/name`, `:name` or `name`, with `\/` and `\\`
    /// escapes. Splits on the first unescaped `/` and rejects empty parts or
    /// whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix(':').unwrap_or(s);
        match split_escaped(body) {
            (Some(ns), name) if valid_part(&ns) && valid_part(&name) => Ok(Self::new(ns, name)),
            (None, name) if valid_part(&name) => Ok(Self::simple(name)),
            _ => Err(Error::InvalidKeyword {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Keyword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_encoded(&raw))
    }
}
