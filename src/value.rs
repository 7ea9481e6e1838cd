use std::collections::BTreeMap;
use std::fmt;

use crate::keyword::Keyword;

/// A payload value. Mandatory keys bound to [`Value::Nil`] count as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Keyword(Keyword),
    List(Vec<Value>),
    Map(BTreeMap<Keyword, Value>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Textual form used when a value is folded into a display message.
///
/// Top-level strings print raw. Elements nested in a list or map print in
/// readable form, so strings inside collections are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Float(x) => write_float(f, *x, false),
            _ => self.write_readable(f),
        }
    }
}

impl Value {
    fn write_readable(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write_float(f, *x, true),
            Self::Str(s) => write_quoted(f, s),
            Self::Keyword(k) => write!(f, "{k}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    item.write_readable(f)?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} ")?;
                    v.write_readable(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// JVM double text: `Infinity`/`NaN` at top level, `##Inf`/`##NaN` when
/// nested, scientific `1.0E10` form outside `[1e-3, 1e7)`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64, nested: bool) -> fmt::Result {
    if x.is_nan() {
        return f.write_str(if nested { "##NaN" } else { "NaN" });
    }
    if x.is_infinite() {
        let text = match (x.is_sign_positive(), nested) {
            (true, false) => "Infinity",
            (false, false) => "-Infinity",
            (true, true) => "##Inf",
            (false, true) => "##-Inf",
        };
        return f.write_str(text);
    }

    let magnitude = x.abs();
    if magnitude > 0.0 && !(1e-3..1e7).contains(&magnitude) {
        let sci = format!("{x:e}");
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        if mantissa.contains('.') {
            write!(f, "{mantissa}E{exponent}")
        } else {
            write!(f, "{mantissa}.0E{exponent}")
        }
    } else {
        // Debug keeps the trailing `.0` on whole floats.
        write!(f, "{x:?}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{0c}' => f.write_str("\\f")?,
            '\u{08}' => f.write_str("\\b")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Keyword> for Value {
    fn from(k: Keyword) -> Self {
        Self::Keyword(k)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<Keyword, Value>> for Value {
    fn from(entries: BTreeMap<Keyword, Value>) -> Self {
        Self::Map(entries)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Nil, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Nil, Self::Float),
            },
            serde_json::Value::String(s) => {
                if s.starts_with(':')
                    && let Ok(kw) = s.parse::<Keyword>()
                {
                    return Self::Keyword(kw);
                }
                Self::Str(s)
            }
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(obj) => Self::Map(
                obj.into_iter()
                    .map(|(k, v)| (Keyword::from_encoded(&k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Nil => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(n) => Self::from(*n),
            // NaN and infinities have no JSON form.
            Value::Float(x) => serde_json::Number::from_f64(*x).map_or(Self::Null, Self::Number),
            Value::Str(s) => Self::String(s.clone()),
            Value::Keyword(k) => Self::String(k.to_string()),
            Value::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}
