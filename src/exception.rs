//! The structured error value raised by callers and inspected by handlers.
//!
//! A [`StructuredError`] is built from an [`ErrorData`] payload that must bind
//! both reserved keys. Construction either yields a fully-formed error or
//! fails with [`Error::InvalidPayload`]; there is no partially-built state.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::data::{ErrorData, ReservedKey};
use crate::error::Error;

/// Qualified name used as the prefix of the `Display` form.
pub const TYPE_NAME: &str = "arachne_error::StructuredError";

/// A previously constructed error linked as the cause of a newer one.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Errors that carry an inspectable payload.
///
/// Generic reporting layers can ask for the payload without knowing which
/// concrete error type they hold.
pub trait ErrorInfo {
    fn data(&self) -> &ErrorData;
}

#[derive(Debug, Clone)]
pub struct StructuredError {
    message: String,
    error_type: String,
    data: ErrorData,
    cause: Option<Cause>,
}

/// Extracts `(message, type)` from the payload, message checked first.
fn validate(data: &ErrorData) -> Result<(String, String), Error> {
    match (
        data.require(ReservedKey::Message),
        data.require(ReservedKey::Type),
    ) {
        (Ok(message), Ok(error_type)) => Ok((message, error_type)),
        (Err(err), _) | (_, Err(err)) => {
            tracing::debug!(%err, entries = data.len(), "rejected error payload");
            Err(err)
        }
    }
}

impl StructuredError {
    pub fn new(data: ErrorData) -> Result<Self, Error> {
        Self::build(data, None)
    }

    pub fn with_cause(
        data: ErrorData,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Result<Self, Error> {
        Self::build(data, Some(Arc::new(cause)))
    }

    /// Like [`with_cause`](Self::with_cause) for a cause already shared
    /// with other wrappers.
    pub fn with_shared_cause(data: ErrorData, cause: Cause) -> Result<Self, Error> {
        Self::build(data, Some(cause))
    }

    fn build(data: ErrorData, cause: Option<Cause>) -> Result<Self, Error> {
        let (message, error_type) = validate(&data)?;
        Ok(Self {
            message: format!("{message} (type = {error_type})"),
            error_type,
            data,
            cause,
        })
    }

    /// `"<message> (type = <type>)"`, fixed at construction.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Textual form of the payload's type classifier.
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn is_type(&self, error_type: &str) -> bool {
        self.error_type == error_type
    }

    pub fn data(&self) -> &ErrorData {
        &self.data
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// This error followed by each transitive `source()`.
    pub fn chain(&self) -> Chain<'_> {
        chain(self)
    }
}

impl ErrorInfo for StructuredError {
    fn data(&self) -> &ErrorData {
        &self.data
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TYPE_NAME}: {}", self.message)
    }
}

impl StdError for StructuredError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Iterator over an error and its causes, nearest first.
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Payload of `err` if it is a [`StructuredError`].
pub fn error_data<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ErrorData> {
    err.downcast_ref::<StructuredError>().map(ErrorInfo::data)
}

/// First payload found walking `err` and its causes.
pub fn find_data<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ErrorData> {
    chain(err).find_map(error_data)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::keyword::{Keyword, MESSAGE_KEY, TYPE_KEY};
    use crate::value::Value;

    #[derive(Debug)]
    struct Disk;

    impl fmt::Display for Disk {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("device unavailable")
        }
    }

    impl StdError for Disk {}

    fn assert_send_sync<T: Send + Sync + Clone + 'static>() {}

    #[test]
    fn structured_error_is_shareable() {
        assert_send_sync::<StructuredError>();
    }

    #[test]
    fn display_prefixes_type_name() {
        let err = StructuredError::new(ErrorData::from_message("io-error", "boom")).unwrap();
        assert_eq!(err.message(), "boom (type = io-error)");
        assert_eq!(
            err.to_string(),
            "arachne_error::StructuredError: boom (type = io-error)"
        );
    }

    #[test]
    fn keyword_type_uses_keyword_text() {
        let data = ErrorData::from_message(Keyword::simple("not-found"), "gone");
        let err = StructuredError::new(data).unwrap();
        assert_eq!(err.error_type(), ":not-found");
        assert!(err.is_type(":not-found"));
        assert!(!err.is_type("not-found"));
    }

    #[test]
    fn non_string_values_are_coerced() {
        let data = ErrorData::new()
            .with(TYPE_KEY, 404_i64)
            .with(MESSAGE_KEY, vec![Value::from("a"), Value::from("b")]);
        let err = StructuredError::new(data).unwrap();
        assert_eq!(err.message(), r#"["a" "b"] (type = 404)"#);
    }

    #[test]
    fn missing_both_keys_names_message() {
        match StructuredError::new(ErrorData::new()) {
            Err(Error::InvalidPayload { key }) => assert_eq!(key, MESSAGE_KEY),
            other => unreachable!("expected InvalidPayload, got {other:?}"),
        }
    }

    #[test]
    fn fault_message_names_full_keyword() {
        let err = StructuredError::new(ErrorData::new().with(MESSAGE_KEY, "x")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "exception data must contain :arachne.error/type key"
        );
    }

    #[test]
    fn foreign_cause_is_reachable_through_source() {
        let err =
            StructuredError::with_cause(ErrorData::from_message("io", "save failed"), Disk)
                .unwrap();
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "device unavailable");
        assert!(source.downcast_ref::<Disk>().is_some());
        assert!(err.cause().is_some());
        assert!(error_data(source).is_none());
    }

    #[test]
    fn shared_cause_links_into_several_wrappers() {
        let root: Cause =
            Arc::new(StructuredError::new(ErrorData::from_message("io", "disk full")).unwrap());
        let a = StructuredError::with_shared_cause(
            ErrorData::from_message("wrapper", "save a"),
            Arc::clone(&root),
        )
        .unwrap();
        let b = StructuredError::with_shared_cause(
            ErrorData::from_message("wrapper", "save b"),
            Arc::clone(&root),
        )
        .unwrap();
        assert_eq!(Arc::strong_count(&root), 3);
        for wrapper in [&a, &b] {
            let data = error_data(wrapper.source().unwrap()).unwrap();
            assert_eq!(data.get_str(&MESSAGE_KEY).as_deref(), Some("disk full"));
        }
    }

    #[test]
    fn chain_walks_to_the_root() {
        let e1 = StructuredError::with_cause(ErrorData::from_message("io", "read"), Disk).unwrap();
        let e2 =
            StructuredError::with_cause(ErrorData::from_message("wrapper", "load"), e1).unwrap();
        let rendered: Vec<String> = e2.chain().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "arachne_error::StructuredError: load (type = wrapper)".to_string(),
                "arachne_error::StructuredError: read (type = io)".to_string(),
                "device unavailable".to_string(),
            ]
        );
    }

    #[test]
    fn find_data_skips_foreign_links() {
        #[derive(Debug)]
        struct Outer(StructuredError);

        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("outer")
            }
        }

        impl StdError for Outer {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let inner = StructuredError::new(ErrorData::from_message("not-found", "x")).unwrap();
        let outer = Outer(inner);
        assert!(error_data(&outer).is_none());
        let data = find_data(&outer).unwrap();
        assert_eq!(data.get_str(&TYPE_KEY).as_deref(), Some("not-found"));
    }

    #[test]
    fn boxed_errors_downcast_to_payload() {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(
            StructuredError::new(ErrorData::from_message("invalid-input", "bad")).unwrap(),
        );
        let data = error_data(boxed.as_ref()).unwrap();
        assert_eq!(data.get_str(&MESSAGE_KEY).as_deref(), Some("bad"));
    }
}
