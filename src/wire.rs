//! Record form for handing a structured error across a process boundary.

use std::error::Error as StdError;

use serde::{Deserialize, Serialize};

use crate::data::{ErrorData, ReservedKey};
use crate::error::Error;
use crate::exception::StructuredError;
use crate::keyword::MESSAGE_KEY;

/// `type` given to causes that were not structured errors.
pub const FOREIGN_TYPE: &str = "foreign";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    #[serde(rename = "type")]
    pub error_type: String,
    /// Raw `message` value, not the `"... (type = ...)"` display form.
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<WireError>>,
}

impl WireError {
    /// Encodes `err` and its whole source chain.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let cause = err.source().map(|src| Box::new(Self::from_error(src)));
        match err.downcast_ref::<StructuredError>() {
            Some(structured) => Self {
                error_type: structured.error_type().to_string(),
                message: structured.data().get_str(&MESSAGE_KEY).unwrap_or_default(),
                data: structured.data().to_json(),
                cause,
            },
            None => Self {
                error_type: FOREIGN_TYPE.to_string(),
                message: err.to_string(),
                data: serde_json::Map::new(),
                cause,
            },
        }
    }

    /// Rebuilds the chain as structured errors.
    ///
    /// Reserved keys missing from `data` are taken from the top-level
    /// `type`/`message` fields before the payload is validated.
    pub fn into_error(self) -> Result<StructuredError, Error> {
        let Self {
            error_type,
            message,
            data,
            cause,
        } = self;

        let mut payload = ErrorData::from_json(data);
        for key in payload.missing_reserved() {
            let fallback = match key {
                ReservedKey::Message => message.clone(),
                ReservedKey::Type => error_type.clone(),
            };
            payload.insert(key.keyword(), fallback);
        }

        match cause {
            Some(cause) => StructuredError::with_cause(payload, cause.into_error()?),
            None => StructuredError::new(payload),
        }
    }

    /// Number of records in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.cause.as_deref();
        while let Some(next) = current {
            depth += 1;
            current = next.cause.as_deref();
        }
        depth
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let wire: Self = serde_json::from_str(json)?;
        tracing::trace!(depth = wire.depth(), error_type = %wire.error_type, "decoded wire error");
        Ok(wire)
    }
}

impl From<&StructuredError> for WireError {
    fn from(err: &StructuredError) -> Self {
        Self::from_error(err)
    }
}
