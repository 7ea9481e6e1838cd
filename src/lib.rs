#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod data;
pub mod error;
pub mod exception;
pub mod keyword;
pub mod value;
pub mod wire;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use data::{ErrorData, ReservedKey};
pub use error::Error;
pub use exception::{
    Cause, Chain, ErrorInfo, StructuredError, TYPE_NAME, chain, error_data, find_data,
};
pub use keyword::{Keyword, MESSAGE_KEY, TYPE_KEY};
pub use value::Value;
pub use wire::{FOREIGN_TYPE, WireError};
