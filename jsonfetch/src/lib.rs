//! Typed JSON-over-HTTP requests.
//!
//! A request flows through a fixed pipeline: the [`Client`] sends it, the
//! status is checked by [`validate`], and the body is turned into the caller's
//! type by [`decode`]. Every failure along the way comes back as one
//! [`ApiError`] variant.
mod classify;
mod client;
mod config;
mod decode;
pub mod epoch_seconds;
mod errors;
mod request;
mod validate;
pub use self::classify::{classify, DecodeContext, DecodeFailureDetail};
pub use self::client::Client;
pub use self::config::ClientConfig;
pub use self::decode::{decode, decode_response, DateDecoding, DATE_DECODING};
pub use self::errors::ApiError;
pub use self::request::{Method, RawResponse, RequestDescriptor};
pub use self::validate::validate;
