//! HTTP request handlers.

pub(crate) mod convert;
pub(crate) mod source;
pub(crate) mod upload;
