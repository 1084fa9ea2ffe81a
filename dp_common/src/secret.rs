//! A wrapper for configuration values that must never leak into logs.
use std::{
    fmt,
    fmt::{Debug, Display},
};

const MASK: &str = "****";

/// Holds a sensitive value, such as the Paystack secret key or the DataMart API key.
///
/// Both `Debug` and `Display` print a mask, so a `Secret` can sit inside a config struct that gets logged at
/// startup without exposing the key. Call [`Secret::reveal`] only at the point the value is actually sent, which
/// in practice means when an `Authorization` header is built.
#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T: Clone + Default> Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}
