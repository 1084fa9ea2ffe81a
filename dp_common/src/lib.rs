mod cedis;

pub mod op;
mod secret;

pub use cedis::{Cedis, CedisConversionError, GHS_CURRENCY_CODE};
pub use secret::Secret;
