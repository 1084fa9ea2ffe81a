mod pricing;
mod references;

pub use pricing::{resolve_price, PriceResolution};
pub use references::{new_reference, new_slug};
