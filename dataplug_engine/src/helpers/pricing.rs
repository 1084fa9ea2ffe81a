use dp_common::Cedis;

/// The effective customer price and the agent's margin for a single package sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceResolution {
    pub sale_price: Cedis,
    pub commission: Cedis,
}

/// Resolves the price a customer pays for a package in a given agent's shop.
///
/// An agent override only takes effect if it is at or above the catalog base price. Overrides below the floor are
/// rejected when the agent tries to save them, but a stale row predating that check must still never produce a
/// negative commission, so the resolver clamps to the base price as well.
pub fn resolve_price(base_price: Cedis, override_price: Option<Cedis>) -> PriceResolution {
    let sale_price = match override_price {
        Some(p) if p >= base_price => p,
        _ => base_price,
    };
    PriceResolution { sale_price, commission: sale_price - base_price }
}
