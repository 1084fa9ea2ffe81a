use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

fn random_suffix(len: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(|c| (c as char).to_ascii_lowercase()).collect()
}

/// Generates a payment or order reference of the form `{prefix}_{millis}_{suffix}`.
///
/// The timestamp plus six random characters make collisions vanishingly unlikely, but uniqueness is ultimately
/// enforced by the unique index on `transactions.reference`, which surfaces as a `DuplicateReference` error.
pub fn new_reference(prefix: &str) -> String {
    let ts = Utc::now().timestamp_millis();
    format!("{prefix}_{ts}_{}", random_suffix(6))
}

/// Derives a URL slug from a business name: lowercased, non-alphanumerics collapsed to single hyphens,
/// truncated to 20 characters, with a short random suffix so that two "Kwame Data Hub"s get distinct shops.
pub fn new_slug(business_name: &str) -> String {
    let mut sanitized = String::with_capacity(business_name.len());
    let mut last_was_hyphen = true;
    for c in business_name.chars() {
        if c.is_ascii_alphanumeric() {
            sanitized.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            sanitized.push('-');
            last_was_hyphen = true;
        }
        if sanitized.len() >= 20 {
            break;
        }
    }
    let sanitized = sanitized.trim_matches('-');
    if sanitized.is_empty() {
        format!("shop-{}", random_suffix(4))
    } else {
        format!("{sanitized}-{}", random_suffix(4))
    }
}
