use serde_json::Value;

use crate::model::NormalizedProduct;

// Provider responses are not stable: the same semantic field shows up under
// different names depending on endpoint and plan tier. Each list is ordered by
// how commonly the key is seen; the first present non-empty value wins.
const TITLE_KEYS: &[&str] = &["title", "product_title", "name", "product_name"];
const PRICE_KEYS: &[&str] = &["price", "product_price", "current_price", "deal_price", "price_str"];
const REFERENCE_PRICE_KEYS: &[&str] = &[
    "original_price",
    "product_original_price",
    "list_price",
    "old_price",
    "strike_price",
];
const COUPON_KEYS: &[&str] = &["coupon_code", "coupon", "promo_code"];
const LINK_KEYS: &[&str] = &["link", "url", "product_url", "detail_page_url"];
const ITEM_ID_KEYS: &[&str] = &["asin", "product_id", "id", "item_id"];

const CANDIDATE_LIST_KEYS: &[&str] = &["results", "products", "items", "data", "searchResults"];

const LINK_TEMPLATE: &str = "https://www.amazon.com/dp/";

/// Extracts a canonical product record from one provider-shaped candidate.
///
/// Total function: absent or unusable fields propagate as empty/absent output
/// fields, and the eligibility check downstream rejects the record silently.
pub fn normalize(candidate: &Value) -> NormalizedProduct {
    let link = pick(candidate, LINK_KEYS)
        .or_else(|| pick(candidate, ITEM_ID_KEYS).map(|id| format!("{LINK_TEMPLATE}{id}")));

    NormalizedProduct {
        title: pick(candidate, TITLE_KEYS).unwrap_or_default(),
        price: pick(candidate, PRICE_KEYS).unwrap_or_default(),
        reference_price: pick(candidate, REFERENCE_PRICE_KEYS),
        coupon_code: pick(candidate, COUPON_KEYS),
        link,
    }
}

/// Locates the candidate list inside a provider response: one of the known
/// list-bearing keys, the response itself if it is a list, or the first
/// list-valued member found by shallow scan. No list anywhere means no
/// candidates this cycle.
pub fn extract_candidates(response: &Value) -> Vec<Value> {
    if let Value::Array(items) = response {
        return items.clone();
    }

    let Value::Object(map) = response else {
        return Vec::new();
    };

    for key in CANDIDATE_LIST_KEYS {
        if let Some(Value::Array(items)) = map.get(*key) {
            return items.clone();
        }
    }

    // Last resort: shallow scan, e.g. a list nested under an envelope key
    // we have not seen before.
    for value in map.values() {
        match value {
            Value::Array(items) => return items.clone(),
            Value::Object(inner) => {
                for nested in inner.values() {
                    if let Value::Array(items) = nested {
                        return items.clone();
                    }
                }
            }
            _ => {}
        }
    }

    Vec::new()
}

/// First present non-empty value among the alternate keys, rendered to a
/// trimmed string. Numbers are carried as text; parsing is deferred to the
/// promotion filter.
fn pick(candidate: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match candidate.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_first_present_alternate_key() {
        let candidate = json!({
            "product_title": "Disk X",
            "deal_price": "199.90",
            "detail_page_url": "http://x"
        });
        let product = normalize(&candidate);
        assert_eq!(product.title, "Disk X");
        assert_eq!(product.price, "199.90");
        assert_eq!(product.link.as_deref(), Some("http://x"));
    }

    #[test]
    fn numeric_fields_become_trimmed_strings() {
        let candidate = json!({"title": " Disk X ", "price": 199.9, "link": "http://x"});
        let product = normalize(&candidate);
        assert_eq!(product.title, "Disk X");
        assert_eq!(product.price, "199.9");
    }

    #[test]
    fn synthesizes_link_from_item_id_when_no_link_present() {
        let candidate = json!({"title": "Disk X", "price": "199.90", "asin": "B0TEST123"});
        let product = normalize(&candidate);
        assert_eq!(product.link.as_deref(), Some("https://www.amazon.com/dp/B0TEST123"));
    }

    #[test]
    fn missing_required_fields_yield_ineligible_record_not_a_fault() {
        for candidate in [
            json!({"price": "10", "link": "http://x"}),
            json!({"title": "Disk X", "link": "http://x"}),
            json!({"title": "Disk X", "price": "10"}),
            json!({}),
            json!(null),
            json!("garbage"),
        ] {
            assert!(!normalize(&candidate).is_eligible());
        }
    }

    #[test]
    fn normalize_is_idempotent_per_input() {
        let candidate = json!({"title": "Disk X", "price": "199.90", "url": "http://x"});
        assert_eq!(normalize(&candidate), normalize(&candidate));
    }

    #[test]
    fn extracts_list_under_known_keys() {
        let response = json!({"items": [{"title": "a"}, {"title": "b"}]});
        assert_eq!(extract_candidates(&response).len(), 2);
    }

    #[test]
    fn bare_list_response_is_returned_unchanged() {
        let response = json!([{"title": "a"}]);
        assert_eq!(extract_candidates(&response), vec![json!({"title": "a"})]);
    }

    #[test]
    fn shallow_scan_finds_list_under_unknown_envelope() {
        let response = json!({"payload": {"hits": [{"title": "a"}]}});
        assert_eq!(extract_candidates(&response).len(), 1);
    }

    #[test]
    fn response_without_any_list_yields_empty() {
        assert!(extract_candidates(&json!({"status": "ok"})).is_empty());
        assert!(extract_candidates(&json!("nope")).is_empty());
    }
}
