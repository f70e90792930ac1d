use crate::model::{NormalizedProduct, PromotionDecision};

/// Decides whether a normalized record is a genuine promotion.
///
/// A coupon code qualifies on its own; otherwise the price must sit below the
/// reference price by at least `min_discount_percent`. Unparsable price text
/// never fails the call, it just cannot qualify by price.
pub fn evaluate(product: &NormalizedProduct, min_discount_percent: f64) -> PromotionDecision {
    let discount_percent = discount_percent(product);

    if product.coupon_code.as_deref().is_some_and(|c| !c.is_empty()) {
        return PromotionDecision {
            qualifies: true,
            discount_percent,
        };
    }

    PromotionDecision {
        qualifies: discount_percent.is_some_and(|d| d >= min_discount_percent),
        discount_percent,
    }
}

fn discount_percent(product: &NormalizedProduct) -> Option<f64> {
    let price = parse_amount(&product.price)?;
    let reference = product.reference_price.as_deref().and_then(parse_amount)?;
    if reference <= 0.0 {
        return None;
    }
    Some((reference - price) / reference * 100.0)
}

/// Parses a price string that may carry currency symbols and either
/// `1,299.90` or `1.299,90` style separators. Garbage input is `None`,
/// never an error.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        // comma after dot: dot groups thousands, comma is the decimal mark
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        // lone comma with at most two trailing digits reads as a decimal
        // mark, anything else as thousands grouping
        (None, Some(comma))
            if cleaned.matches(',').count() == 1 && cleaned.len() - comma <= 3 =>
        {
            cleaned.replace(',', ".")
        }
        (None, Some(_)) => cleaned.replace(',', ""),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: &str, reference: Option<&str>, coupon: Option<&str>) -> NormalizedProduct {
        NormalizedProduct {
            title: "Disk X".into(),
            price: price.into(),
            reference_price: reference.map(Into::into),
            coupon_code: coupon.map(Into::into),
            link: Some("http://x".into()),
        }
    }

    #[test]
    fn coupon_code_qualifies_regardless_of_price_fields() {
        let decision = evaluate(&product("not a price", None, Some("SAVE10")), 50.0);
        assert!(decision.qualifies);

        let decision = evaluate(&product("300.00", Some("200.00"), Some("SAVE10")), 0.0);
        assert!(decision.qualifies);
    }

    #[test]
    fn empty_coupon_code_does_not_qualify_by_itself() {
        let decision = evaluate(&product("100.00", None, Some("")), 0.0);
        assert!(!decision.qualifies);
    }

    #[test]
    fn discount_at_or_above_threshold_qualifies() {
        let decision = evaluate(&product("199.90", Some("299.90"), None), 10.0);
        assert!(decision.qualifies);
        let pct = decision.discount_percent.unwrap();
        assert!((pct - 33.344).abs() < 0.01);

        // exactly at the threshold
        let decision = evaluate(&product("90.00", Some("100.00"), None), 10.0);
        assert!(decision.qualifies);
    }

    #[test]
    fn discount_below_threshold_is_rejected() {
        let decision = evaluate(&product("95.00", Some("100.00"), None), 10.0);
        assert!(!decision.qualifies);
        assert_eq!(decision.discount_percent, Some(5.0));
    }

    #[test]
    fn default_threshold_accepts_any_reduction() {
        assert!(evaluate(&product("99.99", Some("100.00"), None), 0.0).qualifies);
        assert!(!evaluate(&product("100.01", Some("100.00"), None), 0.0).qualifies);
    }

    #[test]
    fn missing_or_zero_reference_price_never_qualifies_by_price() {
        assert!(!evaluate(&product("50.00", None, None), 0.0).qualifies);
        assert!(!evaluate(&product("50.00", Some("0"), None), 0.0).qualifies);
    }

    #[test]
    fn garbage_price_text_is_no_discount_not_a_fault() {
        assert!(!evaluate(&product("call for price", Some("100.00"), None), 0.0).qualifies);
        assert!(!evaluate(&product("100.00", Some("n/a"), None), 0.0).qualifies);
    }

    #[test]
    fn parse_amount_handles_both_separator_conventions() {
        assert_eq!(parse_amount("R$ 1.299,90"), Some(1299.90));
        assert_eq!(parse_amount("$1,299.90"), Some(1299.90));
        assert_eq!(parse_amount("199.90"), Some(199.90));
        assert_eq!(parse_amount("199,90"), Some(199.90));
        assert_eq!(parse_amount("1,299"), Some(1299.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("free!"), None);
    }
}
