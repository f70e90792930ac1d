use crate::model::{ManualCoupon, NormalizedProduct, PromotionDecision};

/// Message body for a discovered promotion.
pub fn format_promotion(product: &NormalizedProduct, decision: &PromotionDecision) -> String {
    let mut lines = vec![format!("🔥 *{}*", product.title), format!("💰 Por: {}", product.price)];

    if let Some(reference) = product.reference_price.as_deref() {
        match decision.discount_percent {
            Some(pct) if pct > 0.0 => {
                lines.push(format!("📉 De: {reference} (-{pct:.0}%)"));
            }
            _ => lines.push(format!("📉 De: {reference}")),
        }
    }

    if let Some(code) = product.coupon_code.as_deref() {
        lines.push(format!("🎟 CUPOM: *{code}*"));
    }

    if let Some(link) = product.link.as_deref() {
        lines.push(format!("🔗 {link}"));
    }

    lines.join("\n")
}

/// Legacy coupon layout, unchanged from the original broadcast bot.
pub fn format_coupon(coupon: &ManualCoupon) -> String {
    format!(
        "{}\n{}\n\n🎟 CUPOM: *{}*\n📌 Detalhes: {}\n⏰ Aproveite enquanto ainda está ativo!",
        coupon.titulo, coupon.descricao, coupon.cupom, coupon.detalhes
    )
}
