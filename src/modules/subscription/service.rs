use crate::modules::quota::PostAllowance;
use crate::modules::users::SubscriptionTier;
use crate::services::mailer::EmailMessage;

/// Monthly price in whole currency units. The free tier cannot be purchased.
pub fn plan_price(tier: SubscriptionTier) -> Option<u64> {
    match tier {
        SubscriptionTier::Free => None,
        SubscriptionTier::Bronze => Some(100),
        SubscriptionTier::Silver => Some(300),
        SubscriptionTier::Gold => Some(1000),
    }
}

/// Parses a purchasable plan name.
pub fn purchasable_plan(plan: &str) -> Option<(SubscriptionTier, u64)> {
    let tier: SubscriptionTier = plan.parse().ok()?;
    plan_price(tier).map(|price| (tier, price))
}

pub fn invoice_email(
    from: &str,
    to: &str,
    tier: SubscriptionTier,
    price: u64,
    currency: &str,
    payment_id: &str,
) -> EmailMessage {
    let allowance = match PostAllowance::for_tier(tier) {
        PostAllowance::Limited(n) => format!("{} posts per 30 days", n),
        PostAllowance::Unlimited => "unlimited posts".to_string(),
    };

    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("Your Twiller {} plan invoice", tier),
        body: format!(
            "Thank you for subscribing.\n\nPlan: {}\nAmount: {} {}\nPayment ID: {}\nIncludes: {}\n",
            tier, price, currency, payment_id, allowance
        ),
    }
}
