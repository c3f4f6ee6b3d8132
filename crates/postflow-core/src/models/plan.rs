use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A pricing plan. `price` is in minor units (cents, kobo).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Plan {
    #[serde(alias = "_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlansEnvelope {
    #[serde(default)]
    pub plans: Vec<Plan>,
}

/// Payment processor handling the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum PaymentGateway {
    Stripe,
    Paystack,
}

impl fmt::Display for PaymentGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentGateway::Stripe => f.write_str("stripe"),
            PaymentGateway::Paystack => f.write_str("paystack"),
        }
    }
}

impl FromStr for PaymentGateway {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(PaymentGateway::Stripe),
            "paystack" => Ok(PaymentGateway::Paystack),
            other => Err(format!("unknown payment gateway '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubscribeRequest<'a> {
    #[serde(rename = "planId")]
    pub plan_id: &'a EntityId,
    pub gateway: PaymentGateway,
}

/// Checkout link returned by the subscription endpoint. Stripe calls it a
/// checkout URL, Paystack an authorization URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SubscribeResponse {
    #[serde(rename = "checkoutUrl", alias = "authorizationUrl", alias = "url")]
    pub checkout_url: String,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_deref(), Some("active") | Some("trialing"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubscriptionEnvelope {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plans_envelope() {
        let json = r#"{"plans":[{"_id":"p1","name":"Starter","price":900,"features":["3 accounts"]},{"id":2,"name":"Pro","price":250000,"currency":"NGN","interval":"month"}]}"#;
        let env: PlansEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.plans.len(), 2);
        assert_eq!(env.plans[0].currency, "USD");
        assert_eq!(env.plans[1].id, EntityId::Num(2));
        assert_eq!(env.plans[1].interval.as_deref(), Some("month"));
    }

    #[test]
    fn test_subscribe_response_accepts_paystack_shape() {
        let r: SubscribeResponse =
            serde_json::from_str(r#"{"authorizationUrl":"https://checkout.paystack.com/x","reference":"ref1"}"#)
                .unwrap();
        assert_eq!(r.checkout_url, "https://checkout.paystack.com/x");
    }

    #[test]
    fn test_gateway_parse() {
        assert_eq!("Stripe".parse::<PaymentGateway>(), Ok(PaymentGateway::Stripe));
        assert!("paypal".parse::<PaymentGateway>().is_err());
    }

    #[test]
    fn test_subscription_is_active() {
        let s: Subscription = serde_json::from_str(r#"{"status":"active"}"#).unwrap();
        assert!(s.is_active());
        let s: Subscription = serde_json::from_str(r#"{"status":"canceled"}"#).unwrap();
        assert!(!s.is_active());
    }
}
