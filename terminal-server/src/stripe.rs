//! Stripe integration via REST API (no SDK dependency)

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sha2::Sha256;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Checkout session handle returned by the processor
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Convert a major-unit decimal amount to the processor's minor units.
pub fn to_minor_units(amount: Decimal) -> Result<i64, BoxError> {
    (amount * Decimal::new(100, 0))
        .round()
        .to_i64()
        .ok_or_else(|| format!("Amount out of range: {amount}").into())
}

/// Create a Stripe Checkout Session (payment mode)
///
/// `reference_id` is echoed back as `client_reference_id` on the completion
/// webhook, which is how the event is correlated with the tracked payment
/// session.
pub async fn create_checkout_session(
    secret_key: &str,
    amount: Decimal,
    currency: &str,
    reference_id: &str,
    success_url: &str,
    cancel_url: &str,
) -> Result<CheckoutSession, BoxError> {
    let minor_units = to_minor_units(amount)?.to_string();
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://api.stripe.com/v1/checkout/sessions")
        .basic_auth(secret_key, None::<&str>)
        .form(&[
            ("mode", "payment"),
            ("client_reference_id", reference_id),
            ("line_items[0][price_data][currency]", currency),
            ("line_items[0][price_data][product_data][name]", "Payment"),
            ("line_items[0][price_data][unit_amount]", &minor_units),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
        ])
        .send()
        .await?
        .json()
        .await?;

    match (resp["id"].as_str(), resp["url"].as_str()) {
        (Some(id), Some(url)) => Ok(CheckoutSession {
            id: id.to_string(),
            url: url.to_string(),
        }),
        _ => Err(format!("Stripe create_checkout failed: {resp}").into()),
    }
}

/// Create a Stripe Customer keyed by the terminal-entered phone number
pub async fn create_customer(
    secret_key: &str,
    phone: &str,
    merchant_id: &str,
) -> Result<String, BoxError> {
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://api.stripe.com/v1/customers")
        .basic_auth(secret_key, None::<&str>)
        .form(&[("phone", phone), ("metadata[merchant_id]", merchant_id)])
        .send()
        .await?
        .json()
        .await?;

    resp["id"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| format!("Stripe create_customer failed: {resp}").into())
}

/// Attach a payment method to a customer for later off-session charges
pub async fn attach_payment_method(
    secret_key: &str,
    payment_method_id: &str,
    customer_id: &str,
) -> Result<(), BoxError> {
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post(format!(
            "https://api.stripe.com/v1/payment_methods/{payment_method_id}/attach"
        ))
        .basic_auth(secret_key, None::<&str>)
        .form(&[("customer", customer_id)])
        .send()
        .await?
        .json()
        .await?;

    if resp["id"].as_str().is_some() {
        Ok(())
    } else {
        Err(format!("Stripe attach_payment_method failed: {resp}").into())
    }
}

/// Charge a saved card off-session via a confirmed PaymentIntent.
/// Returns the PaymentIntent id on success.
pub async fn charge_saved_card(
    secret_key: &str,
    amount: Decimal,
    currency: &str,
    customer_id: &str,
    reference_id: &str,
) -> Result<String, BoxError> {
    let minor_units = to_minor_units(amount)?.to_string();
    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://api.stripe.com/v1/payment_intents")
        .basic_auth(secret_key, None::<&str>)
        .form(&[
            ("amount", minor_units.as_str()),
            ("currency", currency),
            ("customer", customer_id),
            ("off_session", "true"),
            ("confirm", "true"),
            ("metadata[reference_id]", reference_id),
        ])
        .send()
        .await?
        .json()
        .await?;

    match (resp["id"].as_str(), resp["status"].as_str()) {
        (Some(id), Some("succeeded")) => Ok(id.to_string()),
        _ => Err(format!("Stripe charge failed: {resp}").into()),
    }
}

/// Verify Stripe webhook signature (HMAC-SHA256)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err("Invalid Stripe-Signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload.as_bytes());

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    // Reject events older than 5 minutes to prevent replay attacks
    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > 300 {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}
