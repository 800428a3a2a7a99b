//! Request encoding into ordered name-value pairs

use crate::config::Credentials;
use crate::constants::*;
use crate::types::{MethodType, OrderSummary, PaymentRequest};
use rust_decimal::Decimal;
use tracing::warn;

/// Ordered list of form fields for one gateway call
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NvpRequest {
    pairs: Vec<(String, String)>,
}

impl NvpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Position of `key` in the field order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Fields in wire order
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }
}

impl std::fmt::Debug for NvpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.pairs.iter().map(|(k, v)| {
                let shown = if k == PASSWORD || k == SIGNATURE {
                    "<redacted>"
                } else {
                    v.as_str()
                };
                (k.as_str(), shown)
            }))
            .finish()
    }
}

/// Builds the NVP field list for a payment request
#[derive(Debug, Clone)]
pub struct RequestEncoder {
    credentials: Credentials,
    lib_version: String,
}

impl RequestEncoder {
    pub fn new(credentials: Credentials, lib_version: impl Into<String>) -> Self {
        Self {
            credentials,
            lib_version: lib_version.into(),
        }
    }

    /// Encode `request`; credentials always lead, then the method-specific fields
    pub fn encode(&self, request: &PaymentRequest) -> NvpRequest {
        let mut nvps = NvpRequest::new();
        self.set_credentials(&mut nvps);

        match request.method_type {
            MethodType::Checkout => set_nvps_for_checkout(&mut nvps, request),
            // TODO: encode GetExpressCheckoutDetails and DoExpressCheckoutPayment
            MethodType::Details | MethodType::Process => {
                warn!(
                    method = %request.method_type,
                    "method type is not implemented; sending credentials only"
                );
            }
        }

        nvps
    }

    fn set_credentials(&self, nvps: &mut NvpRequest) {
        nvps.push(USER, self.credentials.user.as_str());
        nvps.push(PASSWORD, self.credentials.password.as_str());
        nvps.push(SIGNATURE, self.credentials.signature.as_str());
        nvps.push(VERSION, self.lib_version.as_str());
    }
}

fn set_nvps_for_checkout(nvps: &mut NvpRequest, request: &PaymentRequest) {
    nvps.push(PAYMENTACTION, SALEACTION);

    set_cost_nvps(nvps, request);

    nvps.push(RETURNURL, request.return_url.as_str());
    nvps.push(CANCELURL, request.cancel_url.as_str());
    for (key, value) in &request.additional_params {
        nvps.push(key.as_str(), value.as_str());
    }
    nvps.push(METHOD, EXPRESSCHECKOUTACTION);
}

fn set_cost_nvps(nvps: &mut NvpRequest, request: &PaymentRequest) {
    for (index, item) in request.items.iter().enumerate() {
        nvps.push(indexed(NAMEREQUEST, index), item.short_description.as_str());
        nvps.push(indexed(NUMBERREQUEST, index), item.system_id.as_str());
        nvps.push(indexed(DESCRIPTIONREQUEST, index), item.description.as_str());
        nvps.push(indexed(AMOUNTREQUEST, index), item.unit_price.to_string());
        nvps.push(indexed(QUANTITYREQUEST, index), item.quantity.to_string());
    }

    let summary: &OrderSummary = &request.summary;
    nvps.push(SUBTOTALREQUEST, summary.sub_total.to_string());
    nvps.push(TAXREQUEST, summary.total_tax.to_string());
    nvps.push(SHIPPINGREQUEST, summary.total_shipping.to_string());
    nvps.push(
        SHIPPINGDISCOUNTREQUEST,
        negated_discount(summary.shipping_discount),
    );
    nvps.push(GRANDTOTALREQUEST, summary.grand_total.to_string());
}

/// Discounts go out negative regardless of the sign they arrive with
fn negated_discount(discount: Decimal) -> String {
    if discount.is_zero() {
        discount.abs().to_string()
    } else {
        format!("-{}", discount.abs())
    }
}
