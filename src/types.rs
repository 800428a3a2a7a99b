//! Core types for PayPal NVP payment requests and responses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Transaction type requested by the enclosing checkout workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Authorize,
    Debit,
    AuthorizeAndDebit,
    Credit,
    Void,
    Reverse,
}

/// PayPal call flavour
///
/// Only [`MethodType::Checkout`] is encoded; the other flows are placeholders
/// and produce a credentials-only request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodType {
    Checkout,
    Details,
    Process,
}

impl MethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodType::Checkout => "checkout",
            MethodType::Details => "details",
            MethodType::Process => "process",
        }
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Up/down signal reported to external health checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Up,
    Down,
}

impl ServiceStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, ServiceStatus::Up)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Up => f.write_str("UP"),
            ServiceStatus::Down => f.write_str("DOWN"),
        }
    }
}

/// A single line item on the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Short description, sent as the item name
    pub short_description: String,
    /// Merchant-side item identifier
    pub system_id: String,
    /// Long description
    pub description: String,
    /// Price of one unit
    pub unit_price: Decimal,
    /// Number of units
    pub quantity: u32,
}

impl LineItem {
    /// Create a new line item
    pub fn new(
        short_description: impl Into<String>,
        system_id: impl Into<String>,
        description: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            short_description: short_description.into(),
            system_id: system_id.into(),
            description: description.into(),
            unit_price,
            quantity,
        }
    }
}

/// Order totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub sub_total: Decimal,
    pub total_tax: Decimal,
    pub total_shipping: Decimal,
    /// Magnitude of the shipping discount; the encoder applies the sign
    pub shipping_discount: Decimal,
    pub grand_total: Decimal,
}

/// Outbound payment request for one transaction attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub transaction_type: TransactionType,
    pub method_type: MethodType,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub summary: OrderSummary,
    pub return_url: String,
    pub cancel_url: String,
    /// Vendor-specific extra fields, appended after the URLs
    #[serde(default)]
    pub additional_params: HashMap<String, String>,
}

impl PaymentRequest {
    /// Create a new payment request with no line items
    pub fn new(
        transaction_type: TransactionType,
        method_type: MethodType,
        summary: OrderSummary,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            method_type,
            items: Vec::new(),
            summary,
            return_url: return_url.into(),
            cancel_url: cancel_url.into(),
            additional_params: HashMap::new(),
        }
    }

    /// Append a line item
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add a vendor-specific parameter, replacing any previous value for the key
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }
}

/// Structured error record returned by the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub error_code: Option<String>,
    pub short_message: Option<String>,
    pub long_message: Option<String>,
    pub severity_code: Option<String>,
}

/// Result of one call to the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub transaction_type: TransactionType,
    pub method_type: MethodType,
    pub successful: bool,
    pub error_detected: bool,
    /// Express checkout token, present on success
    pub response_token: Option<String>,
    pub error_responses: Vec<ErrorEntry>,
    pub pass_through_errors: HashMap<String, Option<String>>,
}

impl PaymentResponse {
    /// Create an empty response echoing the request's types
    pub fn new(transaction_type: TransactionType, method_type: MethodType) -> Self {
        Self {
            transaction_type,
            method_type,
            successful: false,
            error_detected: false,
            response_token: None,
            error_responses: Vec::new(),
            pass_through_errors: HashMap::new(),
        }
    }
}
