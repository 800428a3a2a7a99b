//! NVP field names and fixed values used on the wire

// Credentials and protocol
pub const USER: &str = "USER";
pub const PASSWORD: &str = "PWD";
pub const SIGNATURE: &str = "SIGNATURE";
pub const VERSION: &str = "VERSION";
pub const METHOD: &str = "METHOD";

// Checkout request
pub const PAYMENTACTION: &str = "PAYMENTACTION";
pub const SALEACTION: &str = "Sale";
pub const EXPRESSCHECKOUTACTION: &str = "SetExpressCheckout";
pub const RETURNURL: &str = "RETURNURL";
pub const CANCELURL: &str = "CANCELURL";

// Line items, suffixed with the item index
pub const NAMEREQUEST: &str = "L_NAME";
pub const NUMBERREQUEST: &str = "L_NUMBER";
pub const DESCRIPTIONREQUEST: &str = "L_DESC";
pub const AMOUNTREQUEST: &str = "L_AMT";
pub const QUANTITYREQUEST: &str = "L_QTY";

// Order summary
pub const SUBTOTALREQUEST: &str = "ITEMAMT";
pub const TAXREQUEST: &str = "TAXAMT";
pub const SHIPPINGREQUEST: &str = "SHIPPINGAMT";
pub const SHIPPINGDISCOUNTREQUEST: &str = "SHIPDISCAMT";
pub const GRANDTOTALREQUEST: &str = "AMT";

// Response
pub const ACK: &str = "ACK";
pub const TOKEN: &str = "TOKEN";
pub const SUCCESS: &str = "success";
pub const SUCCESSWITHWARNING: &str = "successwithwarning";
pub const SUCCESSWITHWARNINGS: &str = "successwithwarnings";

// Error records, suffixed with the error index
pub const ERRORCODE: &str = "L_ERRORCODE";
pub const ERRORSHORTMESSAGE: &str = "L_SHORTMESSAGE";
pub const ERRORLONGMESSAGE: &str = "L_LONGMESSAGE";
pub const ERRORSEVERITYCODE: &str = "L_SEVERITYCODE";
pub const ERRORPASSTHROUGHNAME: &str = "L_ERRORPARAMID";
pub const ERRORPASSTHROUGHVALUE: &str = "L_ERRORPARAMVALUE";

/// Build an indexed field name such as `L_NAME0`
pub fn indexed(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index)
}
