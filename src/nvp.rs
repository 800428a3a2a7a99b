//! Name-value-pair response parsing
//!
//! The gateway answers with a flat `KEY=value&KEY=value&` body. Values are
//! kept exactly as received; [`NvpResponse::get_decoded`] is available when a
//! human-readable form is needed.

use crate::constants::*;
use crate::types::{ErrorEntry, PaymentResponse};
use crate::{PaymentError, Result};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use tracing::warn;

/// Tokenized NVP response body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NvpResponse {
    pairs: Vec<(String, String)>,
}

impl NvpResponse {
    /// Parse a body in which every value, including the last, ends with `&`
    pub fn parse(body: &str) -> Result<Self> {
        Self::parse_with(body, true)
    }

    /// Parse a body, tolerating a missing `&` after the final value
    pub fn parse_lenient(body: &str) -> Result<Self> {
        Self::parse_with(body, false)
    }

    fn parse_with(body: &str, require_terminator: bool) -> Result<Self> {
        let content = match body.strip_suffix('&') {
            Some(content) => content,
            None if body.is_empty() || !require_terminator => body,
            None => {
                return Err(PaymentError::parse(
                    "response body is missing the '&' terminator after the final value",
                ))
            }
        };

        let mut pairs = Vec::new();
        for token in content.split('&').filter(|token| !token.is_empty()) {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                PaymentError::parse(format!("token '{}' has no '=' separator", token))
            })?;

            if key.is_empty() {
                return Err(PaymentError::parse(format!(
                    "token '{}' has an empty key",
                    token
                )));
            }

            pairs.push((key.to_string(), value.to_string()));
        }

        Ok(Self { pairs })
    }

    /// Raw value for an exact key; the first occurrence wins
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Percent-decoded value for an exact key
    pub fn get_decoded(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key)
            .map(|value| percent_decode_str(value).decode_utf8_lossy())
    }

    /// Number of pairs in the body
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over pairs in body order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fill `response` from the acknowledgement, token and error records
    pub fn build_response(&self, mut response: PaymentResponse) -> Result<PaymentResponse> {
        let ack = self
            .get(ACK)
            .ok_or_else(|| PaymentError::protocol("response has no ACK field"))?;

        match ack.to_ascii_lowercase().as_str() {
            SUCCESS => {
                response.successful = true;
                response.error_detected = false;
                response.response_token = self.get(TOKEN).map(String::from);
            }
            SUCCESSWITHWARNING | SUCCESSWITHWARNINGS => {
                response.successful = true;
                response.error_detected = true;
                response.response_token = self.get(TOKEN).map(String::from);
            }
            _ => {
                response.successful = false;
                response.error_detected = true;
            }
        }

        if response.error_detected {
            response.error_responses = self.error_entries();
            response.pass_through_errors = self.pass_through_errors();

            for (index, entry) in response.error_responses.iter().enumerate() {
                warn!(
                    ack = %ack,
                    error_code = entry.error_code.as_deref().unwrap_or_default(),
                    short_message = %self
                        .get_decoded(&indexed(ERRORSHORTMESSAGE, index))
                        .unwrap_or_default(),
                    "PayPal reported an error"
                );
            }
        }

        Ok(response)
    }

    /// Error records `L_ERRORCODE0..`, stopping at the first missing code
    fn error_entries(&self) -> Vec<ErrorEntry> {
        let mut entries = Vec::new();
        let mut index = 0;
        while let Some(code) = self.get(&indexed(ERRORCODE, index)) {
            entries.push(ErrorEntry {
                error_code: Some(code.to_string()),
                short_message: self.owned(&indexed(ERRORSHORTMESSAGE, index)),
                long_message: self.owned(&indexed(ERRORLONGMESSAGE, index)),
                severity_code: self.owned(&indexed(ERRORSEVERITYCODE, index)),
            });
            index += 1;
        }
        entries
    }

    fn pass_through_errors(&self) -> std::collections::HashMap<String, Option<String>> {
        let mut errors = std::collections::HashMap::new();
        let mut index = 0;
        while let Some(name) = self.get(&indexed(ERRORPASSTHROUGHNAME, index)) {
            errors.insert(
                name.to_string(),
                self.owned(&indexed(ERRORPASSTHROUGHVALUE, index)),
            );
            index += 1;
        }
        errors
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(String::from)
    }
}
