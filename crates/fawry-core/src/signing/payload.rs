//! Outbound payloads and the signed envelope handed to the transport.

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;

use super::format::fixed_decimal;
use crate::Result;

/// Key under which the signature is injected.
pub const SIGNATURE_KEY: &str = "signature";

/// A single outbound value.
#[derive(Debug, Clone)]
pub enum PayloadValue {
    /// Encoded as a JSON string.
    Text(String),
    Integer(i64),
    /// Encoded as a bare JSON number with two decimals (`150.00`).
    Amount(Decimal),
    /// Already-encoded JSON, embedded verbatim rather than escaped as a string.
    Raw(Box<RawValue>),
}

impl PayloadValue {
    /// Embed `value` as a pre-serialized JSON sub-document.
    #[allow(clippy::result_large_err)]
    pub fn raw_json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(PayloadValue::Raw(serde_json::value::to_raw_value(value)?))
    }

    /// Text form used in query strings.
    pub fn to_query_value(&self) -> String {
        match self {
            PayloadValue::Text(s) => s.clone(),
            PayloadValue::Integer(i) => i.to_string(),
            PayloadValue::Amount(d) => fixed_decimal(*d, 2),
            PayloadValue::Raw(raw) => raw.get().to_string(),
        }
    }
}

impl Serialize for PayloadValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PayloadValue::Text(s) => serializer.serialize_str(s),
            PayloadValue::Integer(i) => serializer.serialize_i64(*i),
            PayloadValue::Amount(d) => {
                let raw = RawValue::from_string(fixed_decimal(*d, 2))
                    .map_err(serde::ser::Error::custom)?;
                raw.serialize(serializer)
            }
            PayloadValue::Raw(raw) => raw.serialize(serializer),
        }
    }
}

/// Insertion-ordered wire fields of a request, before signing.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: Vec<(&'static str, PayloadValue)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, PayloadValue::Text(value.into())));
        self
    }

    /// Append a text field; `None` leaves the field out of the payload.
    pub fn opt_text(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn integer(mut self, name: &'static str, value: i64) -> Self {
        self.fields.push((name, PayloadValue::Integer(value)));
        self
    }

    pub fn opt_integer(self, name: &'static str, value: Option<i64>) -> Self {
        match value {
            Some(value) => self.integer(name, value),
            None => self,
        }
    }

    pub fn amount(mut self, name: &'static str, value: Decimal) -> Self {
        self.fields.push((name, PayloadValue::Amount(value)));
        self
    }

    /// Append a list or object as embedded raw JSON.
    #[allow(clippy::result_large_err)]
    pub fn json<T: Serialize + ?Sized>(mut self, name: &'static str, value: &T) -> Result<Self> {
        self.fields.push((name, PayloadValue::raw_json(value)?));
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&PayloadValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Attach `signature` under [`SIGNATURE_KEY`], replacing any previous value.
    pub fn into_signed(mut self, signature: String) -> SignedEnvelope {
        self.fields.retain(|(name, _)| *name != SIGNATURE_KEY);
        self.fields
            .push((SIGNATURE_KEY, PayloadValue::Text(signature.clone())));
        SignedEnvelope {
            fields: self.fields,
            signature,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_fields(&self.fields, serializer)
    }
}

/// Outbound payload with its signature injected, ready for the transport.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    fields: Vec<(&'static str, PayloadValue)>,
    signature: String,
}

impl SignedEnvelope {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn get(&self, name: &str) -> Option<&PayloadValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// JSON body for POST operations.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// `key=value` pairs in field order, for GET and DELETE operations.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (*name, value.to_query_value()))
            .collect()
    }

    /// Form-encoded query string (`a=1&b=2`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.query_pairs() {
            serializer.append_pair(name, &value);
        }
        serializer.finish()
    }
}

impl Serialize for SignedEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_fields(&self.fields, serializer)
    }
}

fn serialize_fields<S: Serializer>(
    fields: &[(&'static str, PayloadValue)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_preserves_field_order() {
        let envelope = Payload::new()
            .text("merchantCode", "M1")
            .integer("merchantRefNum", 7)
            .amount("refundAmount", Decimal::from(150))
            .into_signed("abc".to_string());

        assert_eq!(
            envelope.to_json().unwrap(),
            r#"{"merchantCode":"M1","merchantRefNum":7,"refundAmount":150.00,"signature":"abc"}"#
        );
    }

    #[test]
    fn test_raw_json_is_not_double_encoded() {
        let items = vec![json!({"itemId": 1, "price": 350.0})];
        let envelope = Payload::new()
            .json("chargeItems", &items)
            .unwrap()
            .into_signed("sig".to_string());

        let body = envelope.to_json().unwrap();
        assert_eq!(body, r#"{"chargeItems":[{"itemId":1,"price":350.0}],"signature":"sig"}"#);

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(parsed["chargeItems"].is_array());
    }

    #[test]
    fn test_absent_optional_fields_are_left_out() {
        let payload = Payload::new()
            .text("merchantCode", "M1")
            .opt_text("reason", None::<String>)
            .opt_integer("expiryHours", None);
        assert_eq!(payload.len(), 1);
        assert!(payload.get("reason").is_none());
    }

    #[test]
    fn test_query_string_is_form_encoded() {
        let envelope = Payload::new()
            .text("merchantCode", "1tSa6uxz2nQsUE4afeg7uA==")
            .text("customerProfileId", "p 1")
            .into_signed("deadbeef".to_string());

        assert_eq!(
            envelope.to_query_string(),
            "merchantCode=1tSa6uxz2nQsUE4afeg7uA%3D%3D&customerProfileId=p+1&signature=deadbeef"
        );
        assert_eq!(envelope.query_pairs()[0].1, "1tSa6uxz2nQsUE4afeg7uA==");
    }

    #[test]
    fn test_signature_injected_once() {
        let envelope = Payload::new()
            .text("signature", "stale")
            .text("merchantCode", "M1")
            .into_signed("fresh".to_string());

        assert_eq!(envelope.names().collect::<Vec<_>>(), vec!["merchantCode", "signature"]);
        assert_eq!(envelope.signature(), "fresh");
    }
}
