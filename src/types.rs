//! Core types for the decoy honeypot
//!
//! `AlertEvent` uses the flat snake_case JSON layout the alert receiver
//! expects on the wire: `{alert, table, user, client_ip, timestamp}`.

use crate::error::HoneypotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed message carried by every access alert
pub const ALERT_MESSAGE: &str = "Honeypot table accessed";

/// Placeholder for identity fields the host could not resolve
pub const UNKNOWN: &str = "unknown";

/// Category of fake sensitive value
///
/// `Mixed` is a meta-category: per seed it picks one of the other six
/// and prefixes the value with that category's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    Ssn,
    CreditCard,
    ApiKey,
    Password,
    Email,
    Phone,
    Mixed,
}

impl DataCategory {
    /// The six concrete categories, in `seed mod 6` order
    pub const CONCRETE: [DataCategory; 6] = [
        DataCategory::Ssn,
        DataCategory::CreditCard,
        DataCategory::ApiKey,
        DataCategory::Password,
        DataCategory::Email,
        DataCategory::Phone,
    ];

    /// Human-readable label used as the `Mixed` prefix
    pub fn label(self) -> &'static str {
        match self {
            DataCategory::Ssn => "SSN",
            DataCategory::CreditCard => "Credit Card",
            DataCategory::ApiKey => "API Key",
            DataCategory::Password => "Password",
            DataCategory::Email => "Email",
            DataCategory::Phone => "Phone",
            DataCategory::Mixed => "Mixed",
        }
    }

    /// Canonical snake_case name, as accepted by `FromStr`
    pub fn as_str(self) -> &'static str {
        match self {
            DataCategory::Ssn => "ssn",
            DataCategory::CreditCard => "credit_card",
            DataCategory::ApiKey => "api_key",
            DataCategory::Password => "password",
            DataCategory::Email => "email",
            DataCategory::Phone => "phone",
            DataCategory::Mixed => "mixed",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataCategory {
    type Err = HoneypotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "ssn" => Ok(DataCategory::Ssn),
            "credit_card" | "card" => Ok(DataCategory::CreditCard),
            "api_key" | "key" => Ok(DataCategory::ApiKey),
            "password" => Ok(DataCategory::Password),
            "email" => Ok(DataCategory::Email),
            "phone" => Ok(DataCategory::Phone),
            "mixed" => Ok(DataCategory::Mixed),
            _ => Err(HoneypotError::UnknownCategory(s.to_string())),
        }
    }
}

/// One decoy row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecord {
    /// Row id; also the generation seed for `sensitive_data`
    pub id: i64,

    /// Fake sensitive value
    pub sensitive_data: String,

    /// Wall-clock time the row was observed, not generated
    pub created_at: DateTime<Utc>,
}

impl GeneratedRecord {
    /// Build a record stamped with the current time
    pub fn new(id: i64, sensitive_data: impl Into<String>) -> Self {
        Self {
            id,
            sensitive_data: sensitive_data.into(),
            created_at: Utc::now(),
        }
    }
}

/// Who touched a decoy, as far as the host can tell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessIdentity {
    /// Session user name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Network origin of the connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_addr: Option<String>,
}

impl AccessIdentity {
    /// Identity from optional user name and client address
    pub fn new(user_name: Option<&str>, client_addr: Option<&str>) -> Self {
        Self {
            user_name: user_name.map(str::to_string),
            client_addr: client_addr.map(str::to_string),
        }
    }
}

/// Access alert payload
///
/// Constructed fresh per access and never persisted by the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Always `"Honeypot table accessed"` when produced by the monitor
    #[serde(default = "default_alert_message")]
    pub alert: String,

    /// Decoy object that was read
    #[serde(rename = "table")]
    pub table_name: String,

    /// Reading user, or `"unknown"`
    #[serde(rename = "user", default = "default_unknown")]
    pub user_name: String,

    /// Client address, or `"unknown"`
    #[serde(rename = "client_ip", default = "default_unknown")]
    pub client_addr: String,

    /// RFC 3339 wall-clock time of the access
    #[serde(default)]
    pub timestamp: String,
}

fn default_alert_message() -> String {
    ALERT_MESSAGE.to_string()
}

fn default_unknown() -> String {
    UNKNOWN.to_string()
}

impl AlertEvent {
    /// Build an alert for an access happening now
    ///
    /// Missing or empty identity fields resolve to `"unknown"`.
    pub fn new(table_name: &str, user_name: Option<&str>, client_addr: Option<&str>) -> Self {
        Self {
            alert: ALERT_MESSAGE.to_string(),
            table_name: table_name.to_string(),
            user_name: or_unknown(user_name),
            client_addr: or_unknown(client_addr),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_name() {
        for category in DataCategory::CONCRETE
            .iter()
            .copied()
            .chain([DataCategory::Mixed])
        {
            assert_eq!(category.as_str().parse::<DataCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_parse_is_lenient() {
        assert_eq!("Credit-Card".parse::<DataCategory>().unwrap(), DataCategory::CreditCard);
        assert_eq!(" API key ".parse::<DataCategory>().unwrap(), DataCategory::ApiKey);
        assert!(matches!(
            "iban".parse::<DataCategory>(),
            Err(HoneypotError::UnknownCategory(name)) if name == "iban"
        ));
    }

    #[test]
    fn test_alert_event_defaults_identity_to_unknown() {
        let alert = AlertEvent::new("customers", None, Some("  "));
        assert_eq!(alert.alert, ALERT_MESSAGE);
        assert_eq!(alert.user_name, "unknown");
        assert_eq!(alert.client_addr, "unknown");
        assert!(DateTime::parse_from_rfc3339(&alert.timestamp).is_ok());
    }

    #[test]
    fn test_alert_event_wire_layout() {
        let alert = AlertEvent::new("customers", Some("mallory"), Some("10.0.0.7"));
        let json = serde_json::to_value(&alert).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 5);
        assert_eq!(json["alert"], "Honeypot table accessed");
        assert_eq!(json["table"], "customers");
        assert_eq!(json["user"], "mallory");
        assert_eq!(json["client_ip"], "10.0.0.7");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_alert_event_accepts_sparse_payload() {
        let alert: AlertEvent = serde_json::from_str(r#"{"table":"payroll"}"#).unwrap();
        assert_eq!(alert.alert, ALERT_MESSAGE);
        assert_eq!(alert.table_name, "payroll");
        assert_eq!(alert.user_name, "unknown");
        assert_eq!(alert.client_addr, "unknown");
        assert!(alert.timestamp.is_empty());
    }
}
