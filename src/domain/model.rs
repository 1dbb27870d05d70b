use crate::utils::error::{EntregadorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS: &str = "pending";

/// A parcel arrival for one apartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub apartment_number: String,
    pub package_type: String,
    pub urgency: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Delivery {
    pub fn new(
        apartment_number: impl Into<String>,
        package_type: impl Into<String>,
        urgency: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            apartment_number: apartment_number.into(),
            package_type: package_type.into(),
            urgency: urgency.into(),
            status: status.into(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// A store has assigned identity and both timestamps.
    pub fn is_persisted(&self) -> bool {
        self.id().is_some() && self.created_at.is_some() && self.updated_at.is_some()
    }

    /// Copy with a fresh UUID and both timestamps set, keeping any the caller supplied.
    pub fn stamped(&self) -> Delivery {
        let now = Utc::now();
        let mut persisted = self.clone();
        persisted.id = Some(uuid::Uuid::new_v4().to_string());
        persisted.created_at = Some(self.created_at.unwrap_or(now));
        persisted.updated_at = Some(self.updated_at.unwrap_or(now));
        persisted
    }
}

/// Untrusted registration input as it arrives from the HTTP or CLI layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    #[serde(alias = "ApNum", alias = "apNum")]
    pub apartment_number: String,
    #[serde(default, alias = "PackageType", alias = "packageType")]
    pub package_type: String,
    #[serde(default, alias = "Urgency")]
    pub urgency: String,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
}

impl DeliveryRequest {
    pub fn validate(&self) -> Result<()> {
        if self.apartment_number.trim().is_empty() {
            return Err(EntregadorError::ValidationError {
                message: "apartment_number is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn into_delivery(self, default_status: &str) -> Delivery {
        let status = self
            .status
            .filter(|status| !status.trim().is_empty())
            .unwrap_or_else(|| default_status.to_string());

        Delivery::new(
            self.apartment_number.trim(),
            self.package_type,
            self.urgency,
            status,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub name: String,
    pub phone: String,
}

impl Occupant {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// Occupants registered to one apartment. An empty list is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub apartment_number: String,
    #[serde(default)]
    pub occupants: Vec<Occupant>,
}

impl Resident {
    pub fn new(apartment_number: impl Into<String>, occupants: Vec<Occupant>) -> Self {
        Self {
            apartment_number: apartment_number.into(),
            occupants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_original_field_names() {
        let request: DeliveryRequest = serde_json::from_value(serde_json::json!({
            "ApNum": "101",
            "PackageType": "Envelope",
            "Urgency": "normal"
        }))
        .unwrap();

        assert_eq!(request.apartment_number, "101");
        assert_eq!(request.package_type, "Envelope");
        assert_eq!(request.status, None);
    }

    #[test]
    fn test_into_delivery_applies_default_status() {
        let request = DeliveryRequest {
            apartment_number: " 101 ".to_string(),
            package_type: "Envelope".to_string(),
            urgency: "normal".to_string(),
            status: Some("  ".to_string()),
        };

        let delivery = request.into_delivery(DEFAULT_STATUS);
        assert_eq!(delivery.apartment_number, "101");
        assert_eq!(delivery.status, "pending");
        assert!(delivery.id.is_none());
        assert!(!delivery.is_persisted());
    }

    #[test]
    fn test_into_delivery_keeps_caller_status() {
        let request = DeliveryRequest {
            apartment_number: "202".to_string(),
            status: Some("received".to_string()),
            ..Default::default()
        };

        assert_eq!(request.into_delivery(DEFAULT_STATUS).status, "received");
    }

    #[test]
    fn test_validate_rejects_blank_apartment() {
        let request = DeliveryRequest {
            apartment_number: "   ".to_string(),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_is_persisted_requires_id_and_timestamps() {
        let mut delivery = Delivery::new("101", "Box", "high", "pending");
        delivery.id = Some(String::new());
        delivery.created_at = Some(Utc::now());
        delivery.updated_at = Some(Utc::now());
        assert!(!delivery.is_persisted());

        delivery.id = Some("abc".to_string());
        assert!(delivery.is_persisted());
    }

    #[test]
    fn test_stamped_assigns_identity_and_keeps_caller_timestamps() {
        let created = Utc::now() - chrono::Duration::minutes(5);
        let mut delivery = Delivery::new("101", "Box", "high", "pending");
        delivery.created_at = Some(created);

        let first = delivery.stamped();
        let second = delivery.stamped();

        assert!(first.is_persisted());
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, Some(created));
        assert!(first.updated_at.unwrap() >= created);
        assert!(!delivery.is_persisted());
    }
}
