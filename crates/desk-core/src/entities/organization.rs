use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::Id;
use crate::lenient;

/// An organization record as returned by `/organisations` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrganizationRecord")]
pub struct Organization {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Organization {
    /// Fold a server-returned record into this one.
    ///
    /// Required fields are always replaced. Optional fields are replaced only
    /// when the returned record carries them.
    pub fn merge(&mut self, returned: Self) {
        self.id = returned.id;
        self.name = returned.name;
        merge_field(&mut self.email, returned.email);
        merge_field(&mut self.address, returned.address);
        merge_field(&mut self.phone, returned.phone);
        merge_field(&mut self.created_at, returned.created_at);
        merge_field(&mut self.updated_at, returned.updated_at);
    }
}

fn merge_field<T>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

#[derive(Deserialize)]
struct OrganizationRecord {
    id: Id,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    phone: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", deserialize_with = "lenient::timestamp")]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrganizationRecord> for Organization {
    type Error = CoreError;

    fn try_from(record: OrganizationRecord) -> Result<Self, Self::Error> {
        let name = record
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                CoreError::validation(format!("organization {} has no name", record.id))
            })?;

        Ok(Self {
            id: record.id,
            name,
            email: record.email,
            address: record.address,
            phone: record.phone,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Payload for `POST /organisations`. Name and email are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrganization {
    name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl NewOrganization {
    /// Build a create payload, trimming input.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `name` or `email` is blank.
    pub fn new(name: &str, email: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(CoreError::validation(
                "organization name and email are required",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            address: None,
            phone: None,
        })
    }

    #[must_use]
    pub fn with_address(mut self, address: &str) -> Self {
        self.address = blank_to_none(address);
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = blank_to_none(phone);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Partial payload for `PUT /organisations/:id`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl OrganizationUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.phone.is_none()
    }
}

/// Editable form fields for an organization.
///
/// Used for both the create form and the edit form; blank strings stand for
/// "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDraft {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

impl OrganizationDraft {
    /// Validate the draft as a create payload.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if `name` or `email` is blank.
    pub fn to_new(&self) -> Result<NewOrganization, CoreError> {
        Ok(NewOrganization::new(&self.name, &self.email)?
            .with_address(&self.address)
            .with_phone(&self.phone))
    }

    /// Fields that differ from `current`, trimmed.
    #[must_use]
    pub fn changes_from(&self, current: &Organization) -> OrganizationUpdate {
        OrganizationUpdate {
            name: changed(&self.name, Some(current.name.as_str())),
            email: changed(&self.email, current.email.as_deref()),
            address: changed(&self.address, current.address.as_deref()),
            phone: changed(&self.phone, current.phone.as_deref()),
        }
    }
}

impl From<&Organization> for OrganizationDraft {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            email: org.email.clone().unwrap_or_default(),
            address: org.address.clone().unwrap_or_default(),
            phone: org.phone.clone().unwrap_or_default(),
        }
    }
}

fn changed(draft: &str, current: Option<&str>) -> Option<String> {
    let draft = draft.trim();
    (draft != current.unwrap_or_default().trim()).then(|| draft.to_string())
}

fn blank_to_none(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn acme() -> Organization {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Acme Old",
            "email": "old@acme.test",
            "address": "1 Loop Rd",
            "phone": null,
        }))
        .unwrap()
    }

    #[test]
    fn merge_overwrites_present_fields_only() {
        let mut org = acme();
        let returned: Organization = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Acme",
            "email": "x@y.com",
        }))
        .unwrap();

        org.merge(returned);
        assert_eq!(org.name, "Acme");
        assert_eq!(org.email.as_deref(), Some("x@y.com"));
        assert_eq!(org.address.as_deref(), Some("1 Loop Rd"));
        assert!(org.phone.is_none());
    }

    #[test]
    fn rejects_record_without_name() {
        let err = serde_json::from_str::<Organization>(r#"{"id": 1, "name": ""}"#).unwrap_err();
        assert!(err.to_string().contains("has no name"));
    }

    #[test]
    fn new_organization_requires_name_and_email() {
        assert!(NewOrganization::new("", "a@b.com").is_err());
        assert!(NewOrganization::new("Acme", "  ").is_err());
        assert!(NewOrganization::new("Acme", "a@b.com").is_ok());
    }

    #[test]
    fn new_organization_omits_blank_optionals() {
        let payload = NewOrganization::new(" Acme ", "a@b.com")
            .unwrap()
            .with_address("")
            .with_phone("555-0100");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Acme", "email": "a@b.com", "phone": "555-0100"})
        );
    }

    #[test]
    fn draft_changes_include_only_edited_fields() {
        let org = acme();
        let mut draft = OrganizationDraft::from(&org);
        assert!(draft.changes_from(&org).is_empty());

        draft.name = "Acme".into();
        draft.phone = "555".into();
        let update = draft.changes_from(&org);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"name": "Acme", "phone": "555"})
        );
    }

    #[test]
    fn clearing_a_field_sends_empty_string() {
        let org = acme();
        let mut draft = OrganizationDraft::from(&org);
        draft.address.clear();
        let update = draft.changes_from(&org);
        assert_eq!(update.address.as_deref(), Some(""));
    }
}
