//! The ticket record, its request shapes, and validation.
//!
//! Validation is explicit: handlers call [`CreateTicket::validate`] or
//! [`UpdateTicket::validate`] before touching the store, and both return the
//! exact value the store is allowed to write. Timestamps are stamped there
//! too, so the write path carries no hidden hooks.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum title length, in characters.
pub const MIN_TITLE_LEN: usize = 5;
/// Minimum description length, in characters.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// A client-caused rejection of a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required and must be at least 5 characters")]
    TitleRequired,

    #[error("Description is required and must be at least 10 characters")]
    DescriptionRequired,

    #[error("Title must be at least 5 characters")]
    TitleTooShort,

    #[error("Description must be at least 10 characters")]
    DescriptionTooShort,

    #[error("Invalid status. Must be Open, In Progress, or Closed")]
    InvalidStatus,
}

/// Lifecycle state of a ticket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// Wire representation, e.g. `"In Progress"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open       => "Open",
            Self::InProgress => "In Progress",
            Self::Closed     => "Closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(ValidationError::InvalidStatus)
    }
}

/// A stored ticket, as returned by the store and sent on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Applies a validated change set in place.
    ///
    /// `updated_at` never moves backwards, even if the clock did, so it also
    /// never falls behind `created_at`.
    pub fn apply(&mut self, changes: &TicketChanges) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = changes.updated_at.max(self.updated_at);
    }
}

/// A ticket that passed validation but has no id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketDraft {
    pub fn into_ticket(self, id: String) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Body of `POST /api/tickets`.
///
/// Fields are optional so that a missing field is a validation error rather
/// than a parse error. Any `status` sent by the client is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTicket {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CreateTicket {
    /// Checks the mandatory fields and stamps both timestamps with `now`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<TicketDraft, ValidationError> {
        let title = self.title
            .filter(|t| long_enough(t, MIN_TITLE_LEN))
            .ok_or(ValidationError::TitleRequired)?;
        let description = self.description
            .filter(|d| long_enough(d, MIN_DESCRIPTION_LEN))
            .ok_or(ValidationError::DescriptionRequired)?;

        Ok(TicketDraft {
            title,
            description,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Body of `PUT /api/tickets/{id}`. Absent and `null` fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl UpdateTicket {
    /// Checks whichever fields are present and stamps `updated_at` with `now`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<TicketChanges, ValidationError> {
        if self.title.as_deref().is_some_and(|t| !long_enough(t, MIN_TITLE_LEN)) {
            return Err(ValidationError::TitleTooShort);
        }
        if self.description.as_deref().is_some_and(|d| !long_enough(d, MIN_DESCRIPTION_LEN)) {
            return Err(ValidationError::DescriptionTooShort);
        }
        let status = self.status.as_deref().map(str::parse::<TicketStatus>).transpose()?;

        Ok(TicketChanges {
            title: self.title,
            description: self.description,
            status,
            updated_at: now,
        })
    }
}

/// A validated partial update: exactly the supplied fields plus the
/// refreshed `updated_at`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub updated_at: DateTime<Utc>,
}

// Counts Unicode scalar values, not UTF-16 code units: "😀😀😀" is three
// characters here, where a JavaScript `.length` check would see six.
fn long_enough(s: &str, min: usize) -> bool {
    s.chars().count() >= min
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create(title: Option<&str>, description: Option<&str>) -> CreateTicket {
        CreateTicket {
            title: title.map(str::to_owned),
            description: description.map(str::to_owned),
        }
    }

    #[test]
    fn valid_create_defaults_to_open_with_equal_timestamps() {
        let now = Utc::now();
        let draft = create(Some("Login issue"), Some("User cannot log in to the system."))
            .validate(now)
            .unwrap();
        assert_eq!(draft.status, TicketStatus::Open);
        assert_eq!(draft.created_at, now);
        assert_eq!(draft.updated_at, now);
    }

    #[test]
    fn create_requires_title_and_description() {
        let now = Utc::now();
        assert_eq!(
            create(None, Some("User cannot log in.")).validate(now),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            create(Some("Bug"), Some("User cannot log in.")).validate(now),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            create(Some("Login issue"), None).validate(now),
            Err(ValidationError::DescriptionRequired)
        );
        assert_eq!(
            create(Some("Login issue"), Some("too short")).validate(now),
            Err(ValidationError::DescriptionRequired)
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // five characters, ten bytes
        let draft = create(Some("ééééé"), Some("0123456789")).validate(Utc::now());
        assert!(draft.is_ok());
    }

    #[test]
    fn update_validates_only_present_fields() {
        let now = Utc::now();
        let changes = UpdateTicket { status: Some("Closed".into()), ..Default::default() }
            .validate(now)
            .unwrap();
        assert_eq!(changes.title, None);
        assert_eq!(changes.description, None);
        assert_eq!(changes.status, Some(TicketStatus::Closed));
        assert_eq!(changes.updated_at, now);
    }

    #[test]
    fn update_rejects_short_or_empty_fields() {
        let now = Utc::now();
        let short_title = UpdateTicket { title: Some(String::new()), ..Default::default() };
        assert_eq!(short_title.validate(now), Err(ValidationError::TitleTooShort));

        let short_desc = UpdateTicket { description: Some("brief".into()), ..Default::default() };
        assert_eq!(short_desc.validate(now), Err(ValidationError::DescriptionTooShort));
    }

    #[test]
    fn update_rejects_unknown_status() {
        let bad = UpdateTicket { status: Some("Resolved".into()), ..Default::default() };
        assert_eq!(bad.validate(Utc::now()), Err(ValidationError::InvalidStatus));

        let lowercase = UpdateTicket { status: Some("open".into()), ..Default::default() };
        assert_eq!(lowercase.validate(Utc::now()), Err(ValidationError::InvalidStatus));
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let created = Utc::now();
        let mut ticket = create(Some("Login issue"), Some("User cannot log in to the system."))
            .validate(created)
            .unwrap()
            .into_ticket("t-1".into());

        let changes = TicketChanges {
            title: None,
            description: Some("Issue is being investigated.".into()),
            status: Some(TicketStatus::InProgress),
            updated_at: created + Duration::seconds(5),
        };
        ticket.apply(&changes);

        assert_eq!(ticket.title, "Login issue");
        assert_eq!(ticket.description, "Issue is being investigated.");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.created_at, created);
        assert_eq!(ticket.updated_at, created + Duration::seconds(5));
    }

    #[test]
    fn apply_never_moves_updated_at_before_created_at() {
        let created = Utc::now();
        let mut ticket = create(Some("Login issue"), Some("User cannot log in to the system."))
            .validate(created)
            .unwrap()
            .into_ticket("t-1".into());
        ticket.apply(&TicketChanges {
            title: None,
            description: None,
            status: None,
            updated_at: created - Duration::seconds(30),
        });
        assert_eq!(ticket.updated_at, created);
    }

    #[test]
    fn lengths_count_characters_not_utf16_units() {
        let now = Utc::now();
        assert!(create(Some("😀😀😀😀😀"), Some("User cannot log in.")).validate(now).is_ok());
        assert_eq!(
            create(Some("😀😀😀😀"), Some("User cannot log in.")).validate(now).unwrap_err(),
            ValidationError::TitleRequired
        );
    }

    #[test]
    fn apply_never_moves_updated_at_backwards() {
        let created = Utc::now();
        let mut ticket = create(Some("Login issue"), Some("User cannot log in to the system."))
            .validate(created)
            .unwrap()
            .into_ticket("t-1".into());
        let later = created + Duration::seconds(10);
        let stamp = |updated_at| TicketChanges { title: None, description: None, status: None, updated_at };

        ticket.apply(&stamp(later));
        assert_eq!(ticket.updated_at, later);

        ticket.apply(&stamp(created + Duration::seconds(5)));
        assert_eq!(ticket.updated_at, later);
    }

    #[test]
    fn serializes_with_camel_case_and_spaced_status() {
        let now = Utc::now();
        let mut ticket = create(Some("Login issue"), Some("User cannot log in to the system."))
            .validate(now)
            .unwrap()
            .into_ticket("abc".into());
        ticket.status = TicketStatus::InProgress;

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["status"], "In Progress");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());

        let back: Ticket = serde_json::from_value(value).unwrap();
        assert_eq!(back, ticket);
    }
}
