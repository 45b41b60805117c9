//! Customer type

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::timestamp::now_millis;
use crate::{MAX_NAME_LEN, MAX_NOTES_LEN};

/// Fewest digits a phone number may have
const MIN_PHONE_DIGITS: usize = 8;
/// Most digits a phone number may have
const MAX_PHONE_DIGITS: usize = 15;

/// A customer, the owner of sheets
///
/// Like [`CustomerSheet`](crate::CustomerSheet), a customer is an immutable
/// value: the `with_*` methods return an edited copy with a fresh
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: Option<String>,
    name: String,
    phone: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    /// Create a customer that has not been persisted yet
    pub fn new<N: AsRef<str>, P: AsRef<str>, T: AsRef<str>>(name: N, phone: P, notes: T) -> Self {
        let now = now_millis();
        Self {
            id: None,
            name: name.as_ref().trim().to_string(),
            phone: phone.as_ref().trim().to_string(),
            notes: notes.as_ref().trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a customer read back from storage
    pub fn from_parts(
        id: Option<String>,
        name: String,
        phone: String,
        notes: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            notes,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Attach the identity the store assigned
    pub fn with_id<S: Into<String>>(&self, id: S) -> Self {
        Self {
            id: Some(id.into()),
            ..self.clone()
        }
    }

    /// Copy with a new name
    pub fn with_name<S: AsRef<str>>(&self, name: S) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            updated_at: self.mutation_time(),
            ..self.clone()
        }
    }

    /// Copy with a new phone number
    pub fn with_phone<S: AsRef<str>>(&self, phone: S) -> Self {
        Self {
            phone: phone.as_ref().trim().to_string(),
            updated_at: self.mutation_time(),
            ..self.clone()
        }
    }

    /// Copy with new notes
    pub fn with_notes<S: AsRef<str>>(&self, notes: S) -> Self {
        Self {
            notes: notes.as_ref().trim().to_string(),
            updated_at: self.mutation_time(),
            ..self.clone()
        }
    }

    fn mutation_time(&self) -> DateTime<Utc> {
        now_millis().max(self.created_at)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Case-insensitive match against name, phone or notes
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        [&self.name, &self.phone, &self.notes]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    // === Validation ===

    /// Whether `name` is 1 to 100 characters after trimming
    pub fn is_valid_name(name: &str) -> bool {
        let len = name.trim().chars().count();
        (1..=MAX_NAME_LEN).contains(&len)
    }

    /// Whether `phone` has 8 to 15 digits once separators are stripped
    ///
    /// Separators are space, `-`, `(`, `)` and `+`; any other character
    /// makes the number invalid.
    pub fn is_valid_phone(phone: &str) -> bool {
        let mut digits = 0;
        for c in phone.trim().chars() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '-' | '(' | ')' | '+' => {}
                _ => return false,
            }
        }
        (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
    }

    /// Check every field, reporting the first problem
    pub fn validate(&self) -> Result<()> {
        if !Self::is_valid_name(&self.name) {
            return Err(Error::InvalidCustomerName(self.name.clone()));
        }
        if !Self::is_valid_phone(&self.phone) {
            return Err(Error::InvalidPhone(self.phone.clone()));
        }
        let notes_len = self.notes.chars().count();
        if notes_len > MAX_NOTES_LEN {
            return Err(Error::TextTooLong {
                field: "notes",
                len: notes_len,
                max: MAX_NOTES_LEN,
            });
        }
        Ok(())
    }

    /// Whether [`Customer::validate`] passes
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims() {
        let c = Customer::new("  Green Acres  ", " 555-123-4567 ", " bulk buyer ");
        assert_eq!(c.name(), "Green Acres");
        assert_eq!(c.phone(), "555-123-4567");
        assert_eq!(c.notes(), "bulk buyer");
        assert!(c.id().is_none());
        assert!(c.is_valid());
    }

    #[test]
    fn test_phone_validation() {
        assert!(Customer::is_valid_phone("12345678"));
        assert!(Customer::is_valid_phone("+1 (555) 123-4567"));
        assert!(Customer::is_valid_phone("123456789012345"));

        assert!(!Customer::is_valid_phone("1234567")); // Too few digits
        assert!(!Customer::is_valid_phone("1234567890123456")); // Too many
        assert!(!Customer::is_valid_phone("555-CALL-NOW"));
        assert!(!Customer::is_valid_phone(""));
    }

    #[test]
    fn test_validate_reports_first_problem() {
        let c = Customer::new("", "1", "");
        assert_eq!(c.validate(), Err(Error::InvalidCustomerName(String::new())));

        let c = Customer::new("Ana", "1", "");
        assert_eq!(c.validate(), Err(Error::InvalidPhone("1".into())));

        let c = Customer::new("Ana", "12345678", "n".repeat(1001));
        assert!(matches!(
            c.validate(),
            Err(Error::TextTooLong { field: "notes", .. })
        ));
    }

    #[test]
    fn test_copy_on_edit() {
        let c = Customer::new("Ana", "12345678", "");
        let renamed = c.with_name("Ana Lima");
        assert_eq!(c.name(), "Ana");
        assert_eq!(renamed.name(), "Ana Lima");
        assert!(renamed.updated_at() >= c.updated_at());
        assert_eq!(renamed.created_at(), c.created_at());

        let edited = renamed.with_phone("87654321").with_notes("prefers email");
        assert_eq!(edited.phone(), "87654321");
        assert_eq!(edited.notes(), "prefers email");
    }

    #[test]
    fn test_matches() {
        let c = Customer::new("Rosa Flores", "99887766", "Orchids only");
        assert!(c.matches(""));
        assert!(c.matches("rosa"));
        assert!(c.matches("8877"));
        assert!(c.matches("ORCHID"));
        assert!(!c.matches("cactus"));
    }
}
