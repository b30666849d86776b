//! Pre-submit validation for item drafts
//!
//! Runs on the admin side before a draft reaches the synchronizer; a failing
//! draft is never sent. Messages are the exact texts surfaced next to each
//! form field.

use crate::item::ItemDraft;
use std::fmt;

/// One failed field with its user-facing message
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Field path, e.g. `name` or `pricing.1/8`
    pub field: String,
    pub message: String,
}

/// Every validation failure for one draft, in form-field order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Message for a field, if it failed
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (n, error) in self.errors.iter().enumerate() {
            if n > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check a draft against the form rules
///
/// Name, scientific label, description, duration and color must be
/// non-blank, at least one effect tag must be non-blank, and every pricing
/// entry needs a non-blank price. Potency, tier and category are typed
/// enumerations and cannot hold an invalid value here.
pub fn validate_draft(draft: &ItemDraft) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, message: &str| {
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    };

    if is_blank(&draft.name) {
        fail("name", "Name is required");
    }
    if is_blank(&draft.scientific) {
        fail("scientific", "Scientific name is required");
    }
    if is_blank(&draft.description) {
        fail("description", "Description is required");
    }
    if !draft.effects.iter().any(|effect| !is_blank(effect)) {
        fail("effects", "At least one effect is required");
    }
    if is_blank(&draft.duration) {
        fail("duration", "Duration is required");
    }
    if is_blank(&draft.color) {
        fail("color", "Color gradient is required");
    }
    for (label, price) in &draft.pricing {
        if is_blank(price) {
            fail(&format!("pricing.{label}"), "Price required");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;

    fn valid_draft() -> ItemDraft {
        let mut draft = ItemDraft::template(Category::Mushroom);
        draft.name = "Golden Teachers".to_string();
        draft.scientific = "Psilocybe cubensis".to_string();
        draft.description = "Perfect for beginners".to_string();
        draft.effects = vec!["Euphoria".to_string()];
        draft.duration = "4-6 hours".to_string();
        for price in draft.pricing.values_mut() {
            *price = "$20".to_string();
        }
        draft
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_draft(&valid_draft()).is_ok());
    }

    #[test]
    fn test_empty_template_reports_every_required_field() {
        let errors = validate_draft(&ItemDraft::template(Category::Mushroom)).unwrap_err();
        assert_eq!(errors.message_for("name"), Some("Name is required"));
        assert_eq!(
            errors.message_for("scientific"),
            Some("Scientific name is required")
        );
        assert_eq!(
            errors.message_for("description"),
            Some("Description is required")
        );
        assert_eq!(
            errors.message_for("effects"),
            Some("At least one effect is required")
        );
        assert_eq!(errors.message_for("duration"), Some("Duration is required"));
        assert_eq!(errors.message_for("pricing.1/8"), Some("Price required"));
        // The template preselects a gradient, so color passes.
        assert_eq!(errors.message_for("color"), None);
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut draft = valid_draft();
        draft.name = "   ".to_string();
        draft.effects = vec!["  ".to_string()];
        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(errors.message_for("name"), Some("Name is required"));
        assert_eq!(
            errors.message_for("effects"),
            Some("At least one effect is required")
        );
    }

    #[test]
    fn test_each_pricing_entry_needs_a_price() {
        let mut draft = valid_draft();
        draft.pricing.insert("1/4".to_string(), String::new());
        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(errors.message_for("pricing.1/4"), Some("Price required"));
        assert_eq!(errors.message_for("pricing.1/8"), None);
        assert!(errors.to_string().contains("pricing.1/4: Price required"));
    }
}
