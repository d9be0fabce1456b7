//! Constraint validation for the contact form, modelled on the browser's
//! `ValidityState` flags.

use serde::Serialize;
use tracing::debug;

use crate::domain::{is_valid_email, Document, ElementId, Field, FieldKind, Form};

pub const DEFAULT_REQUIRED_MESSAGE: &str = "Это поле обязательно";
pub const DEFAULT_EMAIL_MESSAGE: &str = "Введите корректный email";
pub const DEFAULT_PATTERN_MESSAGE: &str = "Неверный формат";
pub const DEFAULT_INVALID_MESSAGE: &str = "Неверное значение";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Validity {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_short: bool,
    pub too_long: bool,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_short
            || self.too_long)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    Required,
    Email,
    Pattern,
    Invalid,
}

impl Violation {
    /// Picks the reported failure when several flags are raised at once.
    pub fn classify(validity: &Validity, kind: FieldKind) -> Option<Self> {
        if validity.is_valid() {
            None
        } else if validity.value_missing {
            Some(Violation::Required)
        } else if validity.type_mismatch && kind == FieldKind::Email {
            Some(Violation::Email)
        } else if validity.pattern_mismatch {
            Some(Violation::Pattern)
        } else {
            Some(Violation::Invalid)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub required: String,
    pub email: String,
    pub pattern: String,
    pub invalid: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            required: DEFAULT_REQUIRED_MESSAGE.to_string(),
            email: DEFAULT_EMAIL_MESSAGE.to_string(),
            pattern: DEFAULT_PATTERN_MESSAGE.to_string(),
            invalid: DEFAULT_INVALID_MESSAGE.to_string(),
        }
    }
}

impl Messages {
    pub fn for_violation(&self, violation: Violation) -> &str {
        match violation {
            Violation::Required => &self.required,
            Violation::Email => &self.email,
            Violation::Pattern => &self.pattern,
            Violation::Invalid => &self.invalid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub name: String,
    pub error_id: String,
    pub violation: Violation,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<FieldViolation>,
    #[serde(skip)]
    pub first_invalid: Option<ElementId>,
}

/// Validity of a single field. Disabled fields are barred from constraint
/// validation and always come back valid.
pub fn field_validity(field: &Field, disabled: bool) -> Validity {
    let mut validity = Validity::default();
    if disabled {
        return validity;
    }

    // Email inputs strip leading and trailing ASCII whitespace from their value.
    let value = match field.kind {
        FieldKind::Email => field.value.trim_matches(|ch: char| ch.is_ascii_whitespace()),
        _ => field.value.as_str(),
    };

    if value.is_empty() {
        validity.value_missing = field.required;
        return validity;
    }

    if field.kind == FieldKind::Email {
        validity.type_mismatch = !is_valid_email(value);
    }
    if field.kind == FieldKind::Select && !field.options.iter().any(|o| *o == field.value) {
        validity.type_mismatch = true;
    }

    if field.kind.supports_pattern() {
        if let Some(pattern) = &field.pattern {
            validity.pattern_mismatch = !pattern.matches(value);
        }
    }

    if field.kind.supports_length() {
        let len = value.chars().count();
        validity.too_short = field.min_length.is_some_and(|min| len < min);
        validity.too_long = field.max_length.is_some_and(|max| len > max);
    }

    validity
}

/// Clears previous annotations, validates every field, annotates the
/// failures and focuses the first invalid field.
pub fn validate_form(form: &mut Form, doc: &mut Document, messages: &Messages) -> ValidationReport {
    let mut violations = Vec::new();
    let mut first_invalid = None;

    form.clear_all_errors();
    let failed: Vec<(usize, ElementId, FieldViolation)> = form
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(position, field)| {
            let disabled = doc.get(field.element).is_some_and(|element| element.disabled);
            let violation = Violation::classify(&field_validity(field, disabled), field.kind)?;
            let failure = FieldViolation {
                name: field.name.clone(),
                error_id: field.error_id(),
                violation,
                message: messages.for_violation(violation).to_string(),
            };
            Some((position, field.element, failure))
        })
        .collect();

    for (position, element, failure) in failed {
        form.show_error_at(position, &failure.message);
        first_invalid.get_or_insert(element);
        violations.push(failure);
    }

    if let Some(element) = first_invalid {
        debug!(invalid = violations.len(), "form validation failed");
        doc.focus(element);
    }

    ValidationReport {
        valid: violations.is_empty(),
        violations,
        first_invalid,
    }
}
