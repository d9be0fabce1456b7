use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::ids::ElementId;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    TextArea,
}

impl FieldKind {
    /// Kinds that honour the `pattern` attribute.
    pub fn supports_pattern(self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Email | FieldKind::Tel)
    }

    pub fn supports_length(self) -> bool {
        !matches!(self, FieldKind::Select)
    }
}

/// An HTML `pattern` attribute: the expression must match the whole value.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, CoreError> {
        let regex =
            Regex::new(&format!("^(?:{source})$")).map_err(|err| CoreError::InvalidPattern {
                pattern: source.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub element: ElementId,
    pub value: String,
    pub default_value: String,
    pub options: Vec<String>,
    pub required: bool,
    pub pattern: Option<Pattern>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub aria_invalid: bool,
    pub caret: usize,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        element: ElementId,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            element,
            value: String::new(),
            default_value: String::new(),
            options: Vec::new(),
            required: false,
            pattern: None,
            min_length: None,
            max_length: None,
            aria_invalid: false,
            caret: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self.set_value(self.default_value.clone());
        self
    }

    /// Id of the paired annotation element.
    pub fn error_id(&self) -> String {
        format!("{}-error", self.name)
    }

    /// Assigns the value and parks the caret after its last character.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.caret = self.value.chars().count();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAnnotation {
    pub hidden: bool,
    pub message: String,
}

impl Default for ErrorAnnotation {
    fn default() -> Self {
        Self {
            hidden: true,
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    fields: Vec<Field>,
    annotations: BTreeMap<String, ErrorAnnotation>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, field: Field) -> Result<(), CoreError> {
        if self.field(&field.name).is_some() {
            return Err(CoreError::DuplicateField(field.name));
        }
        self.annotations
            .insert(field.error_id(), ErrorAnnotation::default());
        self.fields.push(field);
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn field_by_element(&self, element: ElementId) -> Option<&Field> {
        self.fields.iter().find(|field| field.element == element)
    }

    pub fn field_by_element_mut(&mut self, element: ElementId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.element == element)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let field = self
            .field_mut(name)
            .ok_or_else(|| CoreError::UnknownField(name.to_string()))?;
        field.set_value(value);
        Ok(())
    }

    /// Looks up an annotation by element id, e.g. `email-error`.
    pub fn annotation_by_id(&self, error_id: &str) -> Option<&ErrorAnnotation> {
        self.annotations.get(error_id)
    }

    pub fn annotation(&self, field_name: &str) -> Option<&ErrorAnnotation> {
        self.annotations.get(&format!("{field_name}-error"))
    }

    pub fn show_error(&mut self, field_name: &str, message: &str) -> Result<(), CoreError> {
        let position = self
            .fields
            .iter()
            .position(|field| field.name == field_name)
            .ok_or_else(|| CoreError::UnknownField(field_name.to_string()))?;
        self.show_error_at(position, message);
        Ok(())
    }

    /// Annotates the field at `position` in [`Self::fields`]; out-of-range
    /// positions are ignored.
    pub(crate) fn show_error_at(&mut self, position: usize, message: &str) {
        let Some(field) = self.fields.get_mut(position) else {
            return;
        };
        field.aria_invalid = true;
        let annotation = self.annotations.entry(field.error_id()).or_default();
        annotation.hidden = false;
        annotation.message = message.to_string();
    }

    pub fn clear_error(&mut self, field_name: &str) -> Result<(), CoreError> {
        let field = self
            .field_mut(field_name)
            .ok_or_else(|| CoreError::UnknownField(field_name.to_string()))?;
        field.aria_invalid = false;
        let error_id = field.error_id();
        if let Some(annotation) = self.annotations.get_mut(&error_id) {
            *annotation = ErrorAnnotation::default();
        }
        Ok(())
    }

    pub fn clear_all_errors(&mut self) {
        for field in &mut self.fields {
            field.aria_invalid = false;
        }
        for annotation in self.annotations.values_mut() {
            *annotation = ErrorAnnotation::default();
        }
    }

    /// Restores default values. Annotations are cleared as well.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            let default_value = field.default_value.clone();
            field.set_value(default_value);
        }
        self.clear_all_errors();
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldKind, Form, Pattern};
    use crate::domain::{Document, Region, Tag};
    use crate::error::CoreError;

    fn form_with_email() -> Form {
        let mut doc = Document::new();
        let element = doc.insert(Tag::Input, Region::Dialog, "Email");
        let mut form = Form::new();
        form.add_field(Field::new("email", "Email", FieldKind::Email, element).required())
            .expect("add field");
        form
    }

    #[test]
    fn pattern_matches_whole_value() {
        let pattern = Pattern::new(r"\d{3}").expect("pattern");
        assert!(pattern.matches("123"));
        assert!(!pattern.matches("1234"));
        assert!(!pattern.matches("a123"));
    }

    #[test]
    fn pattern_rejects_invalid_regex() {
        let err = Pattern::new("(").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern { .. }));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let mut form = form_with_email();
        let element = form.fields()[0].element;
        let err = form
            .add_field(Field::new("email", "Again", FieldKind::Email, element))
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateField("email".to_string()));
    }

    #[test]
    fn annotations_are_keyed_by_error_id() {
        let mut form = form_with_email();
        assert!(form.annotation_by_id("email-error").expect("annotation").hidden);

        form.show_error("email", "bad").expect("show");
        let annotation = form.annotation_by_id("email-error").expect("annotation");
        assert!(!annotation.hidden);
        assert_eq!(annotation.message, "bad");
        assert!(form.field("email").expect("field").aria_invalid);

        form.clear_error("email").expect("clear");
        let annotation = form.annotation("email").expect("annotation");
        assert!(annotation.hidden);
        assert!(annotation.message.is_empty());
        assert!(!form.field("email").expect("field").aria_invalid);
    }

    #[test]
    fn reset_restores_defaults_and_hides_errors() {
        let mut form = form_with_email();
        form.set_value("email", "ada@example.com").expect("set");
        form.show_error("email", "bad").expect("show");
        form.reset();
        assert_eq!(form.field("email").expect("field").value, "");
        assert!(form.annotation("email").expect("annotation").hidden);
    }

    #[test]
    fn set_value_moves_caret_to_end() {
        let mut form = form_with_email();
        form.set_value("email", "почта@example.com").expect("set");
        assert_eq!(form.field("email").expect("field").caret, 17);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let mut form = form_with_email();
        assert_eq!(
            form.set_value("nope", "x").unwrap_err(),
            CoreError::UnknownField("nope".to_string())
        );
    }
}
