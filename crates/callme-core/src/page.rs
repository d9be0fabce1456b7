//! The contact page and its event handlers.
//!
//! A [`Page`] owns the document, the form and the dialog controller and
//! routes [`PageEvent`]s the way the page's listeners would: trigger
//! buttons open/close the dialog, submit validates, input on the phone field
//! re-applies the mask, and key presses go through the focus trap.

use tracing::debug;

use crate::dialog::{DialogController, ModalSupport, ReturnValue};
use crate::domain::{
    format_phone, Document, ElementId, Field, FieldKind, Form, Pattern, Region, Tag,
};
use crate::error::CoreError;
use crate::rules::{trap_focus, validate_form, Key, Messages, TrapOutcome, ValidationReport};

pub const DEFAULT_ACKNOWLEDGEMENT: &str = "Форма успешно отправлена!";
pub const PHONE_PATTERN: &str = r"\+7 \(\d{3}\) \d{3}-\d{2}-\d{2}";
pub const TOPICS: [&str; 3] = ["Консультация", "Сотрудничество", "Другое"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Click(ElementId),
    /// Click on the dialog's own box outside its content.
    BackdropClick,
    Submit,
    Input { element: ElementId, value: String },
    KeyDown(Key),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    DialogOpened,
    DialogClosed(ReturnValue),
    Rejected(ValidationReport),
    Acknowledged(String),
}

#[derive(Debug, Clone)]
pub struct PageSettings {
    pub support: ModalSupport,
    pub messages: Messages,
    pub acknowledgement: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            support: ModalSupport::Native,
            messages: Messages::default(),
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_string(),
        }
    }
}

/// Element ids of the page's fixed controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub intro_link: ElementId,
    pub open_button: ElementId,
    pub submit_button: ElementId,
    pub close_button: ElementId,
}

#[derive(Debug)]
pub struct Page {
    doc: Document,
    form: Form,
    dialog: DialogController,
    controls: Controls,
    messages: Messages,
    acknowledgement: String,
}

impl Page {
    /// Builds the contact page: an intro link and the trigger button in
    /// `main`, then the dialog with its form.
    pub fn contact_page(settings: PageSettings) -> Result<Self, CoreError> {
        let mut doc = Document::new();
        let mut form = Form::new();

        let intro_link = doc.insert(Tag::Anchor { href: true }, Region::Main, "About us");
        let open_button = doc.insert(Tag::Button, Region::Main, "Request a call");

        let name = doc.insert(Tag::Input, Region::Dialog, "Name");
        form.add_field(
            Field::new("name", "Name", FieldKind::Text, name)
                .required()
                .with_max_length(100),
        )?;
        let email = doc.insert(Tag::Input, Region::Dialog, "Email");
        form.add_field(Field::new("email", "Email", FieldKind::Email, email).required())?;
        let phone = doc.insert(Tag::Input, Region::Dialog, "Phone");
        form.add_field(
            Field::new("phone", "Phone", FieldKind::Tel, phone)
                .required()
                .with_pattern(Pattern::new(PHONE_PATTERN)?),
        )?;
        let topic = doc.insert(Tag::Select, Region::Dialog, "Topic");
        form.add_field(
            Field::new("topic", "Topic", FieldKind::Select, topic)
                .required()
                .with_options(TOPICS),
        )?;
        let message = doc.insert(Tag::TextArea, Region::Dialog, "Message");
        form.add_field(
            Field::new("message", "Message", FieldKind::TextArea, message).with_max_length(1000),
        )?;

        let submit_button = doc.insert(Tag::Button, Region::Dialog, "Send");
        let close_button = doc.insert(Tag::Button, Region::Dialog, "Cancel");

        let dialog = DialogController::new(settings.support);
        dialog.attach(&mut doc);

        Ok(Self {
            doc,
            form,
            dialog,
            controls: Controls {
                intro_link,
                open_button,
                submit_button,
                close_button,
            },
            messages: settings.messages,
            acknowledgement: settings.acknowledgement,
        })
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn dialog(&self) -> &DialogController {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut DialogController {
        &mut self.dialog
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    /// The form field holding focus, if any.
    pub fn focused_field(&self) -> Option<&Field> {
        let active = self.doc.active_element()?;
        self.form.field_by_element(active)
    }

    pub fn handle(&mut self, event: PageEvent) -> Vec<PageEffect> {
        match event {
            PageEvent::Click(element) => self.click(element),
            PageEvent::BackdropClick => {
                if self.dialog.is_open() && self.dialog.support() == ModalSupport::Native {
                    self.close(ReturnValue::Cancel)
                } else {
                    Vec::new()
                }
            }
            PageEvent::Submit => self.submit(),
            PageEvent::Input { element, value } => {
                self.input(element, value);
                Vec::new()
            }
            PageEvent::KeyDown(key) => self.key_down(key),
        }
    }

    /// Runs the same checks as a submit without acknowledging or closing.
    pub fn validate(&mut self) -> ValidationReport {
        validate_form(&mut self.form, &mut self.doc, &self.messages)
    }

    fn open(&mut self) -> Vec<PageEffect> {
        self.dialog.open(&mut self.doc);
        vec![PageEffect::DialogOpened]
    }

    fn close(&mut self, result: ReturnValue) -> Vec<PageEffect> {
        self.dialog.close(&mut self.doc, result);
        vec![PageEffect::DialogClosed(result)]
    }

    fn click(&mut self, element: ElementId) -> Vec<PageEffect> {
        let Some(target) = self.doc.get(element) else {
            return Vec::new();
        };
        let reachable = match target.region {
            Region::Dialog => self.dialog.is_open(),
            // A modal dialog makes the rest of the page inert.
            Region::Main => !self.dialog.element().modal,
        };
        if !target.connected || target.disabled || !reachable {
            return Vec::new();
        }

        if element == self.controls.open_button {
            self.open()
        } else if element == self.controls.close_button {
            self.close(ReturnValue::Cancel)
        } else if element == self.controls.submit_button {
            self.submit()
        } else {
            self.doc.focus(element);
            Vec::new()
        }
    }

    fn submit(&mut self) -> Vec<PageEffect> {
        if !self.dialog.is_open() {
            return Vec::new();
        }
        self.form.clear_all_errors();
        let report = self.validate();
        if !report.valid {
            return vec![PageEffect::Rejected(report)];
        }

        debug!("contact form accepted");
        let mut effects = vec![PageEffect::Acknowledged(self.acknowledgement.clone())];
        effects.extend(self.close(ReturnValue::Success));
        self.form.reset();
        effects
    }

    fn input(&mut self, element: ElementId, value: String) {
        let Some(field) = self.form.field_by_element_mut(element) else {
            return;
        };
        if field.kind == FieldKind::Tel {
            field.set_value(format_phone(&value));
        } else {
            field.set_value(value);
        }
    }

    fn key_down(&mut self, key: Key) -> Vec<PageEffect> {
        if !self.dialog.is_open() {
            return Vec::new();
        }
        match trap_focus(&mut self.doc, true, key) {
            TrapOutcome::Cancel => self.close(ReturnValue::Cancel),
            TrapOutcome::Wrapped(_) => Vec::new(),
            TrapOutcome::Pass => self.default_key_action(key),
        }
    }

    fn default_key_action(&mut self, key: Key) -> Vec<PageEffect> {
        match key {
            Key::Tab { shift } => {
                self.doc.focus_step(Some(Region::Dialog), shift);
                Vec::new()
            }
            Key::Enter => {
                let Some(active) = self.doc.active_element() else {
                    return Vec::new();
                };
                if self.doc.get(active).is_some_and(|el| el.tag == Tag::Button) {
                    return self.click(active);
                }
                // Implicit submission from single-line inputs.
                match self.form.field_by_element(active).map(|field| field.kind) {
                    Some(FieldKind::Text | FieldKind::Email | FieldKind::Tel) => self.submit(),
                    _ => Vec::new(),
                }
            }
            Key::Escape | Key::Other => Vec::new(),
        }
    }
}
