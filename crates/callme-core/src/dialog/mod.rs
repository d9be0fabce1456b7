//! Open/close lifecycle of the contact dialog.
//!
//! The presentation strategy ([`Surface`]) is picked once from
//! [`ModalSupport`]. Every open-state change is pushed straight to the
//! document: the `main` landmark is hidden from assistive technology while
//! the dialog is open, and dialog content stops being focusable while it is
//! closed.

pub mod surface;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{Document, ElementId};

pub use surface::{
    surface_for, DialogElement, FallbackSurface, ModalSupport, NativeSurface, Surface,
    SurfaceError, FALLBACK_OPEN_CLASS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnValue {
    #[default]
    Cancel,
    Success,
}

impl ReturnValue {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnValue::Cancel => "cancel",
            ReturnValue::Success => "success",
        }
    }
}

impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogState {
    Closed,
    Open,
}

#[derive(Debug)]
pub struct DialogController {
    element: DialogElement,
    surface: Box<dyn Surface>,
    last_active: Option<ElementId>,
    result: Option<ReturnValue>,
}

impl DialogController {
    pub fn new(support: ModalSupport) -> Self {
        Self::with_surface(surface_for(support))
    }

    pub fn with_surface(surface: Box<dyn Surface>) -> Self {
        Self {
            element: DialogElement::default(),
            surface,
            last_active: None,
            result: None,
        }
    }

    /// Brings the document in line with the current open state. Call once
    /// after the dialog markup has been inserted.
    pub fn attach(&self, doc: &mut Document) {
        self.notify(doc);
    }

    pub fn state(&self) -> DialogState {
        if self.element.open {
            DialogState::Open
        } else {
            DialogState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.element.open
    }

    pub fn support(&self) -> ModalSupport {
        self.surface.kind()
    }

    /// Outcome recorded by the most recent close.
    pub fn result(&self) -> Option<ReturnValue> {
        self.result
    }

    pub fn element(&self) -> &DialogElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut DialogElement {
        &mut self.element
    }

    pub fn open(&mut self, doc: &mut Document) {
        // Re-opening keeps the original focus memory; it never stacks.
        if !self.element.open {
            self.last_active = doc.active_element();
        }

        if let Err(err) = self.surface.activate(&mut self.element) {
            debug!(
                error = %err,
                surface = %self.surface.kind(),
                "modal activation failed, using open attribute"
            );
            self.element.open = true;
        }
        self.notify(doc);

        if let Some(first) = doc.first_dialog_control() {
            doc.focus(first);
        }
    }

    pub fn close(&mut self, doc: &mut Document, result: ReturnValue) {
        if let Err(err) = self.surface.deactivate(&mut self.element, result) {
            debug!(
                error = %err,
                surface = %self.surface.kind(),
                "modal close failed, removing open attribute"
            );
            self.element.classes.remove(FALLBACK_OPEN_CLASS);
            self.element.role = None;
            self.element.open = false;
        }
        if !self.element.open {
            self.element.modal = false;
        }
        self.result = Some(result);
        self.notify(doc);

        if let Some(previous) = self.last_active.take() {
            if !doc.focus(previous) {
                trace!(element = %previous, "previous focus target is gone");
            }
        }
    }

    fn notify(&self, doc: &mut Document) {
        let open = self.element.open;
        doc.main_mut().set_hidden(open);
        doc.set_dialog_hidden(!open);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DialogController, DialogElement, DialogState, ModalSupport, ReturnValue, Surface,
        SurfaceError, FALLBACK_OPEN_CLASS,
    };
    use crate::domain::{Document, ElementId, Region, Tag};

    struct Page {
        doc: Document,
        opener: ElementId,
        first: ElementId,
    }

    fn page() -> Page {
        let mut doc = Document::new();
        let opener = doc.insert(Tag::Button, Region::Main, "Open");
        let first = doc.insert(Tag::Input, Region::Dialog, "Name");
        doc.insert(Tag::Button, Region::Dialog, "Close");
        Page { doc, opener, first }
    }

    fn attached(support: ModalSupport, page: &mut Page) -> DialogController {
        let controller = DialogController::new(support);
        controller.attach(&mut page.doc);
        page.doc.focus(page.opener);
        controller
    }

    #[test]
    fn open_then_close_round_trips_focus() {
        for support in [ModalSupport::Native, ModalSupport::Fallback] {
            let mut page = page();
            let mut dialog = attached(support, &mut page);

            dialog.open(&mut page.doc);
            assert_eq!(dialog.state(), DialogState::Open);
            assert_eq!(page.doc.active_element(), Some(page.first));
            assert!(page.doc.main().is_hidden());

            dialog.close(&mut page.doc, ReturnValue::Cancel);
            assert_eq!(dialog.state(), DialogState::Closed);
            assert_eq!(dialog.result(), Some(ReturnValue::Cancel));
            assert_eq!(page.doc.active_element(), Some(page.opener));
            assert!(!page.doc.main().is_hidden());
        }
    }

    #[test]
    fn fallback_keeps_class_consistent_with_open_attribute() {
        let mut page = page();
        let mut dialog = attached(ModalSupport::Fallback, &mut page);
        dialog.open(&mut page.doc);
        assert!(dialog.element().open);
        assert!(dialog.element().has_class(FALLBACK_OPEN_CLASS));
        assert_eq!(dialog.element().role.as_deref(), Some("dialog"));

        dialog.close(&mut page.doc, ReturnValue::Success);
        assert!(!dialog.element().open);
        assert!(!dialog.element().has_class(FALLBACK_OPEN_CLASS));
        assert_eq!(dialog.element().role, None);
        assert_eq!(dialog.result(), Some(ReturnValue::Success));
    }

    #[test]
    fn native_activation_failure_falls_back_to_attribute() {
        let mut page = page();
        let mut dialog = attached(ModalSupport::Native, &mut page);
        dialog.element_mut().connected = false;

        dialog.open(&mut page.doc);
        assert_eq!(dialog.state(), DialogState::Open);
        assert!(!dialog.element().modal);
        assert!(page.doc.main().is_hidden());
        assert_eq!(page.doc.active_element(), Some(page.first));

        dialog.close(&mut page.doc, ReturnValue::Cancel);
        assert_eq!(dialog.state(), DialogState::Closed);
        assert!(!page.doc.main().is_hidden());
    }

    #[test]
    fn native_close_records_return_value() {
        let mut page = page();
        let mut dialog = attached(ModalSupport::Native, &mut page);
        dialog.open(&mut page.doc);
        dialog.close(&mut page.doc, ReturnValue::Success);
        assert_eq!(dialog.element().return_value, "success");
    }

    #[test]
    fn reopening_does_not_stack_focus_memory() {
        let mut page = page();
        let mut dialog = attached(ModalSupport::Native, &mut page);
        dialog.open(&mut page.doc);
        dialog.open(&mut page.doc);
        assert_eq!(page.doc.active_element(), Some(page.first));

        dialog.close(&mut page.doc, ReturnValue::Cancel);
        assert_eq!(page.doc.active_element(), Some(page.opener));
    }

    #[test]
    fn focus_is_not_restored_to_removed_element() {
        let mut page = page();
        let mut dialog = attached(ModalSupport::Native, &mut page);
        dialog.open(&mut page.doc);
        page.doc.detach(page.opener).expect("detach");

        dialog.close(&mut page.doc, ReturnValue::Cancel);
        assert_eq!(page.doc.active_element(), None);
    }

    #[test]
    fn closing_a_closed_dialog_is_harmless() {
        let mut page = page();
        let mut dialog = attached(ModalSupport::Fallback, &mut page);
        dialog.close(&mut page.doc, ReturnValue::Cancel);
        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(page.doc.active_element(), Some(page.opener));
    }

    #[test]
    fn attach_hides_dialog_content() {
        let mut page = page();
        let _dialog = attached(ModalSupport::Native, &mut page);
        assert!(!page.doc.focus(page.first));
    }

    #[derive(Debug)]
    struct Broken;

    impl Surface for Broken {
        fn kind(&self) -> ModalSupport {
            ModalSupport::Native
        }

        fn activate(&self, _dialog: &mut DialogElement) -> Result<(), SurfaceError> {
            Err(SurfaceError::InvalidState)
        }

        fn deactivate(
            &self,
            _dialog: &mut DialogElement,
            _result: ReturnValue,
        ) -> Result<(), SurfaceError> {
            Err(SurfaceError::Detached)
        }
    }

    #[test]
    fn surface_errors_never_leave_inconsistent_state() {
        let mut page = page();
        let mut dialog = DialogController::with_surface(Box::new(Broken));
        dialog.attach(&mut page.doc);

        dialog.open(&mut page.doc);
        assert!(dialog.is_open());
        assert!(page.doc.main().is_hidden());

        dialog.close(&mut page.doc, ReturnValue::Cancel);
        assert!(!dialog.is_open());
        assert!(!page.doc.main().is_hidden());
        assert_eq!(dialog.result(), Some(ReturnValue::Cancel));
    }
}
