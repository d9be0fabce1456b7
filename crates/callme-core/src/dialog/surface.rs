use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dialog::ReturnValue;

pub const FALLBACK_OPEN_CLASS: &str = "js-fallback-open";
pub const FALLBACK_ROLE: &str = "dialog";

/// What the host offers for modal presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalSupport {
    Native,
    Fallback,
}

impl fmt::Display for ModalSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalSupport::Native => f.write_str("native"),
            ModalSupport::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("dialog is not connected to the document")]
    Detached,
    #[error("dialog is already open without being modal")]
    InvalidState,
}

/// Attribute state of the dialog element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogElement {
    pub open: bool,
    pub modal: bool,
    pub classes: BTreeSet<String>,
    pub role: Option<String>,
    pub return_value: String,
    pub connected: bool,
}

impl Default for DialogElement {
    fn default() -> Self {
        Self {
            open: false,
            modal: false,
            classes: BTreeSet::new(),
            role: None,
            return_value: String::new(),
            connected: true,
        }
    }
}

impl DialogElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

pub trait Surface: fmt::Debug {
    fn kind(&self) -> ModalSupport;
    fn activate(&self, dialog: &mut DialogElement) -> Result<(), SurfaceError>;
    fn deactivate(&self, dialog: &mut DialogElement, result: ReturnValue)
        -> Result<(), SurfaceError>;
}

/// `showModal()` / `close(returnValue)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSurface;

impl Surface for NativeSurface {
    fn kind(&self) -> ModalSupport {
        ModalSupport::Native
    }

    fn activate(&self, dialog: &mut DialogElement) -> Result<(), SurfaceError> {
        if !dialog.connected {
            return Err(SurfaceError::Detached);
        }
        if dialog.open && !dialog.modal {
            return Err(SurfaceError::InvalidState);
        }
        dialog.open = true;
        dialog.modal = true;
        Ok(())
    }

    fn deactivate(
        &self,
        dialog: &mut DialogElement,
        result: ReturnValue,
    ) -> Result<(), SurfaceError> {
        dialog.return_value = result.as_str().to_string();
        if !dialog.connected {
            return Err(SurfaceError::Detached);
        }
        dialog.open = false;
        dialog.modal = false;
        Ok(())
    }
}

/// Attribute, class and role toggling for hosts without native modals.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackSurface;

impl Surface for FallbackSurface {
    fn kind(&self) -> ModalSupport {
        ModalSupport::Fallback
    }

    fn activate(&self, dialog: &mut DialogElement) -> Result<(), SurfaceError> {
        dialog.open = true;
        dialog.classes.insert(FALLBACK_OPEN_CLASS.to_string());
        dialog.role = Some(FALLBACK_ROLE.to_string());
        Ok(())
    }

    fn deactivate(
        &self,
        dialog: &mut DialogElement,
        _result: ReturnValue,
    ) -> Result<(), SurfaceError> {
        dialog.classes.remove(FALLBACK_OPEN_CLASS);
        dialog.role = None;
        dialog.open = false;
        Ok(())
    }
}

pub fn surface_for(support: ModalSupport) -> Box<dyn Surface> {
    match support {
        ModalSupport::Native => Box::new(NativeSurface),
        ModalSupport::Fallback => Box::new(FallbackSurface),
    }
}
