pub mod dialog;
pub mod domain;
pub mod error;
pub mod page;
pub mod rules;

pub use dialog::{DialogController, DialogState, ModalSupport, ReturnValue};
pub use domain::*;
pub use error::CoreError;
pub use page::{Page, PageEffect, PageEvent};
pub use rules::*;
