pub mod document;
pub mod email;
pub mod form;
pub mod ids;
pub mod phone;

pub use document::{Document, Element, Landmark, Region, Tag};
pub use email::is_valid_email;
pub use form::{ErrorAnnotation, Field, FieldKind, Form, Pattern};
pub use ids::ElementId;
pub use phone::{format_phone, phone_digits, MAX_PHONE_DIGITS};
