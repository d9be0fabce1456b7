pub mod focus_trap;
pub mod validation;

pub use focus_trap::{trap_focus, Key, TrapOutcome};
pub use validation::{
    field_validity, validate_form, FieldViolation, Messages, ValidationReport, Validity, Violation,
};
