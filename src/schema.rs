//! Structural validation of theme and state-machine documents.
//!
//! Validation is a capability injected into a [`crate::Bundle`]; the crate ships
//! [`BuiltinValidator`], which checks the document shapes the dotLottie players consume and
//! reports every problem it finds with a JSON path.

mod validate;

pub use validate::{BuiltinValidator, DocumentValidator, PathElem, ValidationIssue, ValidationIssues};
