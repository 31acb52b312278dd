//! ForgeHtml Core - Fluent HTML Attribute Emitter
//!
//! # The Four Laws (Non-Negotiable)
//! 1. Attributes Are Data
//! 2. Blank Means Absent
//! 3. Doctype Gates, Deprecation Reports
//! 4. Failures Propagate Untouched

pub mod attributes;
pub mod config;
pub mod doctype;
pub mod document;
pub mod emit;
pub mod encoding;
pub mod validation;
pub mod value;

pub use attributes::{AttributeDef, AttributeRegistry, Deprecation, DoctypeConstraint, Normalizer, ValueKinds};
pub use config::{DeprecationPolicy, RenderConfig};
pub use doctype::{Doctype, DoctypeMode, Serialization};
pub use document::{Document, Element};
pub use emit::{emit, emit_fragment, emit_with, EmitError, Target};
pub use validation::{CompatibilityRule, CompatibilityViolation, ValidationResult, Validator, ViolationSeverity};
pub use value::{Fragment, FragmentBuffer, FragmentKind, IntoAttributeValue, MediaQuery, Script};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
