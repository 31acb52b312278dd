//! Attribute Emission - Single Entry Point
//!
//! CRITICAL: every emission validates against the target's doctype before
//! writing. No bypass.

use std::borrow::Cow;
use std::io::Write;
use thiserror::Error;

use crate::attributes::{self, AttributeDef};
use crate::config::RenderConfig;
use crate::doctype::Doctype;
use crate::encoding::{escape_attribute, write_attribute};
use crate::validation::Validator;
use crate::value::{Fragment, FragmentBuffer, IntoAttributeValue};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Attribute \"{attribute}\" is {requirement}, but the doctype is {doctype}")]
    IncompatibleDoctype {
        attribute: String,
        doctype: Doctype,
        requirement: &'static str,
    },

    #[error("Attribute \"{attribute}\" does not accept {kind} values")]
    UnsupportedValueKind { attribute: String, kind: String },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid attribute name: {0:?}")]
    InvalidAttributeName(String),

    #[error("Invalid element name: {0:?}")]
    InvalidElementName(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Anything attributes can be written onto: a doctype-aware output sink.
///
/// Implementors get the three emission entry points for free.
pub trait Target {
    fn config(&self) -> &RenderConfig;

    fn sink(&mut self) -> &mut dyn Write;

    fn doctype(&self) -> Doctype {
        self.config().doctype
    }

    /// Emit a literal value. `None` and (for trimmed attributes) blank
    /// values write nothing.
    fn attr<'v, V>(&mut self, def: &AttributeDef, value: V) -> Result<&mut Self, EmitError>
    where
        V: IntoAttributeValue<'v>,
    {
        emit(self, def, value)
    }

    /// Emit a value computed now by `supplier`; its error comes back untouched.
    fn attr_with<'v, V, E, F>(&mut self, def: &AttributeDef, supplier: F) -> Result<&mut Self, E>
    where
        V: IntoAttributeValue<'v>,
        F: FnOnce() -> Result<V, E>,
        E: From<EmitError>,
    {
        emit_with(self, def, supplier)
    }

    /// Emit a fragment that writes its own value.
    fn attr_fragment<F>(&mut self, def: &AttributeDef, fragment: Option<&F>) -> Result<&mut Self, F::Error>
    where
        F: Fragment + ?Sized,
        F::Error: From<EmitError>,
    {
        emit_fragment(self, def, fragment)
    }

    /// Emit a built-in attribute looked up by name.
    fn attr_named<'v, V>(&mut self, name: &str, value: V) -> Result<&mut Self, EmitError>
    where
        V: IntoAttributeValue<'v>,
    {
        let def = attributes::lookup(name).ok_or_else(|| EmitError::UnknownAttribute(name.to_string()))?;
        emit(self, def, value)
    }
}

pub fn emit<'t, 'v, T, V>(target: &'t mut T, def: &AttributeDef, value: V) -> Result<&'t mut T, EmitError>
where
    T: Target + ?Sized,
    V: IntoAttributeValue<'v>,
{
    if !def.value_kinds.literal {
        return Err(unsupported(def, "literal"));
    }
    write_literal(target, def, value.into_value())?;
    Ok(target)
}

pub fn emit_with<'t, 'v, T, V, E, F>(target: &'t mut T, def: &AttributeDef, supplier: F) -> Result<&'t mut T, E>
where
    T: Target + ?Sized,
    V: IntoAttributeValue<'v>,
    F: FnOnce() -> Result<V, E>,
    E: From<EmitError>,
{
    if !def.value_kinds.supplier {
        return Err(unsupported(def, "supplier").into());
    }
    // Resolved before validation; a failing supplier wins over a doctype error.
    let value = supplier()?.into_value();
    write_literal(target, def, value)?;
    Ok(target)
}

pub fn emit_fragment<'t, T, F>(target: &'t mut T, def: &AttributeDef, fragment: Option<&F>) -> Result<&'t mut T, F::Error>
where
    T: Target + ?Sized,
    F: Fragment + ?Sized,
    F::Error: From<EmitError>,
{
    check_compatibility(&*target, def)?;

    let Some(fragment) = fragment else {
        return Ok(target);
    };
    let kind = fragment.kind();
    if def.value_kinds.fragment != Some(kind) {
        return Err(unsupported(def, &kind.to_string()).into());
    }

    let mut buffer = FragmentBuffer::default();
    fragment.write_fragment(&mut buffer)?;
    write_attribute(target.sink(), &def.name, buffer.as_escaped()).map_err(EmitError::from)?;
    Ok(target)
}

fn write_literal<T>(target: &mut T, def: &AttributeDef, value: Option<Cow<'_, str>>) -> Result<(), EmitError>
where
    T: Target + ?Sized,
{
    check_compatibility(&*target, def)?;

    if let Some(value) = def.normalizer.apply(value) {
        write_attribute(target.sink(), &def.name, &escape_attribute(&value))?;
    }
    Ok(())
}

fn check_compatibility<T>(target: &T, def: &AttributeDef) -> Result<(), EmitError>
where
    T: Target + ?Sized,
{
    #[cfg(feature = "test-hooks")]
    VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

    let config = target.config();
    Validator::standard().enforce(def, config.doctype, config.deprecation)?;
    Ok(())
}

fn unsupported(def: &AttributeDef, kind: &str) -> EmitError {
    EmitError::UnsupportedValueKind {
        attribute: def.name.to_string(),
        kind: kind.to_string(),
    }
}
