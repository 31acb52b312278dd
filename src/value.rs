//! Attribute Values - Literals, Suppliers and Fragments
//!
//! Literals are anything that coerces to text (or `None` for absent).
//! Suppliers are plain closures returning `Result`, resolved at emission
//! time. Fragments stream their own serialization and skip normalization.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::emit::EmitError;
use crate::encoding::escape_attribute;

/// Coercion of a literal value to attribute text
pub trait IntoAttributeValue<'a> {
    fn into_value(self) -> Option<Cow<'a, str>>;
}

impl<'a> IntoAttributeValue<'a> for &'a str {
    fn into_value(self) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl<'a> IntoAttributeValue<'a> for &'a String {
    fn into_value(self) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl<'a> IntoAttributeValue<'a> for String {
    fn into_value(self) -> Option<Cow<'a, str>> {
        Some(Cow::Owned(self))
    }
}

impl<'a> IntoAttributeValue<'a> for Cow<'a, str> {
    fn into_value(self) -> Option<Cow<'a, str>> {
        Some(self)
    }
}

impl<'a> IntoAttributeValue<'a> for fmt::Arguments<'_> {
    fn into_value(self) -> Option<Cow<'a, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl<'a, T: IntoAttributeValue<'a>> IntoAttributeValue<'a> for Option<T> {
    fn into_value(self) -> Option<Cow<'a, str>> {
        self.and_then(IntoAttributeValue::into_value)
    }
}

macro_rules! display_values {
    ($($ty:ty),*) => {
        $(
            impl<'a> IntoAttributeValue<'a> for $ty {
                fn into_value(self) -> Option<Cow<'a, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

display_values!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    Script,
    Media,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FragmentKind::Script => "script fragment",
            FragmentKind::Media => "media fragment",
        })
    }
}

/// A pre-built unit that writes its own attribute value.
///
/// Whatever it writes is escaped but never trimmed or blanked.
pub trait Fragment {
    type Error;

    fn kind(&self) -> FragmentKind;

    fn write_fragment(&self, out: &mut FragmentBuffer) -> Result<(), Self::Error>;
}

impl<F: Fragment + ?Sized> Fragment for &F {
    type Error = F::Error;

    fn kind(&self) -> FragmentKind {
        (**self).kind()
    }

    fn write_fragment(&self, out: &mut FragmentBuffer) -> Result<(), Self::Error> {
        (**self).write_fragment(out)
    }
}

/// Escaping buffer a fragment renders into before anything reaches the sink
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    escaped: String,
}

impl FragmentBuffer {
    pub fn push_str(&mut self, s: &str) {
        self.escaped.push_str(&escape_attribute(s));
    }

    pub fn push(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.push_str(c.encode_utf8(&mut utf8));
    }

    pub fn is_empty(&self) -> bool {
        self.escaped.is_empty()
    }

    pub fn as_escaped(&self) -> &str {
        &self.escaped
    }
}

impl fmt::Write for FragmentBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// Script source for event handler attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script<'a>(pub Cow<'a, str>);

impl<'a> Script<'a> {
    pub fn new(source: impl Into<Cow<'a, str>>) -> Self {
        Self(source.into())
    }
}

impl Fragment for Script<'_> {
    type Error = EmitError;

    fn kind(&self) -> FragmentKind {
        FragmentKind::Script
    }

    fn write_fragment(&self, out: &mut FragmentBuffer) -> Result<(), Self::Error> {
        out.push_str(&self.0);
        Ok(())
    }
}

/// Media query list, e.g. `screen and (min-width: 40em)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery<'a> {
    queries: Vec<Cow<'a, str>>,
}

impl<'a> MediaQuery<'a> {
    pub fn new(query: impl Into<Cow<'a, str>>) -> Self {
        Self { queries: vec![query.into()] }
    }

    /// Append another query; queries are comma separated
    pub fn or(mut self, query: impl Into<Cow<'a, str>>) -> Self {
        self.queries.push(query.into());
        self
    }
}

impl Fragment for MediaQuery<'_> {
    type Error = EmitError;

    fn kind(&self) -> FragmentKind {
        FragmentKind::Media
    }

    fn write_fragment(&self, out: &mut FragmentBuffer) -> Result<(), Self::Error> {
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(query);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn literal_coercions() {
        assert_eq!("x".into_value().as_deref(), Some("x"));
        assert_eq!(42u32.into_value().as_deref(), Some("42"));
        assert_eq!(true.into_value().as_deref(), Some("true"));
        assert_eq!(None::<&str>.into_value(), None);
        assert_eq!(Some(String::from("y")).into_value().as_deref(), Some("y"));
    }

    #[test]
    fn buffer_escapes_as_it_goes() {
        let mut buffer = FragmentBuffer::default();
        write!(buffer, "go(\"{}\")", 1).unwrap();
        buffer.push('&');
        assert_eq!(buffer.as_escaped(), "go(&quot;1&quot;)&amp;");
    }

    #[test]
    fn media_queries_join_with_commas() {
        let mut buffer = FragmentBuffer::default();
        MediaQuery::new("screen")
            .or("print and (orientation: landscape)")
            .write_fragment(&mut buffer)
            .unwrap();
        assert_eq!(buffer.as_escaped(), "screen, print and (orientation: landscape)");
    }
}
