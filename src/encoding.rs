//! Output Encoding - Escaping for Attribute Values and Text

use std::borrow::Cow;
use std::io::{self, Write};

/// Escape a value for use inside a double-quoted attribute.
///
/// Borrows when nothing needs escaping.
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    escape_with(input, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

/// Escape character data between tags
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape_with(input, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

fn escape_with(input: &str, entity: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = input.find(|c| entity(c).is_some()) else {
        return Cow::Borrowed(input);
    };

    let mut escaped = String::with_capacity(input.len() + 8);
    escaped.push_str(&input[..first]);
    for c in input[first..].chars() {
        match entity(c) {
            Some(replacement) => escaped.push_str(replacement),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// ` name="value"` for an already escaped value
pub fn attribute_markup(name: &str, escaped_value: &str) -> String {
    let mut markup = String::with_capacity(name.len() + escaped_value.len() + 4);
    markup.push(' ');
    markup.push_str(name);
    markup.push_str("=\"");
    markup.push_str(escaped_value);
    markup.push('"');
    markup
}

/// Write one attribute with a single call so a failing sink never
/// sees half an attribute from us.
pub fn write_attribute(out: &mut dyn Write, name: &str, escaped_value: &str) -> io::Result<()> {
    out.write_all(attribute_markup(name, escaped_value).as_bytes())
}
