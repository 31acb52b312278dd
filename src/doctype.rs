//! Doctype Model - Which HTML Version Governs a Document

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared HTML version of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Doctype {
    #[default]
    Html5,
    #[serde(alias = "html4")]
    Html4Strict,
    Html4Transitional,
    Html4Frameset,
    /// No doctype declaration at all
    None,
}

/// The two states attribute validation cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoctypeMode {
    Html5,
    Legacy,
}

impl Doctype {
    pub const ALL: [Doctype; 5] = [
        Doctype::Html5,
        Doctype::Html4Strict,
        Doctype::Html4Transitional,
        Doctype::Html4Frameset,
        Doctype::None,
    ];

    pub fn mode(self) -> DoctypeMode {
        match self {
            Doctype::Html5 => DoctypeMode::Html5,
            _ => DoctypeMode::Legacy,
        }
    }

    pub fn is_html5(self) -> bool {
        self.mode() == DoctypeMode::Html5
    }

    /// Document type declaration, if this doctype has one
    pub fn declaration(self) -> Option<&'static str> {
        match self {
            Doctype::Html5 => Some("<!DOCTYPE html>"),
            Doctype::Html4Strict => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
            ),
            Doctype::Html4Transitional => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#,
            ),
            Doctype::Html4Frameset => Some(
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN" "http://www.w3.org/TR/html4/frameset.dtd">"#,
            ),
            Doctype::None => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Doctype::Html5 => "html5",
            Doctype::Html4Strict => "html4-strict",
            Doctype::Html4Transitional => "html4-transitional",
            Doctype::Html4Frameset => "html4-frameset",
            Doctype::None => "none",
        }
    }
}

impl fmt::Display for Doctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Doctype::Html5 => "HTML5",
            Doctype::Html4Strict => "HTML4 Strict",
            Doctype::Html4Transitional => "HTML4 Transitional",
            Doctype::Html4Frameset => "HTML4 Frameset",
            Doctype::None => "no doctype",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown doctype: {0}")]
pub struct UnknownDoctype(pub String);

impl FromStr for Doctype {
    type Err = UnknownDoctype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "html4" {
            return Ok(Doctype::Html4Strict);
        }
        Doctype::ALL
            .into_iter()
            .find(|d| d.key() == wanted)
            .ok_or_else(|| UnknownDoctype(s.to_string()))
    }
}

/// Markup serialization style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Serialization {
    #[default]
    Sgml,
    Xml,
}

impl Serialization {
    /// Terminator written after the attributes of a void element
    pub fn void_close(self) -> &'static str {
        match self {
            Serialization::Sgml => ">",
            Serialization::Xml => " />",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_html5_is_html5_mode() {
        for doctype in Doctype::ALL {
            assert_eq!(doctype.is_html5(), doctype == Doctype::Html5);
        }
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("html4".parse::<Doctype>().unwrap(), Doctype::Html4Strict);
        assert_eq!("HTML5".parse::<Doctype>().unwrap(), Doctype::Html5);
        assert_eq!(
            "html4-frameset".parse::<Doctype>().unwrap(),
            Doctype::Html4Frameset
        );
        assert!("xhtml2".parse::<Doctype>().is_err());
    }

    #[test]
    fn legacy_display_names_mention_html4() {
        for doctype in [
            Doctype::Html4Strict,
            Doctype::Html4Transitional,
            Doctype::Html4Frameset,
        ] {
            assert!(doctype.to_string().contains("HTML4"));
        }
    }

    #[test]
    fn serde_accepts_html4_alias() {
        let d: Doctype = serde_json::from_str(r#""html4""#).unwrap();
        assert_eq!(d, Doctype::Html4Strict);
        assert_eq!(serde_json::to_string(&Doctype::Html5).unwrap(), r#""html5""#);
    }
}
