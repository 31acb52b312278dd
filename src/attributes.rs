//! Attribute Table - One Definition Per Attribute
//!
//! Every attribute is data: its name, the value shapes it admits, how literal
//! values are normalized, which doctypes allow it and whether it is
//! deprecated. A single emission routine is driven by these definitions.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::doctype::Doctype;
use crate::emit::EmitError;
use crate::value::FragmentKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDef {
    pub name: Cow<'static, str>,
    #[serde(default)]
    pub normalizer: Normalizer,
    #[serde(default)]
    pub constraint: DoctypeConstraint,
    #[serde(default)]
    pub deprecation: Option<Deprecation>,
    #[serde(default)]
    pub value_kinds: ValueKinds,
}

impl AttributeDef {
    /// A plain text attribute usable in every doctype.
    ///
    /// Fails when `name` could not be written as an attribute name.
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Result<Self, EmitError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(EmitError::InvalidAttributeName(name.into_owned()));
        }
        Ok(Self {
            name,
            normalizer: Normalizer::default(),
            constraint: DoctypeConstraint::default(),
            deprecation: None,
            value_kinds: ValueKinds::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    pub fn allows(&self, doctype: Doctype) -> bool {
        self.constraint.allows(doctype)
    }
}

/// Literal value normalization applied before writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalizer {
    /// Trim whitespace; blank values omit the attribute
    #[default]
    TrimToAbsent,
    /// Whitespace is significant; empty values are still written
    Passthrough,
}

impl Normalizer {
    pub fn apply<'a>(self, value: Option<Cow<'a, str>>) -> Option<Cow<'a, str>> {
        match self {
            Normalizer::Passthrough => value,
            Normalizer::TrimToAbsent => value.and_then(trim_to_absent),
        }
    }
}

// ASCII controls and space only; U+00A0 and other Unicode spaces are content.
fn trim_control(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

fn trim_to_absent(value: Cow<'_, str>) -> Option<Cow<'_, str>> {
    match value {
        Cow::Borrowed(s) => {
            let trimmed = trim_control(s);
            (!trimmed.is_empty()).then_some(Cow::Borrowed(trimmed))
        }
        Cow::Owned(s) => {
            let trimmed = trim_control(&s);
            if trimmed.is_empty() {
                None
            } else if trimmed.len() == s.len() {
                Some(Cow::Owned(s))
            } else {
                Some(Cow::Owned(trimmed.to_string()))
            }
        }
    }
}

/// Which doctypes accept an attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DoctypeConstraint {
    #[default]
    Any,
    Html5Only,
    RemovedInHtml5,
}

impl DoctypeConstraint {
    pub fn allows(self, doctype: Doctype) -> bool {
        match self {
            DoctypeConstraint::Any => true,
            DoctypeConstraint::Html5Only => doctype.is_html5(),
            DoctypeConstraint::RemovedInHtml5 => !doctype.is_html5(),
        }
    }

    pub fn requirement(self) -> &'static str {
        match self {
            DoctypeConstraint::Any => "supported in every doctype",
            DoctypeConstraint::Html5Only => "only supported in HTML5",
            DoctypeConstraint::RemovedInHtml5 => "not supported in HTML5",
        }
    }
}

/// Deprecation note. Never blocks emission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deprecation {
    /// Attribute (or technique) to use instead
    #[serde(default)]
    pub replacement: Option<Cow<'static, str>>,
    /// Element the attribute is semantically expected on. Not enforced.
    #[serde(default)]
    pub expected_on: Option<Cow<'static, str>>,
}

impl Deprecation {
    pub const fn replaced_by(replacement: &'static str) -> Self {
        Self {
            replacement: Some(Cow::Borrowed(replacement)),
            expected_on: None,
        }
    }

    pub const fn expected_on(element: &'static str) -> Self {
        Self {
            replacement: None,
            expected_on: Some(Cow::Borrowed(element)),
        }
    }
}

/// Value shapes an attribute admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueKinds {
    #[serde(default = "default_true")]
    pub literal: bool,
    #[serde(default = "default_true")]
    pub supplier: bool,
    #[serde(default)]
    pub fragment: Option<FragmentKind>,
}

fn default_true() -> bool {
    true
}

impl ValueKinds {
    pub const TEXT: ValueKinds = ValueKinds {
        literal: true,
        supplier: true,
        fragment: None,
    };
    pub const SCRIPT: ValueKinds = ValueKinds {
        literal: true,
        supplier: true,
        fragment: Some(FragmentKind::Script),
    };
    pub const MEDIA: ValueKinds = ValueKinds {
        literal: true,
        supplier: true,
        fragment: Some(FragmentKind::Media),
    };
}

impl Default for ValueKinds {
    fn default() -> Self {
        Self::TEXT
    }
}

/// Whether `name` can be written as `name="..."` without breaking the tag.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '>' | '<' | '/' | '=' | '&')
        })
}

macro_rules! attribute {
    ($name:literal, $kinds:expr, $constraint:expr, $normalizer:expr, $deprecation:expr) => {
        AttributeDef {
            name: Cow::Borrowed($name),
            normalizer: $normalizer,
            constraint: $constraint,
            deprecation: $deprecation,
            value_kinds: $kinds,
        }
    };
}

macro_rules! text {
    ($name:literal) => {
        attribute!($name, ValueKinds::TEXT, DoctypeConstraint::Any, Normalizer::TrimToAbsent, None)
    };
}

macro_rules! event {
    ($name:literal) => {
        event!($name, DoctypeConstraint::Html5Only)
    };
    ($name:literal, $constraint:expr) => {
        attribute!($name, ValueKinds::SCRIPT, $constraint, Normalizer::TrimToAbsent, None)
    };
}

// Window handlers: global in HTML5, but only meaningful on <body>.
macro_rules! body_event {
    ($name:literal) => {
        body_event!($name, DoctypeConstraint::Html5Only)
    };
    ($name:literal, $constraint:expr) => {
        attribute!(
            $name,
            ValueKinds::SCRIPT,
            $constraint,
            Normalizer::TrimToAbsent,
            Some(Deprecation::expected_on("body"))
        )
    };
}

macro_rules! attribute_table {
    ($( $ident:ident = $def:expr; )*) => {
        $( pub static $ident: AttributeDef = $def; )*

        /// Every built-in attribute, sorted by name
        pub static BUILTIN: &[&AttributeDef] = &[ $( &$ident ),* ];
    };
}

use self::DoctypeConstraint::Any;

attribute_table! {
    ACCESSKEY = text!("accesskey");
    ALIGN = attribute!(
        "align",
        ValueKinds::TEXT,
        DoctypeConstraint::RemovedInHtml5,
        Normalizer::TrimToAbsent,
        Some(Deprecation::replaced_by("style"))
    );
    ALT = attribute!("alt", ValueKinds::TEXT, Any, Normalizer::Passthrough, None);
    CLASS = text!("class");
    ID = text!("id");
    LANG = text!("lang");
    MEDIA = attribute!("media", ValueKinds::MEDIA, Any, Normalizer::TrimToAbsent, None);
    ONABORT = event!("onabort");
    ONAFTERPRINT = body_event!("onafterprint");
    ONAUXCLICK = event!("onauxclick");
    ONBEFOREPRINT = body_event!("onbeforeprint");
    ONBEFOREUNLOAD = body_event!("onbeforeunload");
    ONBLUR = event!("onblur", Any);
    ONCANCEL = event!("oncancel");
    ONCANPLAY = event!("oncanplay");
    ONCANPLAYTHROUGH = event!("oncanplaythrough");
    ONCHANGE = event!("onchange", Any);
    ONCLICK = event!("onclick", Any);
    ONCLOSE = event!("onclose");
    ONCONTEXTMENU = event!("oncontextmenu");
    ONCOPY = event!("oncopy");
    ONCUECHANGE = event!("oncuechange");
    ONCUT = event!("oncut");
    ONDBLCLICK = event!("ondblclick", Any);
    ONDRAG = event!("ondrag");
    ONDRAGEND = event!("ondragend");
    ONDRAGENTER = event!("ondragenter");
    ONDRAGLEAVE = event!("ondragleave");
    ONDRAGOVER = event!("ondragover");
    ONDRAGSTART = event!("ondragstart");
    ONDROP = event!("ondrop");
    ONDURATIONCHANGE = event!("ondurationchange");
    ONEMPTIED = event!("onemptied");
    ONENDED = event!("onended");
    ONERROR = event!("onerror");
    ONFOCUS = event!("onfocus", Any);
    ONHASHCHANGE = body_event!("onhashchange");
    ONINPUT = event!("oninput");
    ONINVALID = event!("oninvalid");
    ONKEYDOWN = event!("onkeydown", Any);
    ONKEYPRESS = event!("onkeypress", Any);
    ONKEYUP = event!("onkeyup", Any);
    ONLOAD = event!("onload", Any);
    ONLOADEDDATA = event!("onloadeddata");
    ONLOADEDMETADATA = event!("onloadedmetadata");
    ONLOADSTART = event!("onloadstart");
    ONMESSAGE = body_event!("onmessage");
    ONMOUSEDOWN = event!("onmousedown", Any);
    ONMOUSEENTER = event!("onmouseenter");
    ONMOUSELEAVE = event!("onmouseleave");
    ONMOUSEMOVE = event!("onmousemove", Any);
    ONMOUSEOUT = event!("onmouseout", Any);
    ONMOUSEOVER = event!("onmouseover", Any);
    ONMOUSEUP = event!("onmouseup", Any);
    ONMOUSEWHEEL = attribute!(
        "onmousewheel",
        ValueKinds::SCRIPT,
        DoctypeConstraint::Html5Only,
        Normalizer::TrimToAbsent,
        Some(Deprecation::replaced_by("onwheel"))
    );
    ONOFFLINE = body_event!("onoffline");
    ONONLINE = body_event!("ononline");
    ONPAGEHIDE = body_event!("onpagehide");
    ONPAGESHOW = body_event!("onpageshow");
    ONPASTE = event!("onpaste");
    ONPAUSE = event!("onpause");
    ONPLAY = event!("onplay");
    ONPLAYING = event!("onplaying");
    ONPOPSTATE = body_event!("onpopstate");
    ONPROGRESS = event!("onprogress");
    ONRATECHANGE = event!("onratechange");
    ONRESET = event!("onreset", Any);
    ONRESIZE = event!("onresize");
    ONSCROLL = event!("onscroll");
    ONSEEKED = event!("onseeked");
    ONSEEKING = event!("onseeking");
    ONSELECT = event!("onselect", Any);
    ONSHOW = event!("onshow");
    ONSTALLED = event!("onstalled");
    ONSTORAGE = body_event!("onstorage");
    ONSUBMIT = event!("onsubmit", Any);
    ONSUSPEND = event!("onsuspend");
    ONTIMEUPDATE = event!("ontimeupdate");
    ONTOGGLE = event!("ontoggle");
    ONUNLOAD = body_event!("onunload", Any);
    ONVOLUMECHANGE = event!("onvolumechange");
    ONWAITING = event!("onwaiting");
    ONWHEEL = event!("onwheel");
    STYLE = text!("style");
    TITLE = text!("title");
    VALUE = attribute!("value", ValueKinds::TEXT, Any, Normalizer::Passthrough, None);
}

/// Look up a built-in attribute by name
pub fn lookup(name: &str) -> Option<&'static AttributeDef> {
    BUILTIN
        .binary_search_by(|def| def.name().cmp(name))
        .ok()
        .map(|idx| BUILTIN[idx])
}

/// Attribute registry - built-ins plus definitions loaded at runtime
pub struct AttributeRegistry {
    custom: HashMap<String, AttributeDef>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self { custom: HashMap::new() }
    }

    /// Load every `*.json` attribute definition in `dir` on top of the
    /// built-ins. Unreadable or malformed files are skipped.
    pub fn load_from_dir(dir: &Path) -> Result<Self, EmitError> {
        let mut registry = Self::new();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().map_or(false, |e| e == "json") {
                    let parsed = fs::read_to_string(&path)
                        .map_err(EmitError::from)
                        .and_then(|content| Ok(serde_json::from_str::<AttributeDef>(&content)?));
                    match parsed.and_then(|def| registry.register(def)) {
                        Ok(()) => tracing::debug!(path = %path.display(), "loaded attribute definition"),
                        Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping attribute definition"),
                    }
                }
            }
        }
        Ok(registry)
    }

    /// Custom definitions shadow built-ins of the same name.
    pub fn get(&self, name: &str) -> Option<&AttributeDef> {
        self.custom.get(name).or_else(|| lookup(name))
    }

    /// All definitions, sorted by name
    pub fn list(&self) -> Vec<&AttributeDef> {
        let mut defs: Vec<&AttributeDef> = BUILTIN
            .iter()
            .copied()
            .filter(|def| !self.custom.contains_key(def.name()))
            .chain(self.custom.values())
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn register(&mut self, def: AttributeDef) -> Result<(), EmitError> {
        if !is_valid_name(&def.name) {
            return Err(EmitError::InvalidAttributeName(def.name.into_owned()));
        }
        self.custom.insert(def.name.to_string(), def);
        Ok(())
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_sorted_and_unique() {
        for pair in BUILTIN.windows(2) {
            assert!(pair[0].name < pair[1].name, "{} before {}", pair[0].name, pair[1].name);
        }
    }

    #[test]
    fn every_builtin_is_found_by_name() {
        for def in BUILTIN {
            assert_eq!(lookup(def.name()), Some(*def));
        }
        assert!(lookup("onfrobnicate").is_none());
    }

    #[test]
    fn html4_intrinsic_events_allowed_everywhere() {
        for name in ["onblur", "onchange", "onclick", "onload", "onsubmit", "onunload"] {
            let def = lookup(name).unwrap();
            assert!(Doctype::ALL.iter().all(|d| def.allows(*d)), "{name}");
        }
        assert!(!ONCONTEXTMENU.allows(Doctype::Html4Strict));
        assert!(ONCONTEXTMENU.allows(Doctype::Html5));
    }

    #[test]
    fn removed_attribute_rejected_in_html5() {
        assert!(!ALIGN.allows(Doctype::Html5));
        assert!(ALIGN.allows(Doctype::Html4Transitional));
    }

    #[test]
    fn trim_normalizer_blanks_to_absent() {
        let n = Normalizer::TrimToAbsent;
        assert_eq!(n.apply(Some(Cow::Borrowed("  "))), None);
        assert_eq!(n.apply(Some(Cow::Owned(String::new()))), None);
        assert_eq!(n.apply(Some(Cow::Borrowed(" a() "))).as_deref(), Some("a()"));
        assert_eq!(n.apply(Some(Cow::Owned("\tb\n".into()))).as_deref(), Some("b"));
        assert_eq!(n.apply(None), None);
    }

    #[test]
    fn trim_keeps_non_breaking_space() {
        let n = Normalizer::TrimToAbsent;
        assert_eq!(n.apply(Some(Cow::Borrowed("\u{00A0}"))).as_deref(), Some("\u{00A0}"));
        assert_eq!(
            n.apply(Some(Cow::Owned(" \u{2003}x\u{00A0}\r\n".into()))).as_deref(),
            Some("\u{2003}x\u{00A0}")
        );
    }

    #[test]
    fn passthrough_keeps_whitespace() {
        let n = Normalizer::Passthrough;
        assert_eq!(n.apply(Some(Cow::Borrowed(""))).as_deref(), Some(""));
        assert_eq!(n.apply(Some(Cow::Borrowed(" x "))).as_deref(), Some(" x "));
    }

    #[test]
    fn custom_names_are_checked() {
        assert!(AttributeDef::custom("data-id").is_ok());
        assert!(AttributeDef::custom("bad name").is_err());
        assert!(AttributeDef::custom("x\"y").is_err());
        assert!(AttributeDef::custom("").is_err());
    }

    #[test]
    fn registry_custom_shadows_builtin() {
        let mut registry = AttributeRegistry::new();
        let mut def = AttributeDef::custom("title").unwrap();
        def.normalizer = Normalizer::Passthrough;
        registry.register(def).unwrap();

        assert_eq!(registry.get("title").unwrap().normalizer, Normalizer::Passthrough);
        assert_eq!(registry.list().len(), BUILTIN.len());
    }

    #[test]
    fn definition_json_defaults() {
        let def: AttributeDef = serde_json::from_str(r#"{"name": "data-track"}"#).unwrap();
        assert_eq!(def.normalizer, Normalizer::TrimToAbsent);
        assert_eq!(def.constraint, DoctypeConstraint::Any);
        assert_eq!(def.value_kinds, ValueKinds::TEXT);
        assert!(!def.is_deprecated());
    }
}
