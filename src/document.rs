//! Document Writer - Elements Over an Output Stream

use std::io::Write;

use crate::attributes::is_valid_name;
use crate::config::RenderConfig;
use crate::emit::{EmitError, Target};
use crate::encoding::escape_text;

/// An output stream plus the configuration governing it
#[derive(Debug)]
pub struct Document<W: Write> {
    out: W,
    config: RenderConfig,
}

impl<W: Write> Document<W> {
    pub fn new(out: W, config: RenderConfig) -> Self {
        Self { out, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Write the declaration for the configured doctype, if it has one
    pub fn write_doctype(&mut self) -> Result<&mut Self, EmitError> {
        if let Some(declaration) = self.config.doctype.declaration() {
            self.out.write_all(declaration.as_bytes())?;
            self.out.write_all(b"\n")?;
        }
        Ok(self)
    }

    pub fn text(&mut self, text: &str) -> Result<&mut Self, EmitError> {
        self.out.write_all(escape_text(text).as_bytes())?;
        Ok(self)
    }

    /// Open `<name` and hand back the element for attribute calls
    pub fn start(&mut self, name: &str) -> Result<Element<'_, W>, EmitError> {
        if !is_valid_name(name) {
            return Err(EmitError::InvalidElementName(name.to_string()));
        }
        self.out.write_all(b"<")?;
        self.out.write_all(name.as_bytes())?;
        Ok(Element {
            document: self,
            name: name.to_string(),
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// An open start tag. Attributes go here until the element is closed.
#[derive(Debug)]
pub struct Element<'d, W: Write> {
    document: &'d mut Document<W>,
    name: String,
}

impl<'d, W: Write> Element<'d, W> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `></name>`
    pub fn close(self) -> Result<(), EmitError> {
        let out = &mut self.document.out;
        out.write_all(b"></")?;
        out.write_all(self.name.as_bytes())?;
        out.write_all(b">")?;
        Ok(())
    }

    /// Close a void element in the configured serialization
    pub fn close_void(self) -> Result<(), EmitError> {
        let close = self.document.config.serialization.void_close();
        self.document.out.write_all(close.as_bytes())?;
        Ok(())
    }

    /// Finish the start tag, write the content, then the end tag
    pub fn body<E, F>(self, content: F) -> Result<(), E>
    where
        F: FnOnce(&mut Document<W>) -> Result<(), E>,
        E: From<EmitError>,
    {
        self.document.out.write_all(b">").map_err(EmitError::from)?;
        content(&mut *self.document)?;
        let out = &mut self.document.out;
        out.write_all(b"</").map_err(EmitError::from)?;
        out.write_all(self.name.as_bytes()).map_err(EmitError::from)?;
        out.write_all(b">").map_err(EmitError::from)?;
        Ok(())
    }
}

impl<W: Write> Target for Element<'_, W> {
    fn config(&self) -> &RenderConfig {
        &self.document.config
    }

    fn sink(&mut self) -> &mut dyn Write {
        &mut self.document.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{CLASS, ONCLICK};
    use crate::doctype::{Doctype, Serialization};

    fn render(config: RenderConfig, f: impl FnOnce(&mut Document<Vec<u8>>) -> Result<(), EmitError>) -> String {
        let mut doc = Document::new(Vec::new(), config);
        f(&mut doc).unwrap();
        String::from_utf8(doc.into_inner()).unwrap()
    }

    #[test]
    fn nested_elements_with_attributes() {
        let html = render(RenderConfig::default(), |doc| {
            doc.write_doctype()?;
            let mut div = doc.start("div")?;
            div.attr(&CLASS, "box")?;
            div.body(|doc| {
                let mut button = doc.start("button")?;
                button.attr(&ONCLICK, "save()")?;
                button.body(|doc| doc.text("Save & exit").map(|_| ()))
            })
        });
        assert_eq!(
            html,
            "<!DOCTYPE html>\n<div class=\"box\"><button onclick=\"save()\">Save &amp; exit</button></div>"
        );
    }

    #[test]
    fn void_close_follows_serialization() {
        let sgml = render(RenderConfig::default(), |doc| doc.start("br")?.close_void());
        assert_eq!(sgml, "<br>");

        let xml = render(
            RenderConfig::default().with_serialization(Serialization::Xml),
            |doc| doc.start("br")?.close_void(),
        );
        assert_eq!(xml, "<br />");
    }

    #[test]
    fn no_doctype_writes_no_declaration() {
        let html = render(RenderConfig::new(Doctype::None), |doc| {
            doc.write_doctype()?;
            doc.start("p")?.close()
        });
        assert_eq!(html, "<p></p>");
    }
}
