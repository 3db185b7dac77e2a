/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{
    xml::{WireValue, XmlNamespace},
    Error, ExchangeVersion,
};

/// A depth-first XML writer.
///
/// A start tag is held back until the first child node (or the end of the
/// element) is written, so that attributes may follow
/// [`XmlWriter::write_start_element`]. Elements which end up with no content
/// are written as empty elements.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
    version: ExchangeVersion,
}

impl XmlWriter {
    /// Creates a writer producing a document for a server at `version`.
    pub fn new(version: ExchangeVersion) -> Self {
        Self {
            inner: Writer::new(Vec::new()),
            pending: None,
            open: Vec::new(),
            version,
        }
    }

    /// The schema version the document is written for.
    pub fn version(&self) -> ExchangeVersion {
        self.version
    }

    pub fn write_start_element(&mut self, ns: XmlNamespace, name: &str) -> Result<(), Error> {
        self.flush_pending()?;

        let qualified = ns.qualify(name);
        self.pending = Some(BytesStart::new(qualified.clone()));
        self.open.push(qualified);

        Ok(())
    }

    /// Adds an attribute to the element opened by the most recent call to
    /// [`XmlWriter::write_start_element`].
    ///
    /// Attributes can only be written before any of the element's content.
    pub fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name, value));
                Ok(())
            }
            None => Err(Error::UnexpectedElement {
                expected: "an open start tag".to_string(),
                found: format!("attribute `{name}`"),
            }),
        }
    }

    pub fn write_end_element(&mut self) -> Result<(), Error> {
        let name = self.open.pop().ok_or_else(|| Error::UnexpectedElement {
            expected: "an open element".to_string(),
            found: "end of element".to_string(),
        })?;

        match self.pending.take() {
            Some(start) => self.inner.write_event(Event::Empty(start))?,
            None => self.inner.write_event(Event::End(BytesEnd::new(name)))?,
        };

        Ok(())
    }

    /// Writes escaped text content into the current element.
    pub fn write_value(&mut self, text: &str) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }

        self.flush_pending()?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;

        Ok(())
    }

    /// Writes a whole `<name>value</name>` element.
    pub fn write_element_value<T: WireValue>(
        &mut self,
        ns: XmlNamespace,
        name: &str,
        value: &T,
    ) -> Result<(), Error> {
        let text = value.to_wire()?;

        self.write_start_element(ns, name)?;
        self.write_value(&text)?;
        self.write_end_element()
    }

    /// Consumes the writer, returning the document written so far.
    pub fn into_string(mut self) -> Result<String, Error> {
        if let Some(name) = self.open.last() {
            return Err(Error::UnexpectedElement {
                expected: format!("</{name}>"),
                found: "end of document".to_string(),
            });
        }
        self.flush_pending()?;

        String::from_utf8(self.inner.into_inner()).map_err(|err| Error::Utf8(err.utf8_error()))
    }

    fn flush_pending(&mut self) -> Result<(), Error> {
        if let Some(start) = self.pending.take() {
            self.inner.write_event(Event::Start(start))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_nested_elements_with_attributes() {
        let mut writer = XmlWriter::new(ExchangeVersion::Exchange2013);
        writer
            .write_start_element(XmlNamespace::Types, "Folder")
            .unwrap();
        writer
            .write_start_element(XmlNamespace::Types, "FolderId")
            .unwrap();
        writer.write_attribute("Id", "AAMk").unwrap();
        writer.write_end_element().unwrap();
        writer
            .write_element_value(XmlNamespace::Types, "DisplayName", &"Inbox & more".to_string())
            .unwrap();
        writer
            .write_element_value(XmlNamespace::Types, "UnreadCount", &5i32)
            .unwrap();
        writer.write_end_element().unwrap();

        assert_eq!(
            writer.into_string().unwrap(),
            r#"<t:Folder><t:FolderId Id="AAMk"/><t:DisplayName>Inbox &amp; more</t:DisplayName><t:UnreadCount>5</t:UnreadCount></t:Folder>"#
        );
    }

    #[test]
    fn unprefixed_namespace() {
        let mut writer = XmlWriter::new(ExchangeVersion::Exchange2013);
        writer
            .write_element_value(XmlNamespace::NotSpecified, "Name", &"ExternalEwsUrl".to_string())
            .unwrap();

        assert_eq!(
            writer.into_string().unwrap(),
            "<Name>ExternalEwsUrl</Name>"
        );
    }

    #[test]
    fn attribute_after_content_is_rejected() {
        let mut writer = XmlWriter::new(ExchangeVersion::Exchange2013);
        writer
            .write_start_element(XmlNamespace::Types, "Contains")
            .unwrap();
        writer.write_value("text").unwrap();

        assert!(matches!(
            writer.write_attribute("ContainmentMode", "Substring"),
            Err(Error::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn unclosed_element_is_rejected() {
        let mut writer = XmlWriter::new(ExchangeVersion::Exchange2013);
        writer
            .write_start_element(XmlNamespace::Messages, "Updates")
            .unwrap();

        assert!(writer.into_string().is_err());
    }
}
