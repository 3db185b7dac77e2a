/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use quick_xml::{events::Event, Reader};

use crate::{xml::WireValue, Error, ExchangeVersion};

/// A single token of look-ahead, detached from the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Start {
        local_name: String,
        attributes: Vec<(String, String)>,
    },
    End {
        local_name: String,
    },
    Text(String),
    Eof,
}

/// A pull-style cursor over an XML document.
///
/// The reader always sits on exactly one token, which callers inspect with
/// [`XmlReader::local_name`], [`XmlReader::is_start_element`] and friends
/// before consuming it. Elements are matched on their local name; namespace
/// prefixes are ignored. Empty elements (`<t:Foo/>`) are reported as a start
/// token immediately followed by an end token.
///
/// Text is reported as written. Whitespace-only text never appears as a
/// token, but when it is the whole content of an element
/// [`XmlReader::read_text`] still returns it.
pub struct XmlReader<'a> {
    inner: Reader<&'a [u8]>,
    current: Token,
    pending_end: Option<String>,

    /// The whitespace-only content of the element whose end is current.
    blank_content: Option<String>,

    version: ExchangeVersion,
}

impl<'a> XmlReader<'a> {
    /// Creates a reader positioned on the first element of `document`.
    ///
    /// `version` is the schema version the document is assumed to conform to.
    pub fn new(document: &'a str, version: ExchangeVersion) -> Result<Self, Error> {
        let mut reader = Self {
            inner: Reader::from_str(document),
            current: Token::Eof,
            pending_end: None,
            blank_content: None,
            version,
        };
        reader.advance()?;

        Ok(reader)
    }

    /// The schema version the document is read at.
    pub fn version(&self) -> ExchangeVersion {
        self.version
    }

    /// Moves on to the next token.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.current = self.pull()?;
        Ok(())
    }

    fn pull(&mut self) -> Result<Token, Error> {
        self.blank_content = None;
        if let Some(local_name) = self.pending_end.take() {
            return Ok(Token::End { local_name });
        }

        let mut blank = None;
        loop {
            match self.next_token()? {
                Token::Text(text) if text.trim().is_empty() => {
                    if matches!(self.current, Token::Start { .. }) {
                        blank.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                end @ Token::End { .. } => {
                    self.blank_content = blank;
                    return Ok(end);
                }
                token => return Ok(token),
            }
        }
    }

    /// Converts the next event of interest into a token.
    fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            let token = match self.inner.read_event()? {
                Event::Start(start) => Token::Start {
                    local_name: std::str::from_utf8(start.local_name().as_ref())?.to_owned(),
                    attributes: read_attributes(&start)?,
                },
                Event::Empty(start) => {
                    let local_name = std::str::from_utf8(start.local_name().as_ref())?.to_owned();
                    self.pending_end = Some(local_name.clone());

                    Token::Start {
                        local_name,
                        attributes: read_attributes(&start)?,
                    }
                }
                Event::End(end) => Token::End {
                    local_name: std::str::from_utf8(end.local_name().as_ref())?.to_owned(),
                },
                Event::Text(text) => {
                    Token::Text(text.unescape().map_err(quick_xml::Error::from)?.into_owned())
                }
                Event::CData(data) => {
                    Token::Text(std::str::from_utf8(data.into_inner().as_ref())?.to_owned())
                }
                Event::Eof => Token::Eof,

                // Declarations, comments, processing instructions and doctypes
                // carry nothing we model.
                _ => continue,
            };

            return Ok(token);
        }
    }

    /// The local name of the current start or end element.
    pub fn local_name(&self) -> Option<&str> {
        match &self.current {
            Token::Start { local_name, .. } | Token::End { local_name } => Some(local_name),
            _ => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self.current, Token::Start { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self.current, Token::End { .. })
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.current, Token::Eof)
    }

    /// Whether the reader sits on the start of an element named `name`.
    pub fn is_start_element(&self, name: &str) -> bool {
        matches!(&self.current, Token::Start { local_name, .. } if local_name == name)
    }

    /// Whether the reader sits on the end of an element named `name`.
    pub fn is_end_element(&self, name: &str) -> bool {
        matches!(&self.current, Token::End { local_name } if local_name == name)
    }

    /// The raw value of an attribute of the current start element, matched by
    /// local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.current {
            Token::Start { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Parses an attribute of the current start element, if present.
    pub fn read_attribute<T: WireValue>(&self, name: &str) -> Result<Option<T>, Error> {
        self.attribute(name)
            .map(|value| T::from_wire(name, value))
            .transpose()
    }

    /// Parses a required attribute of the current start element.
    pub fn read_required_attribute<T: WireValue>(&self, name: &str) -> Result<T, Error> {
        self.read_attribute(name)?
            .ok_or_else(|| self.unexpected(format!("attribute `{name}`")))
    }

    /// Fails unless the reader sits on the start of `name`, without
    /// consuming it.
    pub fn ensure_start_element(&self, name: &str) -> Result<(), Error> {
        if self.is_start_element(name) {
            Ok(())
        } else {
            Err(self.unexpected(format!("<{name}>")))
        }
    }

    /// Consumes the start of an element named `name`.
    pub fn read_start_element(&mut self, name: &str) -> Result<(), Error> {
        self.ensure_start_element(name)?;
        self.advance()
    }

    /// Consumes the end of an element named `name`.
    pub fn read_end_element(&mut self, name: &str) -> Result<(), Error> {
        if !self.is_end_element(name) {
            return Err(self.unexpected(format!("</{name}>")));
        }

        self.advance()
    }

    /// Consumes the text of the current element, if any, leaving the reader
    /// on the element's end token.
    pub fn read_text(&mut self) -> Result<String, Error> {
        match &mut self.current {
            Token::Text(text) => {
                let text = std::mem::take(text);
                self.advance()?;
                Ok(text)
            }
            Token::End { .. } => Ok(self.blank_content.take().unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    /// Consumes a whole `<name>value</name>` element and parses its text.
    pub fn read_element_value<T: WireValue>(&mut self, name: &str) -> Result<T, Error> {
        self.read_start_element(name)?;
        let text = self.read_text()?;
        self.read_end_element(name)?;

        T::from_wire(name, &text)
    }

    /// Consumes the current element and its entire subtree.
    pub fn skip_current_element(&mut self) -> Result<(), Error> {
        if !self.is_start() {
            return Err(self.unexpected("an element to skip".to_string()));
        }

        let mut depth = 0usize;
        loop {
            match self.current {
                Token::Start { .. } => depth += 1,
                Token::End { .. } => {
                    depth -= 1;
                    if depth == 0 {
                        return self.advance();
                    }
                }
                Token::Eof => return Err(self.unexpected("the end of a skipped element".into())),
                Token::Text(_) => (),
            }

            self.advance()?;
        }
    }

    /// Builds a structural error describing the current token.
    pub fn unexpected(&self, expected: String) -> Error {
        Error::UnexpectedElement {
            expected,
            found: self.describe_current(),
        }
    }

    fn describe_current(&self) -> String {
        match &self.current {
            Token::Start { local_name, .. } => format!("<{local_name}>"),
            Token::End { local_name } => format!("</{local_name}>"),
            Token::Text(text) => format!("text `{text}`"),
            Token::Eof => "end of document".to_string(),
        }
    }
}

fn read_attributes(start: &quick_xml::events::BytesStart) -> Result<Vec<(String, String)>, Error> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;

        // Namespace declarations aren't data.
        let key = attribute.key;
        if key.as_ref() == b"xmlns" || key.as_ref().starts_with(b"xmlns:") {
            continue;
        }

        let name = std::str::from_utf8(key.local_name().as_ref())?.to_owned();
        let value = attribute
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((name, value));
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_elements_by_local_name() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <t:Folder xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
                <t:FolderId Id="AAMk" ChangeKey="AQAA"/>
                <t:DisplayName>Inbox &amp; more</t:DisplayName>
            </t:Folder>"#;

        let mut reader = XmlReader::new(xml, ExchangeVersion::Exchange2013).unwrap();
        assert!(reader.is_start_element("Folder"));
        assert_eq!(reader.attribute("t"), None, "namespace declarations are dropped");
        reader.read_start_element("Folder").unwrap();

        assert!(reader.is_start_element("FolderId"));
        assert_eq!(reader.attribute("Id"), Some("AAMk"));
        assert_eq!(
            reader.read_attribute::<String>("ChangeKey").unwrap(),
            Some("AQAA".to_string())
        );
        reader.advance().unwrap();
        assert!(reader.is_end_element("FolderId"), "empty elements report an end");
        reader.advance().unwrap();

        let name: String = reader.read_element_value("DisplayName").unwrap();
        assert_eq!(name, "Inbox & more");

        reader.read_end_element("Folder").unwrap();
        assert!(reader.is_eof());
    }

    #[test]
    fn skips_whole_subtrees() {
        let xml = "<Root><Unknown><Nested>1</Nested><Nested/></Unknown><Known>2</Known></Root>";

        let mut reader = XmlReader::new(xml, ExchangeVersion::Exchange2013).unwrap();
        reader.read_start_element("Root").unwrap();
        reader.skip_current_element().unwrap();

        let known: u32 = reader.read_element_value("Known").unwrap();
        assert_eq!(known, 2);
        reader.read_end_element("Root").unwrap();
    }

    #[test]
    fn empty_element_reads_as_empty_text() {
        let mut reader = XmlReader::new("<Value/>", ExchangeVersion::Exchange2013).unwrap();
        let value: String = reader.read_element_value("Value").unwrap();
        assert_eq!(value, "");
        assert!(reader.is_eof());
    }

    #[test]
    fn text_is_read_as_written() {
        let xml = "<Folder>\n  <Padded>  Inbox </Padded>\n  <Blank>   </Blank>\n  <Ids>\n  </Ids>\n</Folder>";

        let mut reader = XmlReader::new(xml, ExchangeVersion::Exchange2013).unwrap();
        reader.read_start_element("Folder").unwrap();

        let padded: String = reader.read_element_value("Padded").unwrap();
        assert_eq!(padded, "  Inbox ");
        let blank: String = reader.read_element_value("Blank").unwrap();
        assert_eq!(blank, "   ");

        // Whitespace between elements is only formatting.
        reader.read_start_element("Ids").unwrap();
        assert!(reader.is_end_element("Ids"));
        reader.read_end_element("Ids").unwrap();
        reader.read_end_element("Folder").unwrap();
        assert!(reader.is_eof());
    }

    #[test]
    fn mismatched_element_is_a_structural_error() {
        let mut reader = XmlReader::new("<Other/>", ExchangeVersion::Exchange2013).unwrap();
        let err = reader
            .read_start_element("Expected")
            .expect_err("reading the wrong element should fail");

        match err {
            Error::UnexpectedElement { expected, found } => {
                assert_eq!(expected, "<Expected>");
                assert_eq!(found, "<Other>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
