/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    decoder::{self, VariantFamily},
    xml::{XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error,
};

/// An identifier for an Exchange folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BaseFolderId {
    /// An identifier for an arbitrary folder.
    ///
    /// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/folderid>.
    FolderId {
        id: String,
        change_key: Option<String>,
    },

    /// An identifier for referencing a folder by name, e.g. "inbox" or
    /// "junkemail", optionally in another user's mailbox.
    ///
    /// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/distinguishedfolderid>.
    DistinguishedFolderId {
        id: String,
        change_key: Option<String>,
        mailbox: Option<String>,
    },
}

impl BaseFolderId {
    pub fn distinguished(id: impl Into<String>) -> Self {
        BaseFolderId::DistinguishedFolderId {
            id: id.into(),
            change_key: None,
            mailbox: None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            BaseFolderId::FolderId { id, .. } | BaseFolderId::DistinguishedFolderId { id, .. } => id,
        }
    }

    pub fn write_to_xml(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_start_element(XmlNamespace::Types, self.discriminator())?;

        match self {
            BaseFolderId::FolderId { id, change_key } => {
                writer.write_attribute("Id", id)?;
                if let Some(change_key) = change_key {
                    writer.write_attribute("ChangeKey", change_key)?;
                }
            }
            BaseFolderId::DistinguishedFolderId {
                id,
                change_key,
                mailbox,
            } => {
                writer.write_attribute("Id", id)?;
                if let Some(change_key) = change_key {
                    writer.write_attribute("ChangeKey", change_key)?;
                }
                if let Some(mailbox) = mailbox {
                    writer.write_start_element(XmlNamespace::Types, "Mailbox")?;
                    writer.write_element_value(XmlNamespace::Types, "EmailAddress", mailbox)?;
                    writer.write_end_element()?;
                }
            }
        }

        writer.write_end_element()
    }
}

impl VariantFamily for BaseFolderId {
    const FAMILY: &'static str = "BaseFolderId";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> BaseFolderId)] = &[
            ("FolderId", || BaseFolderId::FolderId {
                id: String::new(),
                change_key: None,
            }),
            ("DistinguishedFolderId", || BaseFolderId::distinguished("")),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            BaseFolderId::FolderId { .. } => "FolderId",
            BaseFolderId::DistinguishedFolderId { .. } => "DistinguishedFolderId",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        reader.ensure_start_element(element)?;

        match self {
            BaseFolderId::FolderId { id, change_key } => {
                *id = reader.read_required_attribute("Id")?;
                *change_key = reader.read_attribute("ChangeKey")?;
                reader.advance()?;
            }
            BaseFolderId::DistinguishedFolderId {
                id,
                change_key,
                mailbox,
            } => {
                *id = reader.read_required_attribute("Id")?;
                *change_key = reader.read_attribute("ChangeKey")?;
                reader.advance()?;

                if reader.is_start_element("Mailbox") {
                    reader.advance()?;
                    while !reader.is_end_element("Mailbox") {
                        if reader.is_start_element("EmailAddress") {
                            *mailbox = Some(reader.read_element_value("EmailAddress")?);
                        } else if reader.is_start() {
                            // Routing type and display name aren't needed to
                            // address the folder.
                            reader.skip_current_element()?;
                        } else {
                            return Err(reader.unexpected("</Mailbox>".to_string()));
                        }
                    }
                    reader.read_end_element("Mailbox")?;
                }
            }
        }

        reader.read_end_element(element)
    }
}

/// A list of folder identifiers, such as the folders a search folder
/// searches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderIdCollection {
    ids: Vec<BaseFolderId>,
    handle: ChangeHandle,
}

impl FolderIdCollection {
    pub fn iter(&self) -> impl Iterator<Item = &BaseFolderId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn push(&mut self, id: BaseFolderId) {
        self.ids.push(id);
        self.mark_changed();
    }

    pub fn remove(&mut self, index: usize) -> Option<BaseFolderId> {
        if index >= self.ids.len() {
            return None;
        }

        let removed = self.ids.remove(index);
        self.mark_changed();

        Some(removed)
    }

    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids.clear();
            self.mark_changed();
        }
    }
}

impl FromIterator<BaseFolderId> for FolderIdCollection {
    fn from_iter<I: IntoIterator<Item = BaseFolderId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for FolderIdCollection {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        self.ids.push(decoder::decode(reader)?);
        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        for id in &self.ids {
            id.write_to_xml(writer)?;
        }

        Ok(())
    }

    fn update_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        self.ids.clear();
        self.load_from_xml(reader, name)
    }
}
