/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    xml::{XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error,
};

/// The server-assigned identifier of a folder or item.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/folderid>
/// and <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/itemid>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceId {
    pub id: String,

    /// Identifies a specific version of the entity; updates made against a
    /// stale change key are rejected by the server.
    pub change_key: Option<String>,

    handle: ChangeHandle,
}

impl ServiceId {
    pub fn new(id: impl Into<String>, change_key: Option<String>) -> Self {
        Self {
            id: id.into(),
            change_key,
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for ServiceId {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn read_attributes(&mut self, reader: &XmlReader) -> Result<(), Error> {
        self.id = reader.read_required_attribute("Id")?;
        self.change_key = reader.read_attribute("ChangeKey")?;

        Ok(())
    }

    fn try_read_element(&mut self, _reader: &mut XmlReader) -> Result<bool, Error> {
        Ok(false)
    }

    fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_attribute("Id", &self.id)?;
        if let Some(change_key) = &self.change_key {
            writer.write_attribute("ChangeKey", change_key)?;
        }

        Ok(())
    }

    fn write_elements(&self, _writer: &mut XmlWriter) -> Result<(), Error> {
        Ok(())
    }
}

/// A retention or archive policy applied to a folder or item.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/policytag>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetentionTag {
    /// Whether the tag was applied directly rather than inherited from the
    /// parent folder.
    pub is_explicit: bool,

    /// The GUID of the retention policy.
    pub retention_id: String,

    handle: ChangeHandle,
}

impl RetentionTag {
    pub fn new(retention_id: impl Into<String>, is_explicit: bool) -> Self {
        Self {
            is_explicit,
            retention_id: retention_id.into(),
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for RetentionTag {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn read_attributes(&mut self, reader: &XmlReader) -> Result<(), Error> {
        self.is_explicit = reader.read_required_attribute("IsExplicit")?;
        Ok(())
    }

    fn try_read_element(&mut self, _reader: &mut XmlReader) -> Result<bool, Error> {
        Ok(false)
    }

    fn read_text(&mut self, text: &str) -> Result<bool, Error> {
        self.retention_id = text.trim().to_owned();
        Ok(true)
    }

    fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_attribute("IsExplicit", if self.is_explicit { "true" } else { "false" })
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_value(&self.retention_id)
    }
}

/// A list of strings, such as an item's categories.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/categories-ex15websvcsotherref>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringList {
    items: Vec<String>,
    handle: ChangeHandle,
}

impl StringList {
    const ITEM_ELEMENT: &'static str = "String";

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.items.push(value.into());
        self.mark_changed();
    }

    /// Removes every occurrence of `value`, returning whether there was one.
    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != value);

        let removed = self.items.len() != before;
        if removed {
            self.mark_changed();
        }

        removed
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.mark_changed();
        }
    }
}

impl<S: Into<String>> FromIterator<S> for StringList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for StringList {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if !reader.is_start_element(Self::ITEM_ELEMENT) {
            return Ok(false);
        }

        self.items.push(reader.read_element_value(Self::ITEM_ELEMENT)?);
        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        for item in &self.items {
            writer.write_element_value(XmlNamespace::Types, Self::ITEM_ELEMENT, item)?;
        }

        Ok(())
    }

    fn update_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        self.items.clear();
        self.load_from_xml(reader, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_round_trip, assert_serialized_content};

    #[test]
    fn service_id() {
        let id: ServiceId = assert_round_trip(
            r#"<t:FolderId Id="AAMkADA5" ChangeKey="AQAAABYAAAA"/>"#,
            "FolderId",
        );
        assert_eq!(id, ServiceId::new("AAMkADA5", Some("AQAAABYAAAA".to_string())));

        assert_serialized_content(
            &ServiceId::new("AAMkADA5", None),
            "ItemId",
            r#"<t:ItemId Id="AAMkADA5"/>"#,
        );
    }

    #[test]
    fn retention_tag() {
        let tag: RetentionTag = assert_round_trip(
            r#"<t:PolicyTag IsExplicit="true">c6c8c1d1-4a8b-4ea5-b0c5-1fd5c3b4d9a8</t:PolicyTag>"#,
            "PolicyTag",
        );
        assert!(tag.is_explicit);
        assert_eq!(tag.retention_id, "c6c8c1d1-4a8b-4ea5-b0c5-1fd5c3b4d9a8");
    }

    #[test]
    fn string_list() {
        let mut categories: StringList = assert_round_trip(
            "<t:Categories><t:String>Blue</t:String><t:String>Travel</t:String></t:Categories>",
            "Categories",
        );
        assert!(categories.contains("Travel"));

        assert!(categories.remove("Blue"));
        assert!(!categories.remove("Blue"));
        categories.push("Green");

        assert_serialized_content(
            &categories,
            "Categories",
            "<t:Categories><t:String>Travel</t:String><t:String>Green</t:String></t:Categories>",
        );
    }

    #[test]
    fn empty_string_list() {
        let categories: StringList = assert_round_trip("<t:Categories/>", "Categories");
        assert!(categories.is_empty());
    }
}
