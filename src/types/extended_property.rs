/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    property::ValidationError,
    xml::{XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error, ExtendedFieldUri,
};

/// The value of an extended MAPI property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedValue {
    Single(String),

    /// The value of a multi-valued (`*Array`) property.
    Multiple(Vec<String>),
}

impl Default for ExtendedValue {
    fn default() -> Self {
        ExtendedValue::Single(String::new())
    }
}

impl From<&str> for ExtendedValue {
    fn from(value: &str) -> Self {
        ExtendedValue::Single(value.to_owned())
    }
}

impl From<String> for ExtendedValue {
    fn from(value: String) -> Self {
        ExtendedValue::Single(value)
    }
}

impl From<Vec<String>> for ExtendedValue {
    fn from(values: Vec<String>) -> Self {
        ExtendedValue::Multiple(values)
    }
}

/// An extended MAPI property of a folder or item.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/extendedproperty>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtendedProperty {
    pub path: ExtendedFieldUri,
    pub value: ExtendedValue,
}

impl ExtendedProperty {
    fn read(reader: &mut XmlReader, element: &str) -> Result<Self, Error> {
        reader.read_start_element(element)?;

        let mut property = ExtendedProperty::default();
        while !reader.is_end_element(element) {
            if reader.is_start_element("ExtendedFieldURI") {
                property.path.read_attributes(reader)?;
                reader.advance()?;
                reader.read_end_element("ExtendedFieldURI")?;
            } else if reader.is_start_element("Value") {
                property.value = ExtendedValue::Single(reader.read_element_value("Value")?);
            } else if reader.is_start_element("Values") {
                reader.advance()?;

                let mut values = Vec::new();
                while reader.is_start_element("Value") {
                    values.push(reader.read_element_value("Value")?);
                }
                reader.read_end_element("Values")?;

                property.value = ExtendedValue::Multiple(values);
            } else {
                return Err(reader.unexpected(format!("a known child of <{element}>")));
            }
        }
        reader.read_end_element(element)?;

        Ok(property)
    }

    fn write(&self, writer: &mut XmlWriter, ns: XmlNamespace, element: &str) -> Result<(), Error> {
        writer.write_start_element(ns, element)?;
        self.path.write_to_xml(writer)?;

        match &self.value {
            ExtendedValue::Single(value) => {
                writer.write_element_value(XmlNamespace::Types, "Value", value)?
            }
            ExtendedValue::Multiple(values) => {
                writer.write_start_element(XmlNamespace::Types, "Values")?;
                for value in values {
                    writer.write_element_value(XmlNamespace::Types, "Value", value)?;
                }
                writer.write_end_element()?;
            }
        }

        writer.write_end_element()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let path = &self.path;

        if path.property_type.is_none() {
            return Err(ValidationError::field(
                "ExtendedFieldURI",
                "a property type is required",
            ));
        }

        let in_property_set =
            path.distinguished_property_set_id.is_some() || path.property_set_id.is_some();
        let named = path.property_name.is_some() || path.property_id.is_some();
        if path.property_tag.is_none() && !(in_property_set && named) {
            return Err(ValidationError::field(
                "ExtendedFieldURI",
                "either a property tag or a property set with a name or ID is required",
            ));
        }

        Ok(())
    }
}

/// The extended properties of a folder or item.
///
/// On the wire each property is its own `ExtendedProperty` element directly
/// inside the entity; reading one merges it into the collection, replacing
/// any property with the same identifier. Changes are tracked per property so
/// that updates only carry the properties which were set or removed.
#[derive(Clone, Debug, Default)]
pub struct ExtendedPropertyCollection {
    items: Vec<ExtendedProperty>,
    changed: Vec<ExtendedFieldUri>,
    removed: Vec<ExtendedFieldUri>,
    handle: ChangeHandle,
}

impl ExtendedPropertyCollection {
    const ITEM_ELEMENT: &'static str = "ExtendedProperty";

    pub fn get(&self, path: &ExtendedFieldUri) -> Option<&ExtendedValue> {
        self.items
            .iter()
            .find(|item| &item.path == path)
            .map(|item| &item.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtendedProperty> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sets the property identified by `path`, adding it if the collection
    /// doesn't have it yet.
    pub fn set(&mut self, path: ExtendedFieldUri, value: impl Into<ExtendedValue>) {
        let value = value.into();

        match self.items.iter_mut().find(|item| item.path == path) {
            Some(item) => item.value = value,
            None => self.items.push(ExtendedProperty {
                path: path.clone(),
                value,
            }),
        }

        self.removed.retain(|removed| removed != &path);
        if !self.changed.contains(&path) {
            self.changed.push(path);
        }

        self.mark_changed();
    }

    /// Removes the property identified by `path`, returning whether it was
    /// present.
    pub fn remove(&mut self, path: &ExtendedFieldUri) -> bool {
        let Some(index) = self.items.iter().position(|item| &item.path == path) else {
            return false;
        };

        self.items.remove(index);
        self.changed.retain(|changed| changed != path);
        self.removed.push(path.clone());

        self.mark_changed();

        true
    }

    /// Properties set since the collection was last in sync with the server.
    pub(crate) fn changed_items(&self) -> impl Iterator<Item = &ExtendedProperty> {
        self.items
            .iter()
            .filter(|item| self.changed.contains(&item.path))
    }

    /// Identifiers of properties removed since the collection was last in
    /// sync with the server.
    pub(crate) fn removed_paths(&self) -> &[ExtendedFieldUri] {
        &self.removed
    }

    pub(crate) fn has_pending_changes(&self) -> bool {
        !self.changed.is_empty() || !self.removed.is_empty()
    }

    pub(crate) fn clear_change_log(&mut self) {
        self.changed.clear();
        self.removed.clear();
    }

    /// Records the removal of every property of `previous` this collection
    /// doesn't carry, for when this collection replaces it wholesale.
    pub(crate) fn carry_removals_from(&mut self, previous: &ExtendedPropertyCollection) {
        for item in &previous.items {
            if self.get(&item.path).is_none() && !self.removed.contains(&item.path) {
                self.removed.push(item.path.clone());
            }
        }
    }

    fn merge_from_server(&mut self, property: ExtendedProperty) {
        // The server's value wins over any pending local change.
        self.changed.retain(|changed| changed != &property.path);
        self.removed.retain(|removed| removed != &property.path);

        match self.items.iter_mut().find(|item| item.path == property.path) {
            Some(item) => *item = property,
            None => self.items.push(property),
        }
    }
}

impl PartialEq for ExtendedPropertyCollection {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl FromIterator<ExtendedProperty> for ExtendedPropertyCollection {
    fn from_iter<I: IntoIterator<Item = ExtendedProperty>>(iter: I) -> Self {
        let mut collection = Self::default();
        for property in iter {
            collection.set(property.path, property.value);
        }

        collection
    }
}

impl ComplexProperty for ExtendedPropertyCollection {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if !reader.is_start_element(Self::ITEM_ELEMENT) {
            return Ok(false);
        }

        let property = ExtendedProperty::read(reader, Self::ITEM_ELEMENT)?;
        self.merge_from_server(property);

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        for item in &self.items {
            item.write(writer, XmlNamespace::Types, Self::ITEM_ELEMENT)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.changed_items().try_for_each(ExtendedProperty::validate)
    }

    /// Reads a single property element and merges it into the collection.
    fn load_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        let property = ExtendedProperty::read(reader, name)?;
        self.merge_from_server(property);

        Ok(())
    }

    /// Writes each property as its own `name` element.
    fn write_to_xml(&self, writer: &mut XmlWriter, ns: XmlNamespace, name: &str) -> Result<(), Error> {
        for item in &self.items {
            item.write(writer, ns, name)?;
        }

        Ok(())
    }
}

/// Writes a single extended property, for per-property update instructions.
pub(crate) fn write_extended_property(
    writer: &mut XmlWriter,
    property: &ExtendedProperty,
) -> Result<(), Error> {
    property.write(writer, XmlNamespace::Types, ExtendedPropertyCollection::ITEM_ELEMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::assert_serialized_content, DistinguishedPropertySet, ExchangeVersion,
        MapiPropertyType,
    };

    fn project_code() -> ExtendedFieldUri {
        ExtendedFieldUri::named(
            DistinguishedPropertySet::PublicStrings,
            "ProjectCode",
            MapiPropertyType::String,
        )
    }

    fn keywords() -> ExtendedFieldUri {
        ExtendedFieldUri::named(
            DistinguishedPropertySet::PublicStrings,
            "Keywords",
            MapiPropertyType::StringArray,
        )
    }

    #[test]
    fn reading_merges_by_identifier() {
        let mut collection = ExtendedPropertyCollection::default();

        let xml = r#"<t:ExtendedProperty><t:ExtendedFieldURI DistinguishedPropertySetId="PublicStrings" PropertyName="ProjectCode" PropertyType="String"/><t:Value>alpha</t:Value></t:ExtendedProperty>"#;
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST).unwrap();
        collection
            .load_from_xml(&mut reader, "ExtendedProperty")
            .unwrap();

        let xml = r#"<t:ExtendedProperty><t:ExtendedFieldURI DistinguishedPropertySetId="PublicStrings" PropertyName="ProjectCode" PropertyType="String"/><t:Value>beta</t:Value></t:ExtendedProperty>"#;
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST).unwrap();
        collection
            .update_from_xml(&mut reader, "ExtendedProperty")
            .unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(&project_code()), Some(&"beta".into()));
        assert!(!collection.has_pending_changes());
    }

    #[test]
    fn multi_valued_properties() {
        let xml = r#"<t:ExtendedProperty><t:ExtendedFieldURI DistinguishedPropertySetId="PublicStrings" PropertyName="Keywords" PropertyType="StringArray"/><t:Values><t:Value>one</t:Value><t:Value>two</t:Value></t:Values></t:ExtendedProperty>"#;
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST).unwrap();

        let mut collection = ExtendedPropertyCollection::default();
        collection
            .load_from_xml(&mut reader, "ExtendedProperty")
            .unwrap();

        assert_eq!(
            collection.get(&keywords()),
            Some(&ExtendedValue::Multiple(vec!["one".into(), "two".into()]))
        );
        assert_serialized_content(&collection, "ExtendedProperty", xml);
    }

    #[test]
    fn tracks_changes_per_property() {
        let mut collection = ExtendedPropertyCollection::default();
        collection.set(project_code(), "alpha");
        collection.set(keywords(), vec!["one".to_string()]);
        collection.clear_change_log();

        collection.set(project_code(), "beta");
        assert_eq!(
            collection
                .changed_items()
                .map(|item| &item.path)
                .collect::<Vec<_>>(),
            [&project_code()]
        );

        assert!(collection.remove(&keywords()));
        assert!(!collection.remove(&keywords()));
        assert_eq!(collection.removed_paths(), [keywords()]);

        // Setting a removed property again cancels the removal.
        collection.set(keywords(), vec!["two".to_string()]);
        assert!(collection.removed_paths().is_empty());
    }

    #[test]
    fn identifiers_are_validated() {
        let mut collection = ExtendedPropertyCollection::default();
        collection.set(
            ExtendedFieldUri {
                property_name: Some("Orphan".to_string()),
                property_type: Some(MapiPropertyType::String),
                ..Default::default()
            },
            "value",
        );

        let err = collection.validate().expect_err("a name needs a property set");
        assert_eq!(err.path, ["ExtendedFieldURI"]);

        let mut collection = ExtendedPropertyCollection::default();
        collection.set(ExtendedFieldUri::tagged("0x1081", MapiPropertyType::Integer), "3");
        assert_eq!(collection.validate(), Ok(()));
    }
}
