/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use strum::{Display, EnumString};

use crate::{
    decoder::VariantFamily,
    xml::{impl_wire_value_for_enum, XmlNamespace, XmlReader, XmlWriter},
    Error,
};

/// An identifier for a property on an Exchange entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyPath {
    /// An identifier for a property given by a well-known string, such as
    /// `folder:DisplayName`.
    ///
    /// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/fielduri>
    FieldUri(String),

    /// An identifier for a specific element of a dictionary-based property.
    ///
    /// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/indexedfielduri>
    IndexedFieldUri { uri: String, field_index: String },

    /// An identifier for an extended MAPI property.
    ExtendedFieldUri(ExtendedFieldUri),
}

impl PropertyPath {
    pub fn field(uri: impl Into<String>) -> Self {
        PropertyPath::FieldUri(uri.into())
    }

    pub fn write_to_xml(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_start_element(XmlNamespace::Types, self.discriminator())?;

        match self {
            PropertyPath::FieldUri(uri) => writer.write_attribute("FieldURI", uri)?,
            PropertyPath::IndexedFieldUri { uri, field_index } => {
                writer.write_attribute("FieldURI", uri)?;
                writer.write_attribute("FieldIndex", field_index)?;
            }
            PropertyPath::ExtendedFieldUri(path) => path.write_attributes(writer)?,
        }

        writer.write_end_element()
    }
}

impl VariantFamily for PropertyPath {
    const FAMILY: &'static str = "PropertyPath";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> PropertyPath)] = &[
            ("FieldURI", || PropertyPath::FieldUri(String::new())),
            ("IndexedFieldURI", || PropertyPath::IndexedFieldUri {
                uri: String::new(),
                field_index: String::new(),
            }),
            ("ExtendedFieldURI", || {
                PropertyPath::ExtendedFieldUri(ExtendedFieldUri::default())
            }),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            PropertyPath::FieldUri(_) => "FieldURI",
            PropertyPath::IndexedFieldUri { .. } => "IndexedFieldURI",
            PropertyPath::ExtendedFieldUri(_) => "ExtendedFieldURI",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        reader.ensure_start_element(element)?;

        match self {
            PropertyPath::FieldUri(uri) => *uri = reader.read_required_attribute("FieldURI")?,
            PropertyPath::IndexedFieldUri { uri, field_index } => {
                *uri = reader.read_required_attribute("FieldURI")?;
                *field_index = reader.read_required_attribute("FieldIndex")?;
            }
            PropertyPath::ExtendedFieldUri(path) => path.read_attributes(reader)?,
        }

        reader.advance()?;
        reader.read_end_element(element)
    }
}

/// The identifier of an extended MAPI property.
///
/// A property is fully specified by its type and either a property tag, or a
/// property set (distinguished or by GUID) plus a name or dispatch ID. Which
/// combinations are valid is not enforced here.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/extendedfielduri>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtendedFieldUri {
    /// A well-known identifier for a property set.
    pub distinguished_property_set_id: Option<DistinguishedPropertySet>,

    /// A GUID representing a property set.
    pub property_set_id: Option<String>,

    /// Specifies a property by integer tag, usually in hexadecimal.
    pub property_tag: Option<String>,

    /// The name of a property within a specified property set.
    pub property_name: Option<String>,

    /// The dispatch ID of a property within a specified property set.
    pub property_id: Option<String>,

    /// The value type of the property.
    // The schema makes this attribute required, but servers have been seen
    // omitting it.
    pub property_type: Option<MapiPropertyType>,
}

impl ExtendedFieldUri {
    /// A named property in the given well-known property set.
    pub fn named(
        set: DistinguishedPropertySet,
        name: impl Into<String>,
        property_type: MapiPropertyType,
    ) -> Self {
        Self {
            distinguished_property_set_id: Some(set),
            property_name: Some(name.into()),
            property_type: Some(property_type),
            ..Default::default()
        }
    }

    /// A property identified by its MAPI tag.
    pub fn tagged(tag: impl Into<String>, property_type: MapiPropertyType) -> Self {
        Self {
            property_tag: Some(tag.into()),
            property_type: Some(property_type),
            ..Default::default()
        }
    }

    pub(crate) fn read_attributes(&mut self, reader: &XmlReader) -> Result<(), Error> {
        self.distinguished_property_set_id = reader.read_attribute("DistinguishedPropertySetId")?;
        self.property_set_id = reader.read_attribute("PropertySetId")?;
        self.property_tag = reader.read_attribute("PropertyTag")?;
        self.property_name = reader.read_attribute("PropertyName")?;
        self.property_id = reader.read_attribute("PropertyId")?;
        self.property_type = reader.read_attribute("PropertyType")?;

        Ok(())
    }

    pub(crate) fn write_attributes(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(set) = self.distinguished_property_set_id {
            writer.write_attribute("DistinguishedPropertySetId", &set.to_string())?;
        }
        if let Some(set) = &self.property_set_id {
            writer.write_attribute("PropertySetId", set)?;
        }
        if let Some(tag) = &self.property_tag {
            writer.write_attribute("PropertyTag", tag)?;
        }
        if let Some(name) = &self.property_name {
            writer.write_attribute("PropertyName", name)?;
        }
        if let Some(id) = &self.property_id {
            writer.write_attribute("PropertyId", id)?;
        }
        if let Some(property_type) = self.property_type {
            writer.write_attribute("PropertyType", &property_type.to_string())?;
        }

        Ok(())
    }

    pub(crate) fn write_to_xml(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_start_element(XmlNamespace::Types, "ExtendedFieldURI")?;
        self.write_attributes(writer)?;
        writer.write_end_element()
    }
}

/// A well-known MAPI property set identifier.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/extendedfielduri#distinguishedpropertysetid-attribute>
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum DistinguishedPropertySet {
    Address,
    Appointment,
    CalendarAssistant,
    Common,
    InternetHeaders,
    Meeting,
    PublicStrings,
    Sharing,
    Task,
    UnifiedMessaging,
}

/// The type of the value of a MAPI property.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/extendedfielduri#propertytype-attribute>
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum MapiPropertyType {
    ApplicationTime,
    ApplicationTimeArray,
    Binary,
    BinaryArray,
    Boolean,
    CLSID,
    CLSIDArray,
    Currency,
    CurrencyArray,
    Double,
    DoubleArray,
    Float,
    FloatArray,
    Integer,
    IntegerArray,
    Long,
    LongArray,
    Short,
    ShortArray,
    SystemTime,
    SystemTimeArray,
    String,
    StringArray,
}

impl MapiPropertyType {
    /// Whether values of this type are written as a list of `Value`s.
    pub fn is_array(self) -> bool {
        self.to_string().ends_with("Array")
    }
}

impl_wire_value_for_enum!(DistinguishedPropertySet, MapiPropertyType);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decoder, ExchangeVersion};

    fn round_trip(xml: &str) -> PropertyPath {
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST).unwrap();
        let path: PropertyPath = decoder::decode(&mut reader).unwrap();

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        path.write_to_xml(&mut writer).unwrap();
        assert_eq!(writer.into_string().unwrap(), xml);

        path
    }

    #[test]
    fn field_uri() {
        let path = round_trip(r#"<t:FieldURI FieldURI="folder:DisplayName"/>"#);
        assert_eq!(path, PropertyPath::field("folder:DisplayName"));
    }

    #[test]
    fn indexed_field_uri() {
        let path = round_trip(
            r#"<t:IndexedFieldURI FieldURI="contacts:EmailAddress" FieldIndex="EmailAddress1"/>"#,
        );
        assert_eq!(
            path,
            PropertyPath::IndexedFieldUri {
                uri: "contacts:EmailAddress".to_string(),
                field_index: "EmailAddress1".to_string(),
            }
        );
    }

    #[test]
    fn extended_field_uri() {
        let path = round_trip(
            r#"<t:ExtendedFieldURI DistinguishedPropertySetId="PublicStrings" PropertyName="ProjectCode" PropertyType="String"/>"#,
        );
        assert_eq!(
            path,
            PropertyPath::ExtendedFieldUri(ExtendedFieldUri::named(
                DistinguishedPropertySet::PublicStrings,
                "ProjectCode",
                MapiPropertyType::String,
            ))
        );

        round_trip(r#"<t:ExtendedFieldURI PropertyTag="0x1081" PropertyType="Integer"/>"#);
    }

    #[test]
    fn missing_field_uri_attribute() {
        let mut reader = XmlReader::new("<t:FieldURI/>", ExchangeVersion::LATEST).unwrap();
        assert!(matches!(
            decoder::decode::<PropertyPath>(&mut reader),
            Err(Error::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn array_types() {
        assert!(MapiPropertyType::StringArray.is_array());
        assert!(!MapiPropertyType::String.is_array());
    }
}
