/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    property::PropertyKind,
    xml::{DateTime, XmlNamespace, XmlReader, XmlWriter},
    ComplexProperty, Error, ExtendedPropertyCollection, Recurrence, RetentionTag,
    SearchParameters, ServiceId, StringList,
};

/// The value of a single property in a [`PropertyStore`](crate::PropertyStore).
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Integer(i32),
    Boolean(bool),
    DateTime(DateTime),
    ServiceId(ServiceId),
    RetentionTag(RetentionTag),
    StringList(StringList),
    ExtendedProperties(ExtendedPropertyCollection),
    Recurrence(Box<Recurrence>),
    SearchParameters(Box<SearchParameters>),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Text(_) => PropertyKind::Text,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::DateTime(_) => PropertyKind::DateTime,
            PropertyValue::ServiceId(_) => PropertyKind::ServiceId,
            PropertyValue::RetentionTag(_) => PropertyKind::RetentionTag,
            PropertyValue::StringList(_) => PropertyKind::StringList,
            PropertyValue::ExtendedProperties(_) => PropertyKind::ExtendedProperties,
            PropertyValue::Recurrence(_) => PropertyKind::Recurrence,
            PropertyValue::SearchParameters(_) => PropertyKind::SearchParameters,
        }
    }

    /// An empty value of `kind`, for kinds which have a meaningful empty
    /// value.
    pub fn default_for(kind: PropertyKind) -> Option<Self> {
        let value = match kind {
            PropertyKind::StringList => PropertyValue::StringList(StringList::default()),
            PropertyKind::ExtendedProperties => {
                PropertyValue::ExtendedProperties(ExtendedPropertyCollection::default())
            }
            PropertyKind::Recurrence => PropertyValue::Recurrence(Box::default()),
            PropertyKind::SearchParameters => PropertyValue::SearchParameters(Box::default()),

            PropertyKind::Text
            | PropertyKind::Integer
            | PropertyKind::Boolean
            | PropertyKind::DateTime
            | PropertyKind::ServiceId
            | PropertyKind::RetentionTag => return None,
        };

        Some(value)
    }

    /// The value as a complex property, unless it is a scalar.
    pub fn as_complex(&self) -> Option<&dyn ComplexProperty> {
        match self {
            PropertyValue::ServiceId(value) => Some(value),
            PropertyValue::RetentionTag(value) => Some(value),
            PropertyValue::StringList(value) => Some(value),
            PropertyValue::ExtendedProperties(value) => Some(value),
            PropertyValue::Recurrence(value) => Some(value.as_ref()),
            PropertyValue::SearchParameters(value) => Some(value.as_ref()),

            PropertyValue::Text(_)
            | PropertyValue::Integer(_)
            | PropertyValue::Boolean(_)
            | PropertyValue::DateTime(_) => None,
        }
    }

    pub fn as_complex_mut(&mut self) -> Option<&mut dyn ComplexProperty> {
        match self {
            PropertyValue::ServiceId(value) => Some(value),
            PropertyValue::RetentionTag(value) => Some(value),
            PropertyValue::StringList(value) => Some(value),
            PropertyValue::ExtendedProperties(value) => Some(value),
            PropertyValue::Recurrence(value) => Some(value.as_mut()),
            PropertyValue::SearchParameters(value) => Some(value.as_mut()),

            PropertyValue::Text(_)
            | PropertyValue::Integer(_)
            | PropertyValue::Boolean(_)
            | PropertyValue::DateTime(_) => None,
        }
    }

    /// Reads a value of `kind` from the element `name`.
    pub(crate) fn read_from_xml(
        kind: PropertyKind,
        reader: &mut XmlReader,
        name: &str,
    ) -> Result<Self, Error> {
        let value = match kind {
            PropertyKind::Text => PropertyValue::Text(reader.read_element_value(name)?),
            PropertyKind::Integer => PropertyValue::Integer(reader.read_element_value(name)?),
            PropertyKind::Boolean => PropertyValue::Boolean(reader.read_element_value(name)?),
            PropertyKind::DateTime => PropertyValue::DateTime(reader.read_element_value(name)?),
            PropertyKind::ServiceId => PropertyValue::ServiceId(load(reader, name)?),
            PropertyKind::RetentionTag => PropertyValue::RetentionTag(load(reader, name)?),
            PropertyKind::StringList => PropertyValue::StringList(load(reader, name)?),
            PropertyKind::ExtendedProperties => {
                PropertyValue::ExtendedProperties(load(reader, name)?)
            }
            PropertyKind::Recurrence => PropertyValue::Recurrence(Box::new(load(reader, name)?)),
            PropertyKind::SearchParameters => {
                PropertyValue::SearchParameters(Box::new(load(reader, name)?))
            }
        };

        Ok(value)
    }

    /// Merges the element `name` into this value. Scalars are replaced.
    pub(crate) fn update_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        if let Some(complex) = self.as_complex_mut() {
            return complex.update_from_xml(reader, name);
        }

        *self = PropertyValue::read_from_xml(self.kind(), reader, name)?;

        Ok(())
    }

    /// Writes this value as the element `name`.
    pub(crate) fn write_to_xml(&self, writer: &mut XmlWriter, name: &str) -> Result<(), Error> {
        let ns = XmlNamespace::Types;

        match self {
            PropertyValue::Text(value) => writer.write_element_value(ns, name, value),
            PropertyValue::Integer(value) => writer.write_element_value(ns, name, value),
            PropertyValue::Boolean(value) => writer.write_element_value(ns, name, value),
            PropertyValue::DateTime(value) => writer.write_element_value(ns, name, value),
            PropertyValue::ServiceId(value) => value.write_to_xml(writer, ns, name),
            PropertyValue::RetentionTag(value) => value.write_to_xml(writer, ns, name),
            PropertyValue::StringList(value) => value.write_to_xml(writer, ns, name),
            PropertyValue::ExtendedProperties(value) => value.write_to_xml(writer, ns, name),
            PropertyValue::Recurrence(value) => value.write_to_xml(writer, ns, name),
            PropertyValue::SearchParameters(value) => value.write_to_xml(writer, ns, name),
        }
    }

    /// Forgets item-level changes recorded inside collection values.
    pub(crate) fn clear_change_log(&mut self) {
        if let PropertyValue::ExtendedProperties(collection) = self {
            collection.clear_change_log();
        }
    }
}

fn load<T: ComplexProperty + Default>(reader: &mut XmlReader, name: &str) -> Result<T, Error> {
    let mut value = T::default();
    value.load_from_xml(reader, name)?;

    Ok(value)
}

/// A Rust type which can be stored as a [`PropertyValue`].
pub trait PropertyType: Sized {
    const KIND: PropertyKind;

    fn wrap(self) -> PropertyValue;

    fn peek(value: &PropertyValue) -> Option<&Self>;

    fn peek_mut(value: &mut PropertyValue) -> Option<&mut Self>;
}

macro_rules! impl_property_type {
    ($ty:ty, $variant:ident) => {
        impl PropertyType for $ty {
            const KIND: PropertyKind = PropertyKind::$variant;

            fn wrap(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn peek(value: &PropertyValue) -> Option<&Self> {
                match value {
                    PropertyValue::$variant(value) => Some(value),
                    _ => None,
                }
            }

            fn peek_mut(value: &mut PropertyValue) -> Option<&mut Self> {
                match value {
                    PropertyValue::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };

    (boxed $ty:ty, $variant:ident) => {
        impl PropertyType for $ty {
            const KIND: PropertyKind = PropertyKind::$variant;

            fn wrap(self) -> PropertyValue {
                PropertyValue::$variant(Box::new(self))
            }

            fn peek(value: &PropertyValue) -> Option<&Self> {
                match value {
                    PropertyValue::$variant(value) => Some(value.as_ref()),
                    _ => None,
                }
            }

            fn peek_mut(value: &mut PropertyValue) -> Option<&mut Self> {
                match value {
                    PropertyValue::$variant(value) => Some(value.as_mut()),
                    _ => None,
                }
            }
        }
    };
}

impl_property_type!(String, Text);
impl_property_type!(i32, Integer);
impl_property_type!(bool, Boolean);
impl_property_type!(DateTime, DateTime);
impl_property_type!(ServiceId, ServiceId);
impl_property_type!(RetentionTag, RetentionTag);
impl_property_type!(StringList, StringList);
impl_property_type!(ExtendedPropertyCollection, ExtendedProperties);
impl_property_type!(boxed Recurrence, Recurrence);
impl_property_type!(boxed SearchParameters, SearchParameters);
