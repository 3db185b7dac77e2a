/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::marker::PhantomData;

use crate::{property::PropertyType, ExchangeVersion};

bitflags::bitflags! {
    /// Behaviors of a property, fixed by the server schema.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct PropertyDefinitionFlags : u16 {
        /// Reading an absent value yields an empty default instance.
        const AUTO_INSTANTIATE_ON_READ = 1 << 0;
        /// A value read from the server is merged into the existing instance
        /// rather than replacing it.
        const REUSE_INSTANCE = 1 << 1;
        /// The property may be set on an object which has not been created
        /// yet.
        const CAN_SET = 1 << 2;
        /// The property may be changed on an existing object.
        const CAN_UPDATE = 1 << 3;
        /// The property may be deleted from an existing object.
        const CAN_DELETE = 1 << 4;
        /// The property may be used in search restrictions.
        const CAN_FIND = 1 << 5;
        /// The property is only returned when requested by name.
        const MUST_BE_EXPLICITLY_LOADED = 1 << 6;
        /// Updates are expressed per item of the collection instead of by
        /// replacing the whole value.
        const UPDATE_COLLECTION_ITEMS = 1 << 7;
    }
}

/// The shape of a property's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Text,
    Integer,
    Boolean,
    DateTime,
    ServiceId,
    RetentionTag,
    StringList,
    ExtendedProperties,
    Recurrence,
    SearchParameters,
}

/// Static metadata describing one property of an entity type.
#[derive(Debug, PartialEq, Eq)]
pub struct PropertyDefinition {
    /// The local name of the element the property is written as.
    pub name: &'static str,

    /// The `FieldURI` identifying the property in updates and restrictions.
    /// Properties identified some other way (extended properties) have none.
    pub uri: Option<&'static str>,

    pub flags: PropertyDefinitionFlags,

    /// The earliest schema version in which the property exists.
    pub min_version: ExchangeVersion,

    pub kind: PropertyKind,
}

impl PropertyDefinition {
    pub const fn new(
        name: &'static str,
        uri: Option<&'static str>,
        flags: PropertyDefinitionFlags,
        min_version: ExchangeVersion,
        kind: PropertyKind,
    ) -> Self {
        Self {
            name,
            uri,
            flags,
            min_version,
            kind,
        }
    }

    /// Whether the property exists for a server at `version`.
    pub fn is_visible(&self, version: ExchangeVersion) -> bool {
        version >= self.min_version
    }

    pub fn has_flag(&self, flag: PropertyDefinitionFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// Access marker for properties only ever written by the server.
pub enum ReadOnlyAccess {}

/// Access marker for properties a client may set.
pub enum SettableAccess {}

/// A property definition bound to the Rust type of its value and to whether
/// clients may set it.
///
/// Only [`Settable`] properties can be passed to
/// [`PropertyStore::set`](crate::PropertyStore::set); whether a settable
/// property may be set on a particular object (new or existing) is still
/// checked at runtime against its flags.
pub struct Property<T, A> {
    pub(crate) definition: PropertyDefinition,
    _marker: PhantomData<fn() -> (T, A)>,
}

pub type ReadOnly<T> = Property<T, ReadOnlyAccess>;
pub type Settable<T> = Property<T, SettableAccess>;

impl<T: PropertyType, A> Property<T, A> {
    pub const fn new(
        name: &'static str,
        uri: Option<&'static str>,
        flags: PropertyDefinitionFlags,
        min_version: ExchangeVersion,
    ) -> Self {
        Self {
            definition: PropertyDefinition::new(name, uri, flags, min_version, T::KIND),
            _marker: PhantomData,
        }
    }
}

impl<T, A> Property<T, A> {
    pub const fn definition(&self) -> &PropertyDefinition {
        &self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StringList;

    static CATEGORIES: Settable<StringList> = Settable::new(
        "Categories",
        Some("item:Categories"),
        PropertyDefinitionFlags::CAN_SET.union(PropertyDefinitionFlags::CAN_UPDATE),
        ExchangeVersion::Exchange2010_SP1,
    );

    #[test]
    fn typed_properties_carry_their_kind() {
        let definition = CATEGORIES.definition();

        assert_eq!(definition.kind, PropertyKind::StringList);
        assert!(definition.has_flag(PropertyDefinitionFlags::CAN_SET));
        assert!(!definition.has_flag(PropertyDefinitionFlags::CAN_DELETE));
    }

    #[test]
    fn visibility_follows_minimum_version() {
        let definition = CATEGORIES.definition();

        assert!(!definition.is_visible(ExchangeVersion::Exchange2010));
        assert!(definition.is_visible(ExchangeVersion::Exchange2010_SP1));
        assert!(definition.is_visible(ExchangeVersion::Exchange2013));
    }
}
