/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Per-entity registries of property definitions.

pub mod calendar_item;
pub mod folder;

use crate::PropertyDefinition;

/// The properties of one entity type, in the order the server writes them.
#[derive(Debug)]
pub struct EntitySchema {
    /// The element the entity is written as, e.g. `Folder`.
    pub element_name: &'static str,

    /// The update instruction setting a single field, e.g. `SetFolderField`.
    pub set_field_element: &'static str,

    /// The update instruction deleting a single field.
    pub delete_field_element: &'static str,

    /// The property holding the entity's server identifier.
    pub id_property: &'static PropertyDefinition,

    pub definitions: &'static [&'static PropertyDefinition],
}

impl EntitySchema {
    /// The property written as the element `wire_name`, if any.
    ///
    /// Unknown names aren't an error: newer servers may return elements this
    /// schema doesn't know about.
    pub fn lookup(&self, wire_name: &str) -> Option<&'static PropertyDefinition> {
        self.definitions
            .iter()
            .copied()
            .find(|definition| definition.name == wire_name)
    }
}

/// The entity types with a registered schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Folder,
    SearchFolder,
    CalendarItem,
}

impl EntityKind {
    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Folder => &folder::SCHEMA,
            EntityKind::SearchFolder => &folder::SEARCH_FOLDER_SCHEMA,
            EntityKind::CalendarItem => &calendar_item::SCHEMA,
        }
    }
}

pub fn lookup(kind: EntityKind, wire_name: &str) -> Option<&'static PropertyDefinition> {
    kind.schema().lookup(wire_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExchangeVersion, PropertyKind};

    #[test]
    fn lookup_by_wire_name() {
        let definition = lookup(EntityKind::Folder, "DisplayName").unwrap();
        assert_eq!(definition.uri, Some("folder:DisplayName"));
        assert_eq!(definition.kind, PropertyKind::Text);

        assert!(lookup(EntityKind::Folder, "SearchParameters").is_none());
        assert!(lookup(EntityKind::SearchFolder, "SearchParameters").is_some());
        assert!(lookup(EntityKind::Folder, "displayname").is_none());
        assert!(lookup(EntityKind::CalendarItem, "FutureField").is_none());
    }

    #[test]
    fn visibility() {
        let preview = lookup(EntityKind::CalendarItem, "Preview").unwrap();
        assert!(!preview.is_visible(ExchangeVersion::Exchange2010_SP2));
        assert!(preview.is_visible(ExchangeVersion::Exchange2013));
    }

    #[test]
    fn id_properties_are_in_their_schema() {
        for kind in [
            EntityKind::Folder,
            EntityKind::SearchFolder,
            EntityKind::CalendarItem,
        ] {
            let schema = kind.schema();
            assert_eq!(
                schema.lookup(schema.id_property.name),
                Some(schema.id_property)
            );
        }
    }
}
