/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Folders and search folders.
//!
//! See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/folder>

use crate::{
    property::{PropertyDefinitionFlags as Flags, ReadOnly, Settable},
    schema::EntitySchema,
    ExchangeVersion, ExtendedPropertyCollection, RetentionTag, SearchParameters, ServiceId,
};

const EDITABLE: Flags = Flags::CAN_SET
    .union(Flags::CAN_UPDATE)
    .union(Flags::CAN_DELETE)
    .union(Flags::CAN_FIND);

pub static FOLDER_ID: ReadOnly<ServiceId> = ReadOnly::new(
    "FolderId",
    Some("folder:FolderId"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

pub static PARENT_FOLDER_ID: ReadOnly<ServiceId> = ReadOnly::new(
    "ParentFolderId",
    Some("folder:ParentFolderId"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

pub static FOLDER_CLASS: Settable<String> = Settable::new(
    "FolderClass",
    Some("folder:FolderClass"),
    EDITABLE,
    ExchangeVersion::Exchange2007,
);

pub static DISPLAY_NAME: Settable<String> = Settable::new(
    "DisplayName",
    Some("folder:DisplayName"),
    EDITABLE,
    ExchangeVersion::Exchange2007,
);

pub static TOTAL_COUNT: ReadOnly<i32> = ReadOnly::new(
    "TotalCount",
    Some("folder:TotalCount"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

pub static CHILD_FOLDER_COUNT: ReadOnly<i32> = ReadOnly::new(
    "ChildFolderCount",
    Some("folder:ChildFolderCount"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

/// Extended properties are identified by their own `ExtendedFieldURI`, so
/// the property has no field URI and can't be deleted as a whole.
pub static EXTENDED_PROPERTIES: Settable<ExtendedPropertyCollection> = Settable::new(
    "ExtendedProperty",
    None,
    Flags::AUTO_INSTANTIATE_ON_READ
        .union(Flags::REUSE_INSTANCE)
        .union(Flags::UPDATE_COLLECTION_ITEMS)
        .union(Flags::CAN_SET)
        .union(Flags::CAN_UPDATE),
    ExchangeVersion::Exchange2007,
);

pub static UNREAD_COUNT: ReadOnly<i32> = ReadOnly::new(
    "UnreadCount",
    Some("folder:UnreadCount"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

pub static SEARCH_PARAMETERS: Settable<SearchParameters> = Settable::new(
    "SearchParameters",
    Some("folder:SearchParameters"),
    Flags::CAN_SET
        .union(Flags::CAN_UPDATE)
        .union(Flags::AUTO_INSTANTIATE_ON_READ)
        .union(Flags::MUST_BE_EXPLICITLY_LOADED),
    ExchangeVersion::Exchange2007,
);

pub static POLICY_TAG: Settable<RetentionTag> = Settable::new(
    "PolicyTag",
    Some("folder:PolicyTag"),
    Flags::CAN_SET
        .union(Flags::CAN_UPDATE)
        .union(Flags::CAN_DELETE)
        .union(Flags::CAN_FIND),
    ExchangeVersion::Exchange2010_SP1,
);

pub static SCHEMA: EntitySchema = EntitySchema {
    element_name: "Folder",
    set_field_element: "SetFolderField",
    delete_field_element: "DeleteFolderField",
    id_property: &FOLDER_ID.definition,
    definitions: &[
        &FOLDER_ID.definition,
        &PARENT_FOLDER_ID.definition,
        &FOLDER_CLASS.definition,
        &DISPLAY_NAME.definition,
        &TOTAL_COUNT.definition,
        &CHILD_FOLDER_COUNT.definition,
        &EXTENDED_PROPERTIES.definition,
        &UNREAD_COUNT.definition,
        &POLICY_TAG.definition,
    ],
};

pub static SEARCH_FOLDER_SCHEMA: EntitySchema = EntitySchema {
    element_name: "SearchFolder",
    set_field_element: "SetFolderField",
    delete_field_element: "DeleteFolderField",
    id_property: &FOLDER_ID.definition,
    definitions: &[
        &FOLDER_ID.definition,
        &PARENT_FOLDER_ID.definition,
        &FOLDER_CLASS.definition,
        &DISPLAY_NAME.definition,
        &TOTAL_COUNT.definition,
        &CHILD_FOLDER_COUNT.definition,
        &EXTENDED_PROPERTIES.definition,
        &UNREAD_COUNT.definition,
        &SEARCH_PARAMETERS.definition,
        &POLICY_TAG.definition,
    ],
};
