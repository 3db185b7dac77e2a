/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Calendar items.
//!
//! See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/calendaritem>

use crate::{
    property::{PropertyDefinitionFlags as Flags, ReadOnly, Settable},
    schema::EntitySchema,
    xml::DateTime,
    ExchangeVersion, ExtendedPropertyCollection, Recurrence, ServiceId, StringList,
};

const EDITABLE: Flags = Flags::CAN_SET
    .union(Flags::CAN_UPDATE)
    .union(Flags::CAN_DELETE)
    .union(Flags::CAN_FIND);

pub static ITEM_ID: ReadOnly<ServiceId> = ReadOnly::new(
    "ItemId",
    Some("item:ItemId"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

pub static SUBJECT: Settable<String> = Settable::new(
    "Subject",
    Some("item:Subject"),
    EDITABLE,
    ExchangeVersion::Exchange2007,
);

pub static CATEGORIES: Settable<StringList> = Settable::new(
    "Categories",
    Some("item:Categories"),
    EDITABLE,
    ExchangeVersion::Exchange2007,
);

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

/// A plain-text excerpt of the body, computed by the server.
pub static PREVIEW: ReadOnly<String> = ReadOnly::new(
    "Preview",
    Some("item:Preview"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2013,
);

pub static START: Settable<DateTime> = Settable::new(
    "Start",
    Some("calendar:Start"),
    Flags::CAN_SET.union(Flags::CAN_UPDATE).union(Flags::CAN_FIND),
    ExchangeVersion::Exchange2007,
);

pub static END: Settable<DateTime> = Settable::new(
    "End",
    Some("calendar:End"),
    Flags::CAN_SET.union(Flags::CAN_UPDATE).union(Flags::CAN_FIND),
    ExchangeVersion::Exchange2007,
);

pub static IS_RECURRING: ReadOnly<bool> = ReadOnly::new(
    "IsRecurring",
    Some("calendar:IsRecurring"),
    Flags::CAN_FIND,
    ExchangeVersion::Exchange2007,
);

pub static RECURRENCE: Settable<Recurrence> = Settable::new(
    "Recurrence",
    Some("calendar:Recurrence"),
    Flags::CAN_SET.union(Flags::CAN_UPDATE).union(Flags::CAN_DELETE),
    ExchangeVersion::Exchange2007,
);

pub static SCHEMA: EntitySchema = EntitySchema {
    element_name: "CalendarItem",
    set_field_element: "SetItemField",
    delete_field_element: "DeleteItemField",
    id_property: &ITEM_ID.definition,
    definitions: &[
        &ITEM_ID.definition,
        &SUBJECT.definition,
        &CATEGORIES.definition,
        &EXTENDED_PROPERTIES.definition,
        &PREVIEW.definition,
        &START.definition,
        &END.definition,
        &IS_RECURRING.definition,
        &RECURRENCE.definition,
    ],
};
