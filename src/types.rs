/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod common;
mod extended_property;
mod folder_id;
mod property_path;
mod search_filter;
mod search_parameters;

pub use common::*;
pub use extended_property::*;
pub use folder_id::*;
pub use property_path::*;
pub use search_filter::*;
pub use search_parameters::*;

pub mod recurrence;
pub mod settings;

pub use recurrence::Recurrence;
