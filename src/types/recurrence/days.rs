/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use strum::{Display, EnumString};

use crate::{
    xml::{impl_wire_value_for_enum, WireValue, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error,
};

/// A day of the week, or a class of days.
///
/// See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/daysofweek-dayofweektype>
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum DayOfTheWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,

    /// Any day of the week.
    Day,

    /// Monday through Friday.
    Weekday,

    /// Saturday or Sunday.
    WeekendDay,
}

/// Which occurrence of a day within a month a relative pattern refers to.
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum DayOfTheWeekIndex {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl_wire_value_for_enum!(DayOfTheWeek, DayOfTheWeekIndex, Month);

/// The set of days a weekly pattern recurs on, written as a space-separated
/// list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayOfTheWeekCollection {
    days: Vec<DayOfTheWeek>,
    handle: ChangeHandle,
}

impl DayOfTheWeekCollection {
    pub fn iter(&self) -> impl Iterator<Item = DayOfTheWeek> + '_ {
        self.days.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, day: DayOfTheWeek) -> bool {
        self.days.contains(&day)
    }

    /// Adds `day`, returning whether it wasn't already present.
    pub fn insert(&mut self, day: DayOfTheWeek) -> bool {
        if self.contains(day) {
            return false;
        }

        self.days.push(day);
        self.mark_changed();

        true
    }

    /// Removes `day`, returning whether it was present.
    pub fn remove(&mut self, day: DayOfTheWeek) -> bool {
        let Some(index) = self.days.iter().position(|candidate| *candidate == day) else {
            return false;
        };

        self.days.remove(index);
        self.mark_changed();

        true
    }

    pub fn clear(&mut self) {
        if !self.days.is_empty() {
            self.days.clear();
            self.mark_changed();
        }
    }
}

impl FromIterator<DayOfTheWeek> for DayOfTheWeekCollection {
    fn from_iter<I: IntoIterator<Item = DayOfTheWeek>>(iter: I) -> Self {
        let mut days = Vec::new();
        for day in iter {
            if !days.contains(&day) {
                days.push(day);
            }
        }

        Self {
            days,
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for DayOfTheWeekCollection {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, _reader: &mut XmlReader) -> Result<bool, Error> {
        Ok(false)
    }

    fn read_text(&mut self, text: &str) -> Result<bool, Error> {
        for day in text.split_whitespace() {
            let day = DayOfTheWeek::from_wire("DaysOfWeek", day)?;
            if !self.days.contains(&day) {
                self.days.push(day);
            }
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        let days = self
            .days
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        writer.write_value(&days)
    }

    fn update_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        self.days.clear();
        self.load_from_xml(reader, name)
    }
}
