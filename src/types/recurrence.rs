/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Recurrence of calendar items and tasks.
//!
//! On the wire a recurrence is a pattern element followed by a range element.
//! [`Recurrence`] folds the range into a start date and a [`RecurrenceEnd`],
//! which keeps the occurrence count and the end date mutually exclusive.
//!
//! See <https://learn.microsoft.com/en-us/exchange/client-developer/web-service-reference/recurrence-recurrencetype>

mod days;
mod patterns;
mod range;

pub use days::*;
pub use patterns::*;

use crate::{
    decoder::{self, VariantFamily},
    property::ValidationError,
    xml::{Date, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error,
};

use range::RecurrenceRange;

/// When a recurrence stops producing occurrences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecurrenceEnd {
    #[default]
    NoEnd,
    Occurrences(u32),
    EndDate(Date),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recurrence {
    pattern: Option<RecurrencePattern>,
    start_date: Option<Date>,
    end: RecurrenceEnd,
    handle: ChangeHandle,
}

impl Recurrence {
    pub fn new(pattern: RecurrencePattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..Default::default()
        }
    }

    pub fn pattern(&self) -> Option<&RecurrencePattern> {
        self.pattern.as_ref()
    }

    pub fn pattern_mut(&mut self) -> Option<&mut RecurrencePattern> {
        let pattern = self.pattern.as_mut()?;
        pattern.change_handle().attach_to(&self.handle);

        Some(pattern)
    }

    pub fn set_pattern(&mut self, pattern: RecurrencePattern) {
        if let Some(previous) = &self.pattern {
            previous.change_handle().detach();
        }
        pattern.change_handle().attach_to(&self.handle);

        self.pattern = Some(pattern);
        self.mark_changed();
    }

    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    pub fn set_start_date(&mut self, start_date: Date) {
        self.start_date = Some(start_date);
        self.mark_changed();
    }

    pub fn end(&self) -> RecurrenceEnd {
        self.end
    }

    pub fn number_of_occurrences(&self) -> Option<u32> {
        match self.end {
            RecurrenceEnd::Occurrences(count) => Some(count),
            _ => None,
        }
    }

    /// Ends the recurrence after `count` occurrences, dropping any end date.
    pub fn set_number_of_occurrences(&mut self, count: u32) {
        self.end = RecurrenceEnd::Occurrences(count);
        self.mark_changed();
    }

    pub fn end_date(&self) -> Option<Date> {
        match self.end {
            RecurrenceEnd::EndDate(date) => Some(date),
            _ => None,
        }
    }

    /// Ends the recurrence on `end_date`, dropping any occurrence count.
    pub fn set_end_date(&mut self, end_date: Date) {
        self.end = RecurrenceEnd::EndDate(end_date);
        self.mark_changed();
    }

    pub fn set_never_ends(&mut self) {
        self.end = RecurrenceEnd::NoEnd;
        self.mark_changed();
    }

    fn range(&self) -> RecurrenceRange {
        let start_date = self.start_date;
        match self.end {
            RecurrenceEnd::NoEnd => RecurrenceRange::NoEnd { start_date },
            RecurrenceEnd::Occurrences(count) => RecurrenceRange::Numbered {
                start_date,
                occurrences: Some(count),
            },
            RecurrenceEnd::EndDate(end_date) => RecurrenceRange::EndDate {
                start_date,
                end_date: Some(end_date),
            },
        }
    }

    fn apply_range(&mut self, range: RecurrenceRange) {
        self.start_date = range.start_date();
        self.end = match range {
            RecurrenceRange::NoEnd { .. }
            | RecurrenceRange::Numbered {
                occurrences: None, ..
            }
            | RecurrenceRange::EndDate { end_date: None, .. } => RecurrenceEnd::NoEnd,
            RecurrenceRange::Numbered {
                occurrences: Some(count),
                ..
            } => RecurrenceEnd::Occurrences(count),
            RecurrenceRange::EndDate {
                end_date: Some(date),
                ..
            } => RecurrenceEnd::EndDate(date),
        };
    }
}

impl ComplexProperty for Recurrence {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        // The pattern always comes first, so anything before it must be one.
        if self.pattern.is_none() {
            self.pattern = Some(decoder::decode(reader)?);
            return Ok(true);
        }

        match reader.local_name() {
            Some(name) if decoder::is_variant::<RecurrenceRange>(name) => {
                let range = decoder::decode(reader)?;
                self.apply_range(range);

                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        if let Some(pattern) = &self.pattern {
            pattern.write(writer)?;
        }

        if self.start_date.is_some() {
            self.range().write(writer)?;
        }

        Ok(())
    }

    fn update_from_xml(&mut self, reader: &mut XmlReader, name: &str) -> Result<(), Error> {
        self.pattern = None;
        self.start_date = None;
        self.end = RecurrenceEnd::NoEnd;

        self.load_from_xml(reader, name)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let Some(pattern) = &self.pattern else {
            return Err(ValidationError::new("a recurrence pattern is required"));
        };
        pattern
            .validate()
            .map_err(|err| err.within(pattern.discriminator()))?;

        match (self.start_date, self.end) {
            (None, RecurrenceEnd::NoEnd) => Ok(()),
            (None, _) => Err(ValidationError::field(
                "StartDate",
                "a recurrence with an end needs a start date",
            )),
            (Some(_), RecurrenceEnd::Occurrences(0)) => Err(ValidationError::field(
                "NumberOfOccurrences",
                "the number of occurrences must be at least 1",
            )),
            (Some(start), RecurrenceEnd::EndDate(end)) if end < start => Err(
                ValidationError::field("EndDate", "the end date precedes the start date"),
            ),
            (Some(_), _) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::{
        test_utils::{assert_round_trip, assert_serialized_content},
        xml::XmlNamespace,
        ExchangeVersion,
    };

    fn weekly(days: impl IntoIterator<Item = DayOfTheWeek>) -> RecurrencePattern {
        RecurrencePattern::Weekly(WeeklyPattern::new(1, days))
    }

    #[test]
    fn new_weekly_recurrence() {
        let mut pattern = WeeklyPattern::default();
        pattern.set_interval(2);
        pattern.days_of_week_mut().insert(DayOfTheWeek::Monday);
        pattern.days_of_week_mut().insert(DayOfTheWeek::Wednesday);

        let recurrence = Recurrence::new(RecurrencePattern::Weekly(pattern));
        assert_eq!(recurrence.validate(), Ok(()));

        assert_serialized_content(
            &recurrence,
            "Recurrence",
            "<t:Recurrence><t:WeeklyRecurrence><t:Interval>2</t:Interval><t:DaysOfWeek>Monday Wednesday</t:DaysOfWeek></t:WeeklyRecurrence></t:Recurrence>",
        );
    }

    #[test]
    fn count_and_end_date_are_mutually_exclusive() {
        let mut recurrence = Recurrence::new(weekly([DayOfTheWeek::Friday]));

        recurrence.set_number_of_occurrences(5);
        recurrence.set_end_date(Date(date!(2024 - 06 - 30)));
        assert_eq!(recurrence.number_of_occurrences(), None);
        assert_eq!(recurrence.end_date(), Some(Date(date!(2024 - 06 - 30))));

        recurrence.set_number_of_occurrences(5);
        assert_eq!(recurrence.end_date(), None);
        assert_eq!(recurrence.number_of_occurrences(), Some(5));

        recurrence.set_never_ends();
        assert_eq!(recurrence.end(), RecurrenceEnd::NoEnd);
    }

    #[test]
    fn ranges_round_trip() {
        let recurrence: Recurrence = assert_round_trip(
            "<t:Recurrence><t:DailyRecurrence><t:Interval>1</t:Interval></t:DailyRecurrence><t:NumberedRecurrence><t:StartDate>2024-03-01</t:StartDate><t:NumberOfOccurrences>10</t:NumberOfOccurrences></t:NumberedRecurrence></t:Recurrence>",
            "Recurrence",
        );
        assert_eq!(recurrence.start_date(), Some(Date(date!(2024 - 03 - 01))));
        assert_eq!(recurrence.number_of_occurrences(), Some(10));

        let recurrence: Recurrence = assert_round_trip(
            "<t:Recurrence><t:AbsoluteMonthlyRecurrence><t:Interval>1</t:Interval><t:DayOfMonth>15</t:DayOfMonth></t:AbsoluteMonthlyRecurrence><t:EndDateRecurrence><t:StartDate>2024-03-15</t:StartDate><t:EndDate>2024-12-15</t:EndDate></t:EndDateRecurrence></t:Recurrence>",
            "Recurrence",
        );
        assert_eq!(recurrence.end_date(), Some(Date(date!(2024 - 12 - 15))));

        let recurrence: Recurrence = assert_round_trip(
            "<t:Recurrence><t:YearlyRegeneration><t:Interval>1</t:Interval></t:YearlyRegeneration><t:NoEndRecurrence><t:StartDate>2024-01-01</t:StartDate></t:NoEndRecurrence></t:Recurrence>",
            "Recurrence",
        );
        assert_eq!(recurrence.end(), RecurrenceEnd::NoEnd);
    }

    #[test]
    fn unknown_pattern_fails_the_decode() {
        let mut reader = XmlReader::new(
            "<t:Recurrence><t:FortnightlyRecurrence/></t:Recurrence>",
            ExchangeVersion::LATEST,
        )
        .unwrap();

        let err = Recurrence::default()
            .load_from_xml(&mut reader, "Recurrence")
            .expect_err("unknown patterns should be rejected");
        assert!(matches!(
            err,
            Error::UnknownVariant { family: "RecurrencePattern", discriminator } if discriminator == "FortnightlyRecurrence"
        ));
    }

    #[test]
    fn update_replaces_the_range() {
        let mut recurrence = Recurrence::new(weekly([DayOfTheWeek::Monday]));
        recurrence.set_start_date(Date(date!(2024 - 01 - 01)));
        recurrence.set_number_of_occurrences(3);

        let mut reader = XmlReader::new(
            "<t:Recurrence><t:DailyRecurrence><t:Interval>4</t:Interval></t:DailyRecurrence></t:Recurrence>",
            ExchangeVersion::LATEST,
        )
        .unwrap();
        recurrence.update_from_xml(&mut reader, "Recurrence").unwrap();

        assert_eq!(recurrence.start_date(), None);
        assert_eq!(recurrence.end(), RecurrenceEnd::NoEnd);
        assert!(matches!(
            recurrence.pattern(),
            Some(RecurrencePattern::Daily(daily)) if daily.interval() == 4
        ));
    }

    #[test]
    fn validation_paths() {
        assert!(Recurrence::default().validate().is_err());

        let err = Recurrence::new(weekly(std::iter::empty())).validate().unwrap_err();
        assert_eq!(err.path, ["WeeklyRecurrence", "DaysOfWeek"]);

        let mut recurrence = Recurrence::new(weekly([DayOfTheWeek::Monday]));
        recurrence.set_number_of_occurrences(2);
        let err = recurrence.validate().unwrap_err();
        assert_eq!(err.path, ["StartDate"]);

        recurrence.set_start_date(Date(date!(2024 - 05 - 01)));
        recurrence.set_end_date(Date(date!(2024 - 04 - 01)));
        let err = recurrence.validate().unwrap_err();
        assert_eq!(err.path, ["EndDate"]);

        recurrence.set_number_of_occurrences(0);
        let err = recurrence.validate().unwrap_err();
        assert_eq!(err.path, ["NumberOfOccurrences"]);
    }

    #[test]
    fn nested_mutation_notifies_the_recurrence() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(crate::property::ChangeLog::default()));
        let mut recurrence = Recurrence::new(weekly([DayOfTheWeek::Monday]));
        recurrence.change_handle().attach_to_store(&log, "Recurrence");

        let Some(RecurrencePattern::Weekly(pattern)) = recurrence.pattern_mut() else {
            panic!("expected a weekly pattern");
        };
        pattern.days_of_week_mut().insert(DayOfTheWeek::Thursday);

        assert!(log.borrow().is_modified("Recurrence"));

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        recurrence
            .write_to_xml(&mut writer, XmlNamespace::Types, "Recurrence")
            .unwrap();
        assert!(writer
            .into_string()
            .unwrap()
            .contains("<t:DaysOfWeek>Monday Thursday</t:DaysOfWeek>"));
    }
}
