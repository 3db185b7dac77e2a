/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    decoder::VariantFamily,
    property::ValidationError,
    version::{ensure_feature_supported, Feature},
    xml::{XmlNamespace, XmlReader, XmlWriter},
    ChangeHandle, ComplexProperty, Error,
};

use super::{DayOfTheWeek, DayOfTheWeekCollection, DayOfTheWeekIndex, Month};

/// How often a recurring calendar item or task recurs.
///
/// The `*Regeneration` variants only apply to tasks, and count their interval
/// from the completion of the previous occurrence rather than from its start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecurrencePattern {
    Daily(IntervalPattern),
    Weekly(WeeklyPattern),
    AbsoluteMonthly(AbsoluteMonthlyPattern),
    RelativeMonthly(RelativeMonthlyPattern),
    AbsoluteYearly(AbsoluteYearlyPattern),
    RelativeYearly(RelativeYearlyPattern),
    DailyRegeneration(IntervalPattern),
    WeeklyRegeneration(IntervalPattern),
    MonthlyRegeneration(IntervalPattern),
    YearlyRegeneration(IntervalPattern),
}

impl RecurrencePattern {
    fn inner(&self) -> &dyn ComplexProperty {
        match self {
            RecurrencePattern::Daily(pattern)
            | RecurrencePattern::DailyRegeneration(pattern)
            | RecurrencePattern::WeeklyRegeneration(pattern)
            | RecurrencePattern::MonthlyRegeneration(pattern)
            | RecurrencePattern::YearlyRegeneration(pattern) => pattern,
            RecurrencePattern::Weekly(pattern) => pattern,
            RecurrencePattern::AbsoluteMonthly(pattern) => pattern,
            RecurrencePattern::RelativeMonthly(pattern) => pattern,
            RecurrencePattern::AbsoluteYearly(pattern) => pattern,
            RecurrencePattern::RelativeYearly(pattern) => pattern,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ComplexProperty {
        match self {
            RecurrencePattern::Daily(pattern)
            | RecurrencePattern::DailyRegeneration(pattern)
            | RecurrencePattern::WeeklyRegeneration(pattern)
            | RecurrencePattern::MonthlyRegeneration(pattern)
            | RecurrencePattern::YearlyRegeneration(pattern) => pattern,
            RecurrencePattern::Weekly(pattern) => pattern,
            RecurrencePattern::AbsoluteMonthly(pattern) => pattern,
            RecurrencePattern::RelativeMonthly(pattern) => pattern,
            RecurrencePattern::AbsoluteYearly(pattern) => pattern,
            RecurrencePattern::RelativeYearly(pattern) => pattern,
        }
    }

    /// Writes this pattern as an element named after its variant.
    pub fn write(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.write_to_xml(writer, XmlNamespace::Types, self.discriminator())
    }
}

impl VariantFamily for RecurrencePattern {
    const FAMILY: &'static str = "RecurrencePattern";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> RecurrencePattern)] = &[
            ("DailyRecurrence", || {
                RecurrencePattern::Daily(IntervalPattern::default())
            }),
            ("WeeklyRecurrence", || {
                RecurrencePattern::Weekly(WeeklyPattern::default())
            }),
            ("AbsoluteMonthlyRecurrence", || {
                RecurrencePattern::AbsoluteMonthly(AbsoluteMonthlyPattern::default())
            }),
            ("RelativeMonthlyRecurrence", || {
                RecurrencePattern::RelativeMonthly(RelativeMonthlyPattern::default())
            }),
            ("AbsoluteYearlyRecurrence", || {
                RecurrencePattern::AbsoluteYearly(AbsoluteYearlyPattern::default())
            }),
            ("RelativeYearlyRecurrence", || {
                RecurrencePattern::RelativeYearly(RelativeYearlyPattern::default())
            }),
            ("DailyRegeneration", || {
                RecurrencePattern::DailyRegeneration(IntervalPattern::default())
            }),
            ("WeeklyRegeneration", || {
                RecurrencePattern::WeeklyRegeneration(IntervalPattern::default())
            }),
            ("MonthlyRegeneration", || {
                RecurrencePattern::MonthlyRegeneration(IntervalPattern::default())
            }),
            ("YearlyRegeneration", || {
                RecurrencePattern::YearlyRegeneration(IntervalPattern::default())
            }),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily(_) => "DailyRecurrence",
            RecurrencePattern::Weekly(_) => "WeeklyRecurrence",
            RecurrencePattern::AbsoluteMonthly(_) => "AbsoluteMonthlyRecurrence",
            RecurrencePattern::RelativeMonthly(_) => "RelativeMonthlyRecurrence",
            RecurrencePattern::AbsoluteYearly(_) => "AbsoluteYearlyRecurrence",
            RecurrencePattern::RelativeYearly(_) => "RelativeYearlyRecurrence",
            RecurrencePattern::DailyRegeneration(_) => "DailyRegeneration",
            RecurrencePattern::WeeklyRegeneration(_) => "WeeklyRegeneration",
            RecurrencePattern::MonthlyRegeneration(_) => "MonthlyRegeneration",
            RecurrencePattern::YearlyRegeneration(_) => "YearlyRegeneration",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        self.load_from_xml(reader, element)
    }
}

impl ComplexProperty for RecurrencePattern {
    fn change_handle(&self) -> &ChangeHandle {
        self.inner().change_handle()
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        self.inner_mut().try_read_element(reader)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        self.inner().write_elements(writer)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.inner().validate()
    }
}

const INTERVAL: &str = "Interval";
const DAYS_OF_WEEK: &str = "DaysOfWeek";
const FIRST_DAY_OF_WEEK: &str = "FirstDayOfWeek";
const DAY_OF_MONTH: &str = "DayOfMonth";
const DAY_OF_WEEK_INDEX: &str = "DayOfWeekIndex";
const MONTH: &str = "Month";

fn try_read_value<T: crate::xml::WireValue>(
    slot: &mut Option<T>,
    name: &str,
    reader: &mut XmlReader,
) -> Result<bool, Error> {
    if !reader.is_start_element(name) {
        return Ok(false);
    }

    *slot = Some(reader.read_element_value(name)?);
    Ok(true)
}

fn write_value<T: crate::xml::WireValue>(
    writer: &mut XmlWriter,
    name: &str,
    value: &Option<T>,
) -> Result<(), Error> {
    match value {
        Some(value) => writer.write_element_value(XmlNamespace::Types, name, value),
        None => Ok(()),
    }
}

fn validate_interval(interval: u32) -> Result<(), ValidationError> {
    if interval < 1 {
        return Err(ValidationError::field(INTERVAL, "the interval must be at least 1"));
    }

    Ok(())
}

fn validate_day_of_month(day_of_month: Option<u32>) -> Result<(), ValidationError> {
    match day_of_month {
        Some(1..=31) => Ok(()),
        Some(_) => Err(ValidationError::field(
            DAY_OF_MONTH,
            "the day of the month must be between 1 and 31",
        )),
        None => Err(ValidationError::field(DAY_OF_MONTH, "a day of the month is required")),
    }
}

fn require<T>(value: &Option<T>, field: &str, reason: &str) -> Result<(), ValidationError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::field(field, reason)),
    }
}

/// A pattern described by its interval alone, such as "every 3 days".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalPattern {
    interval: u32,
    handle: ChangeHandle,
}

impl IntervalPattern {
    pub fn new(interval: u32) -> Self {
        Self {
            interval,
            handle: ChangeHandle::new(),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
        self.mark_changed();
    }
}

impl Default for IntervalPattern {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ComplexProperty for IntervalPattern {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if !reader.is_start_element(INTERVAL) {
            return Ok(false);
        }

        self.interval = reader.read_element_value(INTERVAL)?;
        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(XmlNamespace::Types, INTERVAL, &self.interval)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_interval(self.interval)
    }
}

/// Recurs on a set of days every `interval` weeks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeeklyPattern {
    interval: u32,
    days_of_week: DayOfTheWeekCollection,
    first_day_of_week: Option<DayOfTheWeek>,
    handle: ChangeHandle,
}

impl WeeklyPattern {
    pub fn new(interval: u32, days_of_week: impl IntoIterator<Item = DayOfTheWeek>) -> Self {
        Self {
            interval,
            days_of_week: days_of_week.into_iter().collect(),
            first_day_of_week: None,
            handle: ChangeHandle::new(),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
        self.mark_changed();
    }

    pub fn days_of_week(&self) -> &DayOfTheWeekCollection {
        &self.days_of_week
    }

    pub fn days_of_week_mut(&mut self) -> &mut DayOfTheWeekCollection {
        self.days_of_week.change_handle().attach_to(&self.handle);
        &mut self.days_of_week
    }

    /// The day weeks start on, which determines which days share a week
    /// when `interval` is greater than 1.
    pub fn first_day_of_week(&self) -> Option<DayOfTheWeek> {
        self.first_day_of_week
    }

    pub fn set_first_day_of_week(&mut self, day: Option<DayOfTheWeek>) {
        self.first_day_of_week = day;
        self.mark_changed();
    }
}

impl Default for WeeklyPattern {
    fn default() -> Self {
        Self::new(1, std::iter::empty())
    }
}

impl ComplexProperty for WeeklyPattern {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element(INTERVAL) {
            self.interval = reader.read_element_value(INTERVAL)?;
        } else if reader.is_start_element(DAYS_OF_WEEK) {
            let mut days = DayOfTheWeekCollection::default();
            days.load_from_xml(reader, DAYS_OF_WEEK)?;
            self.days_of_week = days;
        } else if !try_read_value(&mut self.first_day_of_week, FIRST_DAY_OF_WEEK, reader)? {
            return Ok(false);
        }

        Ok(true)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(XmlNamespace::Types, INTERVAL, &self.interval)?;
        self.days_of_week
            .write_to_xml(writer, XmlNamespace::Types, DAYS_OF_WEEK)?;

        if self.first_day_of_week.is_some() {
            ensure_feature_supported(Feature::FirstDayOfWeek, writer.version())?;
            write_value(writer, FIRST_DAY_OF_WEEK, &self.first_day_of_week)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_interval(self.interval)?;

        if self.days_of_week.is_empty() {
            return Err(ValidationError::field(
                DAYS_OF_WEEK,
                "at least one day is required",
            ));
        }

        Ok(())
    }
}

/// Recurs on a fixed day of the month every `interval` months.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbsoluteMonthlyPattern {
    interval: u32,
    day_of_month: Option<u32>,
    handle: ChangeHandle,
}

impl AbsoluteMonthlyPattern {
    pub fn new(interval: u32, day_of_month: u32) -> Self {
        Self {
            interval,
            day_of_month: Some(day_of_month),
            handle: ChangeHandle::new(),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
        self.mark_changed();
    }

    pub fn day_of_month(&self) -> Option<u32> {
        self.day_of_month
    }

    pub fn set_day_of_month(&mut self, day_of_month: u32) {
        self.day_of_month = Some(day_of_month);
        self.mark_changed();
    }
}

impl Default for AbsoluteMonthlyPattern {
    fn default() -> Self {
        Self {
            interval: 1,
            day_of_month: None,
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for AbsoluteMonthlyPattern {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element(INTERVAL) {
            self.interval = reader.read_element_value(INTERVAL)?;
            return Ok(true);
        }

        try_read_value(&mut self.day_of_month, DAY_OF_MONTH, reader)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(XmlNamespace::Types, INTERVAL, &self.interval)?;
        write_value(writer, DAY_OF_MONTH, &self.day_of_month)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_interval(self.interval)?;
        validate_day_of_month(self.day_of_month)
    }
}

/// Recurs on e.g. the second Tuesday of the month every `interval` months.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelativeMonthlyPattern {
    interval: u32,
    day_of_the_week: Option<DayOfTheWeek>,
    day_of_the_week_index: Option<DayOfTheWeekIndex>,
    handle: ChangeHandle,
}

impl RelativeMonthlyPattern {
    pub fn new(interval: u32, day: DayOfTheWeek, index: DayOfTheWeekIndex) -> Self {
        Self {
            interval,
            day_of_the_week: Some(day),
            day_of_the_week_index: Some(index),
            handle: ChangeHandle::new(),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
        self.mark_changed();
    }

    pub fn day_of_the_week(&self) -> Option<DayOfTheWeek> {
        self.day_of_the_week
    }

    pub fn set_day_of_the_week(&mut self, day: DayOfTheWeek) {
        self.day_of_the_week = Some(day);
        self.mark_changed();
    }

    pub fn day_of_the_week_index(&self) -> Option<DayOfTheWeekIndex> {
        self.day_of_the_week_index
    }

    pub fn set_day_of_the_week_index(&mut self, index: DayOfTheWeekIndex) {
        self.day_of_the_week_index = Some(index);
        self.mark_changed();
    }
}

impl Default for RelativeMonthlyPattern {
    fn default() -> Self {
        Self {
            interval: 1,
            day_of_the_week: None,
            day_of_the_week_index: None,
            handle: ChangeHandle::new(),
        }
    }
}

impl ComplexProperty for RelativeMonthlyPattern {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        if reader.is_start_element(INTERVAL) {
            self.interval = reader.read_element_value(INTERVAL)?;
            return Ok(true);
        }

        Ok(try_read_value(&mut self.day_of_the_week, DAYS_OF_WEEK, reader)?
            || try_read_value(&mut self.day_of_the_week_index, DAY_OF_WEEK_INDEX, reader)?)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_element_value(XmlNamespace::Types, INTERVAL, &self.interval)?;
        write_value(writer, DAYS_OF_WEEK, &self.day_of_the_week)?;
        write_value(writer, DAY_OF_WEEK_INDEX, &self.day_of_the_week_index)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_interval(self.interval)?;
        require(&self.day_of_the_week, DAYS_OF_WEEK, "a day of the week is required")?;
        require(
            &self.day_of_the_week_index,
            DAY_OF_WEEK_INDEX,
            "a day of the week index is required",
        )
    }
}

/// Recurs on a fixed date every year.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbsoluteYearlyPattern {
    day_of_month: Option<u32>,
    month: Option<Month>,
    handle: ChangeHandle,
}

impl AbsoluteYearlyPattern {
    pub fn new(day_of_month: u32, month: Month) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            month: Some(month),
            handle: ChangeHandle::new(),
        }
    }

    pub fn day_of_month(&self) -> Option<u32> {
        self.day_of_month
    }

    pub fn set_day_of_month(&mut self, day_of_month: u32) {
        self.day_of_month = Some(day_of_month);
        self.mark_changed();
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn set_month(&mut self, month: Month) {
        self.month = Some(month);
        self.mark_changed();
    }
}

impl ComplexProperty for AbsoluteYearlyPattern {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        Ok(try_read_value(&mut self.day_of_month, DAY_OF_MONTH, reader)?
            || try_read_value(&mut self.month, MONTH, reader)?)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        write_value(writer, DAY_OF_MONTH, &self.day_of_month)?;
        write_value(writer, MONTH, &self.month)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_day_of_month(self.day_of_month)?;
        require(&self.month, MONTH, "a month is required")
    }
}

/// Recurs on e.g. the last Friday of March every year.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelativeYearlyPattern {
    day_of_the_week: Option<DayOfTheWeek>,
    day_of_the_week_index: Option<DayOfTheWeekIndex>,
    month: Option<Month>,
    handle: ChangeHandle,
}

impl RelativeYearlyPattern {
    pub fn new(day: DayOfTheWeek, index: DayOfTheWeekIndex, month: Month) -> Self {
        Self {
            day_of_the_week: Some(day),
            day_of_the_week_index: Some(index),
            month: Some(month),
            handle: ChangeHandle::new(),
        }
    }

    pub fn day_of_the_week(&self) -> Option<DayOfTheWeek> {
        self.day_of_the_week
    }

    pub fn set_day_of_the_week(&mut self, day: DayOfTheWeek) {
        self.day_of_the_week = Some(day);
        self.mark_changed();
    }

    pub fn day_of_the_week_index(&self) -> Option<DayOfTheWeekIndex> {
        self.day_of_the_week_index
    }

    pub fn set_day_of_the_week_index(&mut self, index: DayOfTheWeekIndex) {
        self.day_of_the_week_index = Some(index);
        self.mark_changed();
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn set_month(&mut self, month: Month) {
        self.month = Some(month);
        self.mark_changed();
    }
}

impl ComplexProperty for RelativeYearlyPattern {
    fn change_handle(&self) -> &ChangeHandle {
        &self.handle
    }

    fn try_read_element(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        Ok(try_read_value(&mut self.day_of_the_week, DAYS_OF_WEEK, reader)?
            || try_read_value(&mut self.day_of_the_week_index, DAY_OF_WEEK_INDEX, reader)?
            || try_read_value(&mut self.month, MONTH, reader)?)
    }

    fn write_elements(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        write_value(writer, DAYS_OF_WEEK, &self.day_of_the_week)?;
        write_value(writer, DAY_OF_WEEK_INDEX, &self.day_of_the_week_index)?;
        write_value(writer, MONTH, &self.month)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.day_of_the_week, DAYS_OF_WEEK, "a day of the week is required")?;
        require(
            &self.day_of_the_week_index,
            DAY_OF_WEEK_INDEX,
            "a day of the week index is required",
        )?;
        require(&self.month, MONTH, "a month is required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decoder, test_utils::assert_serialized_content_at, ExchangeVersion};

    fn assert_pattern_round_trip(xml: &str) -> RecurrencePattern {
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST).unwrap();
        let pattern: RecurrencePattern = decoder::decode(&mut reader).unwrap();

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        pattern.write(&mut writer).unwrap();
        assert_eq!(writer.into_string().unwrap(), xml);

        pattern
    }

    #[test]
    fn interval_patterns() {
        for name in [
            "DailyRecurrence",
            "DailyRegeneration",
            "WeeklyRegeneration",
            "MonthlyRegeneration",
            "YearlyRegeneration",
        ] {
            let pattern =
                assert_pattern_round_trip(&format!("<t:{name}><t:Interval>3</t:Interval></t:{name}>"));
            assert_eq!(pattern.discriminator(), name);
            assert_eq!(pattern.validate(), Ok(()));
        }
    }

    #[test]
    fn weekly_pattern() {
        let pattern = assert_pattern_round_trip(
            "<t:WeeklyRecurrence><t:Interval>2</t:Interval><t:DaysOfWeek>Monday Wednesday</t:DaysOfWeek><t:FirstDayOfWeek>Sunday</t:FirstDayOfWeek></t:WeeklyRecurrence>",
        );

        let RecurrencePattern::Weekly(weekly) = pattern else {
            panic!("expected a weekly pattern");
        };
        assert_eq!(weekly.interval(), 2);
        assert!(weekly.days_of_week().contains(DayOfTheWeek::Wednesday));
        assert_eq!(weekly.first_day_of_week(), Some(DayOfTheWeek::Sunday));
    }

    #[test]
    fn first_day_of_week_is_version_gated() {
        let mut weekly = WeeklyPattern::new(1, [DayOfTheWeek::Friday]);
        assert_serialized_content_at(
            &weekly,
            "WeeklyRecurrence",
            "<t:WeeklyRecurrence><t:Interval>1</t:Interval><t:DaysOfWeek>Friday</t:DaysOfWeek></t:WeeklyRecurrence>",
            ExchangeVersion::Exchange2007_SP1,
        );

        weekly.set_first_day_of_week(Some(DayOfTheWeek::Monday));
        let mut writer = XmlWriter::new(ExchangeVersion::Exchange2010);
        let err = weekly
            .write_to_xml(&mut writer, XmlNamespace::Types, "WeeklyRecurrence")
            .expect_err("FirstDayOfWeek doesn't exist before Exchange 2010 SP1");
        assert!(matches!(
            err,
            Error::UnsupportedFeature {
                feature: Feature::FirstDayOfWeek,
                ..
            }
        ));
    }

    #[test]
    fn monthly_and_yearly_patterns() {
        assert_pattern_round_trip(
            "<t:AbsoluteMonthlyRecurrence><t:Interval>1</t:Interval><t:DayOfMonth>15</t:DayOfMonth></t:AbsoluteMonthlyRecurrence>",
        );
        assert_pattern_round_trip(
            "<t:RelativeMonthlyRecurrence><t:Interval>2</t:Interval><t:DaysOfWeek>Tuesday</t:DaysOfWeek><t:DayOfWeekIndex>Second</t:DayOfWeekIndex></t:RelativeMonthlyRecurrence>",
        );
        assert_pattern_round_trip(
            "<t:AbsoluteYearlyRecurrence><t:DayOfMonth>29</t:DayOfMonth><t:Month>February</t:Month></t:AbsoluteYearlyRecurrence>",
        );

        let pattern = assert_pattern_round_trip(
            "<t:RelativeYearlyRecurrence><t:DaysOfWeek>WeekendDay</t:DaysOfWeek><t:DayOfWeekIndex>Last</t:DayOfWeekIndex><t:Month>March</t:Month></t:RelativeYearlyRecurrence>",
        );
        assert_eq!(
            pattern,
            RecurrencePattern::RelativeYearly(RelativeYearlyPattern::new(
                DayOfTheWeek::WeekendDay,
                DayOfTheWeekIndex::Last,
                Month::March,
            ))
        );
    }

    #[test]
    fn pattern_validation() {
        let err = IntervalPattern::new(0).validate().unwrap_err();
        assert_eq!(err.path, [INTERVAL]);

        let err = WeeklyPattern::default().validate().unwrap_err();
        assert_eq!(err.path, [DAYS_OF_WEEK]);

        let err = AbsoluteMonthlyPattern::new(1, 32).validate().unwrap_err();
        assert_eq!(err.path, [DAY_OF_MONTH]);
        assert!(AbsoluteMonthlyPattern::default().validate().is_err());

        let mut relative = RelativeMonthlyPattern::default();
        relative.set_day_of_the_week(DayOfTheWeek::Thursday);
        let err = relative.validate().unwrap_err();
        assert_eq!(err.path, [DAY_OF_WEEK_INDEX]);

        let err = AbsoluteYearlyPattern {
            day_of_month: Some(1),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.path, [MONTH]);

        assert!(RelativeYearlyPattern::default().validate().is_err());
    }

    #[test]
    fn unknown_pattern() {
        let mut reader = XmlReader::new(
            "<t:HourlyRecurrence><t:Interval>1</t:Interval></t:HourlyRecurrence>",
            ExchangeVersion::LATEST,
        )
        .unwrap();

        assert!(matches!(
            decoder::decode::<RecurrencePattern>(&mut reader),
            Err(Error::UnknownVariant { family: "RecurrencePattern", .. })
        ));
    }
}
