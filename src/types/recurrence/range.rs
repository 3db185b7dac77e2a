/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::{
    decoder::VariantFamily,
    xml::{Date, XmlNamespace, XmlReader, XmlWriter},
    Error,
};

const START_DATE: &str = "StartDate";
const END_DATE: &str = "EndDate";
const NUMBER_OF_OCCURRENCES: &str = "NumberOfOccurrences";

/// The wire form of the span a recurrence covers.
///
/// [`super::Recurrence`] flattens this into a start date and a
/// [`super::RecurrenceEnd`]; this type only exists at the XML boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RecurrenceRange {
    NoEnd {
        start_date: Option<Date>,
    },
    EndDate {
        start_date: Option<Date>,
        end_date: Option<Date>,
    },
    Numbered {
        start_date: Option<Date>,
        occurrences: Option<u32>,
    },
}

impl RecurrenceRange {
    pub(crate) fn start_date(&self) -> Option<Date> {
        match self {
            RecurrenceRange::NoEnd { start_date }
            | RecurrenceRange::EndDate { start_date, .. }
            | RecurrenceRange::Numbered { start_date, .. } => *start_date,
        }
    }

    fn read_child(&mut self, reader: &mut XmlReader) -> Result<bool, Error> {
        let start = match self {
            RecurrenceRange::NoEnd { start_date }
            | RecurrenceRange::EndDate { start_date, .. }
            | RecurrenceRange::Numbered { start_date, .. } => start_date,
        };
        if reader.is_start_element(START_DATE) {
            *start = Some(reader.read_element_value(START_DATE)?);
            return Ok(true);
        }

        match self {
            RecurrenceRange::EndDate { end_date, .. } if reader.is_start_element(END_DATE) => {
                *end_date = Some(reader.read_element_value(END_DATE)?);
            }
            RecurrenceRange::Numbered { occurrences, .. }
                if reader.is_start_element(NUMBER_OF_OCCURRENCES) =>
            {
                *occurrences = Some(reader.read_element_value(NUMBER_OF_OCCURRENCES)?);
            }
            _ => return Ok(false),
        }

        Ok(true)
    }

    pub(crate) fn write(&self, writer: &mut XmlWriter) -> Result<(), Error> {
        writer.write_start_element(XmlNamespace::Types, self.discriminator())?;

        if let Some(start_date) = self.start_date() {
            writer.write_element_value(XmlNamespace::Types, START_DATE, &start_date)?;
        }

        match self {
            RecurrenceRange::NoEnd { .. } => {}
            RecurrenceRange::EndDate { end_date, .. } => {
                if let Some(end_date) = end_date {
                    writer.write_element_value(XmlNamespace::Types, END_DATE, end_date)?;
                }
            }
            RecurrenceRange::Numbered { occurrences, .. } => {
                if let Some(occurrences) = occurrences {
                    writer.write_element_value(
                        XmlNamespace::Types,
                        NUMBER_OF_OCCURRENCES,
                        occurrences,
                    )?;
                }
            }
        }

        writer.write_end_element()
    }
}

impl VariantFamily for RecurrenceRange {
    const FAMILY: &'static str = "RecurrenceRange";

    fn variants() -> &'static [(&'static str, fn() -> Self)] {
        static VARIANTS: &[(&str, fn() -> RecurrenceRange)] = &[
            ("NoEndRecurrence", || RecurrenceRange::NoEnd { start_date: None }),
            ("EndDateRecurrence", || RecurrenceRange::EndDate {
                start_date: None,
                end_date: None,
            }),
            ("NumberedRecurrence", || RecurrenceRange::Numbered {
                start_date: None,
                occurrences: None,
            }),
        ];

        VARIANTS
    }

    fn discriminator(&self) -> &'static str {
        match self {
            RecurrenceRange::NoEnd { .. } => "NoEndRecurrence",
            RecurrenceRange::EndDate { .. } => "EndDateRecurrence",
            RecurrenceRange::Numbered { .. } => "NumberedRecurrence",
        }
    }

    fn load_variant(&mut self, reader: &mut XmlReader, element: &str) -> Result<(), Error> {
        reader.read_start_element(element)?;

        while !reader.is_end_element(element) {
            if !reader.is_start() || !self.read_child(reader)? {
                return Err(reader.unexpected(format!("a known child of <{element}>")));
            }
        }

        reader.read_end_element(element)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::{decoder, ExchangeVersion};

    #[test]
    fn numbered_range() {
        let xml = "<t:NumberedRecurrence><t:StartDate>2024-03-01</t:StartDate><t:NumberOfOccurrences>10</t:NumberOfOccurrences></t:NumberedRecurrence>";
        let mut reader = XmlReader::new(xml, ExchangeVersion::LATEST).unwrap();
        let range: RecurrenceRange = decoder::decode(&mut reader).unwrap();

        assert_eq!(
            range,
            RecurrenceRange::Numbered {
                start_date: Some(Date(date!(2024 - 03 - 01))),
                occurrences: Some(10),
            }
        );

        let mut writer = XmlWriter::new(ExchangeVersion::LATEST);
        range.write(&mut writer).unwrap();
        assert_eq!(writer.into_string().unwrap(), xml);
    }

    #[test]
    fn end_date_belongs_to_end_date_ranges_only() {
        let mut reader = XmlReader::new(
            "<t:NoEndRecurrence><t:StartDate>2024-03-01</t:StartDate><t:EndDate>2024-04-01</t:EndDate></t:NoEndRecurrence>",
            ExchangeVersion::LATEST,
        )
        .unwrap();

        assert!(matches!(
            decoder::decode::<RecurrenceRange>(&mut reader),
            Err(Error::UnexpectedElement { .. })
        ));
    }
}
