use std::fmt::{Display, Formatter};
use thiserror::*;

use time::format_description::well_known::Iso8601;
use time::{Date, Duration, Month, Weekday};

#[derive(Debug, Error)]
pub enum DateUtilsError {
    #[error("Invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),

    #[error("Could not parse date: {0}")]
    ParseError(#[from] time::error::Parse),

    #[error("Could not format date: {0}")]
    FormatError(#[from] time::error::Format),

    #[error("Date order wrong. {0} must be before or equal to {1}")]
    DateOrderWrong(Date, Date),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
            Weekday::Sunday => Self::Sunday,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local_name())
    }
}

impl DayOfWeek {
    /// ISO 8601 weekday number, Monday is 1.
    pub fn to_number(&self) -> u8 {
        match self {
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
            DayOfWeek::Sunday => 7,
        }
    }

    /// Swedish weekday name as shown on timesheets.
    pub fn local_name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Måndag",
            DayOfWeek::Tuesday => "Tisdag",
            DayOfWeek::Wednesday => "Onsdag",
            DayOfWeek::Thursday => "Torsdag",
            DayOfWeek::Friday => "Fredag",
            DayOfWeek::Saturday => "Lördag",
            DayOfWeek::Sunday => "Söndag",
        }
    }

    pub fn is_weekend(&self) -> bool {
        self.to_number() >= 6
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: Date,
    to: Date,
}

impl DateRange {
    pub fn new(from: Date, to: Date) -> Result<Self, DateUtilsError> {
        if to < from {
            return Err(DateUtilsError::DateOrderWrong(from, to));
        }
        Ok(Self { from, to })
    }

    pub fn single(date: Date) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    pub fn month(year: i32, month: u8) -> Result<Self, DateUtilsError> {
        let month: Month = month.try_into()?;
        let from = Date::from_calendar_date(year, month, 1)?;
        let first_of_next_month = if month == Month::December {
            Date::from_calendar_date(year + 1, Month::January, 1)?
        } else {
            Date::from_calendar_date(year, month.next(), 1)?
        };
        Ok(Self {
            from,
            to: first_of_next_month - Duration::days(1),
        })
    }

    pub fn year(year: i32) -> Result<Self, DateUtilsError> {
        Ok(Self {
            from: Date::from_calendar_date(year, Month::January, 1)?,
            to: Date::from_calendar_date(year, Month::December, 31)?,
        })
    }

    pub fn from(&self) -> Date {
        self.from
    }

    pub fn to(&self) -> Date {
        self.to
    }

    pub fn iter(&self) -> DateRangeIterator {
        DateRangeIterator {
            next: Some(self.from),
            to: self.to,
        }
    }
}

impl IntoIterator for &DateRange {
    type Item = Date;
    type IntoIter = DateRangeIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct DateRangeIterator {
    next: Option<Date>,
    to: Date,
}

impl Iterator for DateRangeIterator {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|date| *date <= self.to)?;
        self.next = current.next_day();
        Some(current)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<Date, DateUtilsError> {
    Ok(Date::parse(value, &Iso8601::DATE)?)
}

pub fn format_iso_date(date: Date) -> Result<String, DateUtilsError> {
    Ok(date.format(&Iso8601::DATE)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_local_name() {
        assert_eq!(DayOfWeek::from(Weekday::Saturday).local_name(), "Lördag");
        assert_eq!(DayOfWeek::Monday.to_string(), "Måndag");
        assert!(DayOfWeek::Sunday.is_weekend());
        assert!(DayOfWeek::Saturday.is_weekend());
        assert_eq!(DayOfWeek::Sunday.to_number(), 7);
        assert!(!DayOfWeek::Friday.is_weekend());
    }

    #[test]
    fn test_month_range() {
        let february = DateRange::month(2024, 2).unwrap();
        assert_eq!(february.from(), date!(2024 - 02 - 01));
        assert_eq!(february.to(), date!(2024 - 02 - 29));
        assert_eq!(february.iter().count(), 29);

        let december = DateRange::month(2023, 12).unwrap();
        assert_eq!(december.to(), date!(2023 - 12 - 31));
    }

    #[test]
    fn test_month_out_of_range() {
        assert!(DateRange::month(2024, 0).is_err());
        assert!(DateRange::month(2024, 13).is_err());
    }

    #[test]
    fn test_year_range() {
        let year = DateRange::year(2023).unwrap();
        assert_eq!(year.from(), date!(2023 - 01 - 01));
        assert_eq!(year.to(), date!(2023 - 12 - 31));
        assert_eq!(year.iter().count(), 365);
    }

    #[test]
    fn test_date_order() {
        let result = DateRange::new(date!(2024 - 01 - 10), date!(2024 - 01 - 09));
        assert!(matches!(result, Err(DateUtilsError::DateOrderWrong(_, _))));

        let single = DateRange::new(date!(2024 - 01 - 10), date!(2024 - 01 - 10)).unwrap();
        assert_eq!(single, DateRange::single(date!(2024 - 01 - 10)));
        assert_eq!(single.iter().collect::<Vec<_>>(), vec![date!(2024 - 01 - 10)]);
    }

    #[test]
    fn test_iso_dates() {
        let parsed = parse_iso_date("2024-03-31").unwrap();
        assert_eq!(parsed, date!(2024 - 03 - 31));
        assert_eq!(format_iso_date(parsed).unwrap(), "2024-03-31");
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("31/3").is_err());
    }
}
