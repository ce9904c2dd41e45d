//! Swedish public holidays ("röda dagar").

use time::{Date, Duration, Month, Weekday};

/// Western Easter Sunday of the given year (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<Date> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    let month = Month::try_from(month as u8).ok()?;
    Date::from_calendar_date(year, month, day as u8).ok()
}

/// Returns true for non-working public holidays.
///
/// Observed days:
/// * New Year's Day (Jan 1), Epiphany (Jan 6)
/// * Good Friday, Easter Sunday, Easter Monday
/// * Labour Day (May 1)
/// * Ascension Day (39 days after Easter)
/// * Pentecost (49 days after Easter)
/// * National Day (Jun 6)
/// * Midsummer Eve (Friday between Jun 19 and Jun 25)
/// * All Saints' Day (Saturday between Oct 31 and Nov 6)
/// * Christmas Eve, Christmas Day, Boxing Day, New Year's Eve
pub fn is_red_day(date: Date) -> bool {
    let month = date.month();
    let day = date.day();
    let weekday = date.weekday();
    let offset_from_easter =
        easter_sunday(date.year()).map(|easter| (date - easter).whole_days());

    // New Year's Day / Epiphany
    (month == Month::January && (day == 1 || day == 6))
        // Labour Day
        || (month == Month::May && day == 1)
        // National Day
        || (month == Month::June && day == 6)
        // Christmas Eve / Christmas Day / Boxing Day / New Year's Eve
        || (month == Month::December && matches!(day, 24 | 25 | 26 | 31))
        // Good Friday, Easter Sunday, Easter Monday, Ascension Day, Pentecost
        || matches!(offset_from_easter, Some(-2 | 0 | 1 | 39 | 49))
        // Midsummer Eve
        || (weekday == Weekday::Friday && month == Month::June && (19..=25).contains(&day))
        // All Saints' Day
        || (weekday == Weekday::Saturday
            && ((month == Month::October && day == 31)
                || (month == Month::November && day <= 6)))
}

/// The first Monday of January in the given year.
pub fn first_monday_of_year(year: i32) -> Option<Date> {
    let new_year = Date::from_calendar_date(year, Month::January, 1).ok()?;
    let days_until_monday = (7 - new_year.weekday().number_days_from_monday()) % 7;
    Some(new_year + Duration::days(days_until_monday as i64))
}
