//! A date and time as decoded from one DCF77 minute frame.

use core::fmt;

use time::Weekday;

/// One decoded broadcast frame.
///
/// Values are taken as the receiver reports them; the core never validates them. `year` is the
/// two-digit year (add 2000), and `day_of_week` runs from 1 (Monday) to 7 (Sunday) with 0 meaning
/// the receiver left it unset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub day_of_week: u8,
}

impl DecodedTime {
    #[must_use]
    pub const fn full_year(&self) -> u16 {
        2000_u16.saturating_add(self.year as u16)
    }

    /// The weekday, or `None` when `day_of_week` is 0 or above 7.
    #[must_use]
    pub const fn weekday(&self) -> Option<Weekday> {
        match self.day_of_week {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// `HH:MM`
    #[must_use]
    pub const fn hours_minutes(&self) -> HoursMinutes {
        HoursMinutes(*self)
    }

    /// `DD.MM.YYYY`
    #[must_use]
    pub const fn calendar_date(&self) -> CalendarDate {
        CalendarDate(*self)
    }

    /// Full weekday name, or "Unknown" for an out-of-range day.
    #[must_use]
    pub const fn weekday_name(&self) -> WeekdayName {
        WeekdayName(self.weekday())
    }
}

pub struct HoursMinutes(DecodedTime);

impl fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour, self.0.minute)
    }
}

pub struct CalendarDate(DecodedTime);

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.0.day, self.0.month, self.0.full_year())
    }
}

pub struct WeekdayName(Option<Weekday>);

impl fmt::Display for WeekdayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(weekday) => write!(f, "{weekday}"),
            None => f.write_str("Unknown"),
        }
    }
}
