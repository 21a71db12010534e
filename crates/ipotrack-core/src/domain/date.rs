use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::error::ValidationError;

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date in ISO `YYYY-MM-DD` form.
///
/// Listing dates are plain calendar dates; there is no intraday component
/// anywhere in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate(Date);

impl IsoDate {
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    /// Date shifted by a number of calendar days (saturating at the
    /// representable range, which daily market data never approaches).
    pub fn plus_days(self, days: i64) -> Self {
        Self(
            self.0
                .checked_add(Duration::days(days))
                .unwrap_or(self.0),
        )
    }

    /// First day of the calendar month containing this date.
    pub fn first_of_month(self) -> Self {
        Self(self.0.replace_day(1).expect("day 1 exists in every month"))
    }

    /// First day of the following calendar month.
    pub fn next_month_start(self) -> Self {
        // Jumping 32 days from the 1st always lands in the next month.
        self.first_of_month().plus_days(32).first_of_month()
    }

    /// Whole days from `earlier` to `self` (negative if `self` is earlier).
    pub fn days_since(self, earlier: IsoDate) -> i64 {
        (self.0 - earlier.0).whole_days()
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(ISO_DATE)
            .expect("IsoDate must be ISO formattable")
    }
}

impl Display for IsoDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for IsoDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
