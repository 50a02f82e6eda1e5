use crate::ValidationError;
use chrono::{Duration, NaiveDate};
use std::fmt::{self, Display, Formatter};

/// An inclusive range of calendar days.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::EmptyDateRange { from, to });
        }

        Ok(DateRange { from, to })
    }

    /// Turn the dates given on the command line into the range to request.
    ///
    /// Without a start date there is no range at all and the bank picks up
    /// where the last download stopped. The banks only serve finished days,
    /// so an end date which is missing, today or in the future becomes
    /// yesterday.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Option<Self>, ValidationError> {
        let from = match from {
            Some(from) => from,
            None => return Ok(None),
        };

        let yesterday = today - Duration::days(1);
        let to = match to {
            Some(to) if to < today => to,
            _ => yesterday,
        };

        DateRange::new(from, to).map(Some)
    }

    pub fn from(&self) -> NaiveDate { self.from }

    pub fn to(&self) -> NaiveDate { self.to }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.from, self.to)
    }
}
