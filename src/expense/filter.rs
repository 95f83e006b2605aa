//! Parsing the month and date query strings used to narrow expense queries.

use time::{Date, Month, macros::format_description};

use crate::Error;

/// The error message shown for a month string that is not YYYY-MM.
pub const INVALID_MONTH_MSG: &str = "Invalid month format. Use YYYY-MM.";
/// The error message shown for a date string that is not YYYY-MM-DD.
pub const INVALID_DATE_MSG: &str = "Invalid date format. Use YYYY-MM-DD.";

/// A predicate narrowing an expense listing query.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseFilter {
    /// No filter, all of the user's expenses.
    All,
    /// Expenses whose date falls within a single calendar month.
    Month {
        /// The calendar year.
        year: i32,
        /// The month within `year`.
        month: Month,
    },
    /// Expenses dated exactly this day.
    Date(Date),
    /// Expenses whose category matches this string, ignoring case.
    Category(String),
}

impl ExpenseFilter {
    /// Build a filter from the home page's optional query parameters.
    ///
    /// The month parameter takes precedence when both are present. Empty
    /// strings, e.g. from a form submitted with blank inputs, count as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidFilter] with a user-facing message if the
    /// chosen parameter is malformed.
    pub fn from_query(month: Option<&str>, date: Option<&str>) -> Result<Self, Error> {
        match (month, date) {
            (Some(month), _) if !month.is_empty() => Self::parse_month(month),
            (_, Some(date)) if !date.is_empty() => Self::parse_date(date),
            _ => Ok(Self::All),
        }
    }

    /// Parse a month filter from a string of the form YYYY-MM.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidFilter] if `text` is not of the form YYYY-MM
    /// or the month is not in 1-12.
    pub fn parse_month(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidFilter(INVALID_MONTH_MSG.to_owned());

        let (year_text, month_text) = text.split_once('-').ok_or_else(invalid)?;

        if year_text.len() != 4 || month_text.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year_text.parse().map_err(|_| invalid())?;
        let month_number: u8 = month_text.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month_number).map_err(|_| invalid())?;

        Ok(Self::Month { year, month })
    }

    /// Parse an exact date filter from a string of the form YYYY-MM-DD.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidFilter] if `text` is not a valid calendar
    /// date of the form YYYY-MM-DD.
    pub fn parse_date(text: &str) -> Result<Self, Error> {
        Date::parse(text, format_description!("[year]-[month]-[day]"))
            .map(Self::Date)
            .map_err(|_| Error::InvalidFilter(INVALID_DATE_MSG.to_owned()))
    }
}

#[cfg(test)]
mod filter_tests {
    use time::{Month, macros::date};

    use crate::Error;

    use super::{ExpenseFilter, INVALID_DATE_MSG, INVALID_MONTH_MSG};

    #[test]
    fn parses_valid_month() {
        assert_eq!(
            ExpenseFilter::parse_month("2024-05"),
            Ok(ExpenseFilter::Month {
                year: 2024,
                month: Month::May
            })
        );
    }

    #[test]
    fn rejects_malformed_months() {
        for text in ["2024", "2024-13", "2024-00", "24-05", "2024-5", "May 2024"] {
            assert_eq!(
                ExpenseFilter::parse_month(text),
                Err(Error::InvalidFilter(INVALID_MONTH_MSG.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn parses_valid_date() {
        assert_eq!(
            ExpenseFilter::parse_date("2024-05-12"),
            Ok(ExpenseFilter::Date(date!(2024 - 05 - 12)))
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in ["2024-05", "2024-02-30", "12/05/2024", "yesterday"] {
            assert_eq!(
                ExpenseFilter::parse_date(text),
                Err(Error::InvalidFilter(INVALID_DATE_MSG.to_owned())),
                "want {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn from_query_with_no_parameters_is_all() {
        assert_eq!(ExpenseFilter::from_query(None, None), Ok(ExpenseFilter::All));
    }

    #[test]
    fn from_query_treats_empty_strings_as_absent() {
        assert_eq!(
            ExpenseFilter::from_query(Some(""), Some("")),
            Ok(ExpenseFilter::All)
        );
    }

    #[test]
    fn from_query_prefers_month_over_date() {
        assert_eq!(
            ExpenseFilter::from_query(Some("2024-05"), Some("2024-05-12")),
            Ok(ExpenseFilter::Month {
                year: 2024,
                month: Month::May
            })
        );
    }

    #[test]
    fn from_query_falls_back_to_date() {
        assert_eq!(
            ExpenseFilter::from_query(None, Some("2024-05-12")),
            Ok(ExpenseFilter::Date(date!(2024 - 05 - 12)))
        );
    }
}
