//! Resolution of raw date tokens into a validated query interval.

use crate::dataset::store::ClimateStore;
use crate::error::ClimateApiError;
use chrono::NaiveDate;
use thiserror::Error;

/// The only token format accepted for date parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A concrete `[start, end]` date pair, inclusive on both ends.
///
/// `start <= end` is deliberately not enforced: an inverted interval is a
/// legal query whose filter matches nothing, and the stats over it come back
/// empty rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("invalid date '{token}', expected YYYY-MM-DD")]
    InvalidDateFormat { token: String },

    #[error("end date {requested} is beyond the latest observation date {max_date} in the dataset")]
    EndDateOutOfRange {
        requested: NaiveDate,
        max_date: NaiveDate,
    },
}

/// Turns a required start token and optional end token into a
/// [`DateInterval`], using the dataset's maximum observation date as both the
/// default end and the validation ceiling.
pub struct RangeResolver<'a> {
    store: &'a ClimateStore,
}

impl<'a> RangeResolver<'a> {
    pub fn new(store: &'a ClimateStore) -> Self {
        Self { store }
    }

    /// Looks up the dataset bounds and resolves the tokens against them.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::InvalidDateFormat`] for a malformed token,
    /// [`RangeError::EndDateOutOfRange`] when the end postdates the dataset,
    /// and [`crate::DatasetError::NoDataAvailable`] when there is no data to
    /// resolve against.
    pub async fn resolve(
        &self,
        start_token: &str,
        end_token: Option<&str>,
    ) -> Result<DateInterval, ClimateApiError> {
        let max_date = self.store.max_observation_date().await?;
        Ok(resolve_with_bounds(start_token, end_token, max_date)?)
    }
}

/// The pure half of resolution, separated from the bounds lookup.
///
/// An absent end token defaults the end to `max_date`; a present one must not
/// parse to a date beyond it. The start is intentionally unvalidated: a start
/// past the dataset simply selects nothing.
pub fn resolve_with_bounds(
    start_token: &str,
    end_token: Option<&str>,
    max_date: NaiveDate,
) -> Result<DateInterval, RangeError> {
    let start = parse_token(start_token)?;
    let end = match end_token {
        None => max_date,
        Some(token) => {
            let end = parse_token(token)?;
            if end > max_date {
                return Err(RangeError::EndDateOutOfRange {
                    requested: end,
                    max_date,
                });
            }
            end
        }
    };
    Ok(DateInterval { start, end })
}

fn parse_token(token: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| RangeError::InvalidDateFormat {
        token: token.to_string(),
    })
}
