use crate::core::error::MatchmakerError;
use crate::models::{CandidateRow, DiscoverQuery, UserId};
use crate::services::{MatchStore, StoreError};
use chrono::{Datelike, Months, NaiveDate};
use std::collections::HashSet;

/// Largest age accepted by the exact-age filter
pub const MAX_AGE_FILTER: u32 = 150;

/// Optional discovery filters supplied by the requester
///
/// `None` means "no constraint". Age is an exact match on the computed
/// age, not a lower bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryFilters {
    pub age: Option<u32>,
    pub gender: Option<String>,
}

impl DiscoveryFilters {
    /// Parse raw query-string values
    ///
    /// Empty strings and an age of 0 are the "no filter" sentinels.
    pub fn from_query(query: &DiscoverQuery) -> Result<Self, MatchmakerError> {
        let age = match query.age.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let age: i64 = raw
                    .parse()
                    .map_err(|_| MatchmakerError::Validation("Age filter must be a number".to_string()))?;
                if age < 0 {
                    return Err(MatchmakerError::Validation("Age filter must be more than 0".to_string()));
                }
                if age > i64::from(MAX_AGE_FILTER) {
                    return Err(MatchmakerError::Validation(format!(
                        "Age filter must be at most {}",
                        MAX_AGE_FILTER
                    )));
                }
                (age != 0).then_some(age as u32)
            }
        };

        let gender = query
            .gender
            .as_deref()
            .filter(|gender| !gender.is_empty())
            .map(str::to_string);

        Ok(Self { age, gender })
    }
}

/// Whole calendar years between `date_of_birth` and `today`
///
/// A birthday not yet reached this year does not count. Future dates of
/// birth yield 0.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Dates of birth yielding one exact age on a given day: `(earliest, latest]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthWindow {
    pub earliest_exclusive: NaiveDate,
    pub latest: NaiveDate,
}

impl BirthWindow {
    /// Window of birth dates for which `age_on(dob, today) == age`
    pub fn for_age(age: u32, today: NaiveDate) -> Option<Self> {
        let latest = today.checked_sub_months(Months::new(age.checked_mul(12)?))?;
        let earliest_exclusive = today.checked_sub_months(Months::new(age.checked_add(1)?.checked_mul(12)?))?;
        Some(Self {
            earliest_exclusive,
            latest,
        })
    }

    #[inline]
    pub fn contains(&self, date_of_birth: NaiveDate) -> bool {
        date_of_birth > self.earliest_exclusive && date_of_birth <= self.latest
    }
}

/// Inclusion/exclusion predicate handed to storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub requester_id: UserId,
    pub gender: Option<String>,
    pub birth_window: Option<BirthWindow>,
}

impl CandidateQuery {
    /// Build the query for `requester_id` on day `today`
    pub fn build(
        requester_id: UserId,
        filters: &DiscoveryFilters,
        today: NaiveDate,
    ) -> Result<Self, MatchmakerError> {
        let birth_window = match filters.age {
            Some(age) => Some(BirthWindow::for_age(age, today).ok_or_else(|| {
                MatchmakerError::Validation(format!("Age filter {} is out of range", age))
            })?),
            None => None,
        };

        Ok(Self {
            requester_id,
            gender: filters.gender.clone(),
            birth_window,
        })
    }

    /// Whether a stored profile passes the predicate
    ///
    /// `swiped` holds every target the requester has swiped on, liked or not.
    #[inline]
    pub fn admits(
        &self,
        id: UserId,
        gender: &str,
        date_of_birth: NaiveDate,
        swiped: &HashSet<UserId>,
    ) -> bool {
        if id == self.requester_id || swiped.contains(&id) {
            return false;
        }

        if let Some(wanted) = &self.gender {
            if wanted != gender {
                return false;
            }
        }

        if let Some(window) = &self.birth_window {
            if !window.contains(date_of_birth) {
                return false;
            }
        }

        true
    }
}

/// Fetch the raw candidate rows for a requester
pub async fn fetch_candidates(
    store: &dyn MatchStore,
    query: &CandidateQuery,
) -> Result<Vec<CandidateRow>, StoreError> {
    let rows = store.fetch_candidates(query).await?;

    tracing::debug!(
        "Fetched {} candidate rows for user {}",
        rows.len(),
        query.requester_id
    );

    Ok(rows)
}
