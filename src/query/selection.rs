use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use super::kind::{FilterScope, QueryKind};

/// The analyst's year / quarter / state choice for one render cycle
///
/// All three sets are non-empty; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSelection")]
pub struct FilterSelection {
    years: BTreeSet<i64>,
    quarters: BTreeSet<i64>,
    states: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<Y, Q, S, T>(years: Y, quarters: Q, states: S) -> Result<Self, SelectionError>
    where
        Y: IntoIterator<Item = i64>,
        Q: IntoIterator<Item = i64>,
        S: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let years: BTreeSet<i64> = years.into_iter().collect();
        let quarters: BTreeSet<i64> = quarters.into_iter().collect();
        let states: BTreeSet<String> = states.into_iter().map(Into::into).collect();

        let mut missing = Vec::new();
        if years.is_empty() {
            missing.push("Year");
        }
        if quarters.is_empty() {
            missing.push("Quarter");
        }
        if states.is_empty() {
            missing.push("State");
        }
        if !missing.is_empty() {
            return Err(SelectionError { missing });
        }

        Ok(Self { years, quarters, states })
    }

    pub fn years(&self) -> &BTreeSet<i64> {
        &self.years
    }

    pub fn quarters(&self) -> &BTreeSet<i64> {
        &self.quarters
    }

    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }
}

/// Wire form of a selection, checked by `FilterSelection::new` on the way in
#[derive(Deserialize)]
struct RawSelection {
    #[serde(default)]
    years: BTreeSet<i64>,
    #[serde(default)]
    quarters: BTreeSet<i64>,
    #[serde(default)]
    states: BTreeSet<String>,
}

impl TryFrom<RawSelection> for FilterSelection {
    type Error = SelectionError;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        FilterSelection::new(raw.years, raw.quarters, raw.states)
    }
}

/// Returned when a selection leaves years, quarters or states empty
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionError {
    /// Which selections were empty ("Year", "Quarter", "State")
    pub missing: Vec<&'static str>,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Please select at least one Year, Quarter, and State (missing: {})",
            self.missing.join(", ")
        )
    }
}

impl std::error::Error for SelectionError {}

/// The part of a selection one query filters on
///
/// A `None` set means the query does not filter on that attribute at all.
/// Together with the `QueryKind` this is the result cache key, so a yearly
/// trend query is shared across renders that differ only in years or states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pub years: Option<BTreeSet<i64>>,
    pub quarters: Option<BTreeSet<i64>>,
    pub states: Option<BTreeSet<String>>,
}

impl QueryParams {
    /// Mask a selection down to the filters `kind` applies
    pub fn for_kind(kind: &QueryKind, selection: &FilterSelection) -> Self {
        Self::scoped(kind.shape().scope, selection)
    }

    pub fn scoped(scope: FilterScope, selection: &FilterSelection) -> Self {
        Self {
            years: scope.years.then(|| selection.years.clone()),
            quarters: scope.quarters.then(|| selection.quarters.clone()),
            states: scope.states.then(|| selection.states.clone()),
        }
    }

    /// No filters at all
    pub fn unfiltered() -> Self {
        Self::default()
    }
}
