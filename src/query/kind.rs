use std::fmt;
use std::str::FromStr;
use crate::catalog::SemanticField;

/// Which filters of the selection a query applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterScope {
    pub years: bool,
    pub quarters: bool,
    pub states: bool,
}

impl FilterScope {
    /// Years, quarters and states
    pub const STATEWISE: FilterScope = FilterScope { years: true, quarters: true, states: true };
    /// Quarters only: yearly trends always span every year and every state
    pub const YEARLY: FilterScope = FilterScope { years: false, quarters: true, states: false };
    /// Years and quarters
    pub const PERIOD: FilterScope = FilterScope { years: true, quarters: true, states: false };
    /// Quarters and states: category trends span every year
    pub const TREND: FilterScope = FilterScope { years: false, quarters: true, states: true };
    pub const NONE: FilterScope = FilterScope { years: false, quarters: false, states: false };
}

/// Static description of one builder function's output
#[derive(Debug, Clone, Copy)]
pub struct QueryShape {
    /// Logical dataset name in the catalog
    pub dataset: &'static str,
    /// Grouping fields and their output column names
    pub group_by: &'static [(SemanticField, &'static str)],
    /// Summed fields and their output column names
    pub measures: &'static [(SemanticField, &'static str)],
    pub scope: FilterScope,
    /// Output columns to order by, ascending
    pub order_by: &'static [&'static str],
}

impl QueryShape {
    /// Output column names, grouping columns first
    pub fn output_columns(&self) -> Vec<String> {
        self.group_by
            .iter()
            .chain(self.measures.iter())
            .map(|(_, alias)| alias.to_string())
            .collect()
    }
}

const BY_STATE: &[(SemanticField, &str)] = &[(SemanticField::State, "State")];
const BY_YEAR: &[(SemanticField, &str)] = &[(SemanticField::Year, "Year")];
const ORDER_BY_YEAR: &[&str] = &["Year"];

const TRANSACTION_MEASURES: &[(SemanticField, &str)] = &[
    (SemanticField::Count, "Transactions"),
    (SemanticField::Amount, "Amount"),
];
const USER_MEASURES: &[(SemanticField, &str)] = &[
    (SemanticField::RegisteredUsers, "Users"),
    (SemanticField::AppOpens, "AppOpens"),
];
const INSURANCE_MEASURES: &[(SemanticField, &str)] = &[
    (SemanticField::Count, "Insurance_count"),
    (SemanticField::Amount, "Insurance_amount"),
];
const TOP_USER_MEASURES: &[(SemanticField, &str)] = &[(SemanticField::RegisteredUsers, "TopUsers")];
const CATEGORY_MEASURES: &[(SemanticField, &str)] = &[
    (SemanticField::Count, "Txn_count"),
    (SemanticField::Amount, "Txn_amount"),
];

/// One builder function of the query catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKind {
    TransactionsByState,
    TransactionsByYear,
    UsersByState,
    UsersByYear,
    /// Registered users per device brand, across all states or within one
    BrandDistribution { state: Option<String> },
    InsuranceByState,
    InsuranceByYear,
    InsuranceEngagementByState,
    InsuranceEngagementByYear,
    TopUsersByState,
    TopUsersByYear,
    PaymentCategoriesByState,
    PaymentCategoriesOverall,
    PaymentCategoryTrend,
    /// Distinct (year, quarter) pairs, used to populate the filter choices
    AvailablePeriods,
}

impl QueryKind {
    /// Every kind, with an all-states brand distribution
    pub fn all() -> Vec<QueryKind> {
        vec![
            QueryKind::TransactionsByState,
            QueryKind::TransactionsByYear,
            QueryKind::UsersByState,
            QueryKind::UsersByYear,
            QueryKind::BrandDistribution { state: None },
            QueryKind::InsuranceByState,
            QueryKind::InsuranceByYear,
            QueryKind::InsuranceEngagementByState,
            QueryKind::InsuranceEngagementByYear,
            QueryKind::TopUsersByState,
            QueryKind::TopUsersByYear,
            QueryKind::PaymentCategoriesByState,
            QueryKind::PaymentCategoriesOverall,
            QueryKind::PaymentCategoryTrend,
            QueryKind::AvailablePeriods,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::TransactionsByState => "transactions-by-state",
            QueryKind::TransactionsByYear => "transactions-by-year",
            QueryKind::UsersByState => "users-by-state",
            QueryKind::UsersByYear => "users-by-year",
            QueryKind::BrandDistribution { .. } => "brand-distribution",
            QueryKind::InsuranceByState => "insurance-by-state",
            QueryKind::InsuranceByYear => "insurance-by-year",
            QueryKind::InsuranceEngagementByState => "insurance-engagement-by-state",
            QueryKind::InsuranceEngagementByYear => "insurance-engagement-by-year",
            QueryKind::TopUsersByState => "top-users-by-state",
            QueryKind::TopUsersByYear => "top-users-by-year",
            QueryKind::PaymentCategoriesByState => "payment-categories-by-state",
            QueryKind::PaymentCategoriesOverall => "payment-categories-overall",
            QueryKind::PaymentCategoryTrend => "payment-category-trend",
            QueryKind::AvailablePeriods => "available-periods",
        }
    }

    /// The brand distribution's single-state restriction, if any
    pub fn state_filter(&self) -> Option<&str> {
        match self {
            QueryKind::BrandDistribution { state } => state.as_deref(),
            _ => None,
        }
    }

    pub fn shape(&self) -> QueryShape {
        match self {
            QueryKind::TransactionsByState => statewise("map_transaction", TRANSACTION_MEASURES),
            QueryKind::TransactionsByYear => yearly("map_transaction", TRANSACTION_MEASURES),
            QueryKind::UsersByState => statewise("map_user", USER_MEASURES),
            QueryKind::UsersByYear => yearly("map_user", USER_MEASURES),
            QueryKind::BrandDistribution { .. } => QueryShape {
                dataset: "aggregated_user",
                group_by: &[(SemanticField::Brand, "Brand")],
                measures: &[(SemanticField::Count, "Users")],
                scope: FilterScope::PERIOD,
                order_by: &[],
            },
            QueryKind::InsuranceByState => statewise("map_insurance", INSURANCE_MEASURES),
            QueryKind::InsuranceByYear => yearly("map_insurance", INSURANCE_MEASURES),
            QueryKind::InsuranceEngagementByState => statewise("top_insurance", INSURANCE_MEASURES),
            QueryKind::InsuranceEngagementByYear => yearly("top_insurance", INSURANCE_MEASURES),
            QueryKind::TopUsersByState => statewise("top_user", TOP_USER_MEASURES),
            QueryKind::TopUsersByYear => yearly("top_user", TOP_USER_MEASURES),
            QueryKind::PaymentCategoriesByState => QueryShape {
                dataset: "aggregated_transaction",
                group_by: &[(SemanticField::State, "State"), (SemanticField::Category, "Category")],
                measures: CATEGORY_MEASURES,
                scope: FilterScope::STATEWISE,
                order_by: &[],
            },
            QueryKind::PaymentCategoriesOverall => QueryShape {
                dataset: "aggregated_transaction",
                group_by: &[(SemanticField::Category, "Category")],
                measures: CATEGORY_MEASURES,
                scope: FilterScope::PERIOD,
                order_by: &[],
            },
            QueryKind::PaymentCategoryTrend => QueryShape {
                dataset: "aggregated_transaction",
                group_by: &[(SemanticField::Year, "Year"), (SemanticField::Category, "Category")],
                measures: &[(SemanticField::Amount, "Txn_amount")],
                scope: FilterScope::TREND,
                order_by: ORDER_BY_YEAR,
            },
            QueryKind::AvailablePeriods => QueryShape {
                dataset: "aggregated_transaction",
                group_by: &[(SemanticField::Year, "Year"), (SemanticField::Quarter, "Quarter")],
                measures: &[],
                scope: FilterScope::NONE,
                order_by: &["Year", "Quarter"],
            },
        }
    }

    pub fn output_columns(&self) -> Vec<String> {
        self.shape().output_columns()
    }
}

fn statewise(dataset: &'static str, measures: &'static [(SemanticField, &'static str)]) -> QueryShape {
    QueryShape {
        dataset,
        group_by: BY_STATE,
        measures,
        scope: FilterScope::STATEWISE,
        order_by: &[],
    }
}

fn yearly(dataset: &'static str, measures: &'static [(SemanticField, &'static str)]) -> QueryShape {
    QueryShape {
        dataset,
        group_by: BY_YEAR,
        measures,
        scope: FilterScope::YEARLY,
        order_by: ORDER_BY_YEAR,
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::BrandDistribution { state: Some(state) } => {
                write!(f, "{} ({})", self.name(), state)
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Error when parsing a query kind name
#[derive(Debug, Clone)]
pub struct ParseQueryKindError {
    pub input: String,
}

impl fmt::Display for ParseQueryKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = QueryKind::all().iter().map(|k| k.name()).collect();
        write!(f, "Unknown query '{}'. Valid options: {}", self.input, valid.join(", "))
    }
}

impl std::error::Error for ParseQueryKindError {}

impl FromStr for QueryKind {
    type Err = ParseQueryKindError;

    /// Parses a kind name; the brand distribution parses without a state filter
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        QueryKind::all()
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ParseQueryKindError { input: s.to_string() })
    }
}
