use crate::catalog::SemanticField;
use crate::plan::{AggregateQuery, Predicate};
use crate::query::{QueryKind, QueryParams};
use crate::resolver::ResolvedColumns;

/// Outcome of planning one query
#[derive(Debug, Clone, PartialEq)]
pub enum Planned {
    Ready(AggregateQuery),
    /// At least one field has no column; the query must not be issued
    Unresolved {
        table: String,
        /// Output columns of the empty result
        columns: Vec<String>,
        missing: Vec<SemanticField>,
    },
}

/// Every semantic field `kind` touches: grouping, then filters, then measures
pub fn required_fields(kind: &QueryKind, params: &QueryParams) -> Vec<SemanticField> {
    let shape = kind.shape();
    let mut fields: Vec<SemanticField> = shape.group_by.iter().map(|(f, _)| *f).collect();

    let mut push = |field: SemanticField| {
        if !fields.contains(&field) {
            fields.push(field);
        }
    };
    if params.years.is_some() {
        push(SemanticField::Year);
    }
    if params.quarters.is_some() {
        push(SemanticField::Quarter);
    }
    if params.states.is_some() || kind.state_filter().is_some() {
        push(SemanticField::State);
    }
    for (field, _) in shape.measures {
        push(*field);
    }
    fields
}

/// Build the aggregation for `kind`
///
/// `resolved` must cover `required_fields(kind, params)`; anything missing
/// turns the whole query into `Planned::Unresolved`.
pub fn plan_query(kind: &QueryKind, params: &QueryParams, resolved: &ResolvedColumns) -> Planned {
    let shape = kind.shape();
    let required = required_fields(kind, params);

    let missing: Vec<SemanticField> = required
        .iter()
        .copied()
        .filter(|f| resolved.get(*f).is_none())
        .collect();
    if !missing.is_empty() {
        return Planned::Unresolved {
            table: resolved.table.clone(),
            columns: shape.output_columns(),
            missing,
        };
    }

    // Every lookup below is covered by `required`, so the fallbacks never fire.
    let column = |field: SemanticField| resolved.get(field).unwrap_or_default().to_string();

    let mut query = AggregateQuery::new(resolved.table.clone());
    for (field, alias) in shape.group_by {
        query = query.group(column(*field), *alias);
    }
    for (field, alias) in shape.measures {
        query = query.sum(column(*field), *alias);
    }

    if let Some(years) = &params.years {
        query = query.filter(Predicate::is_in(column(SemanticField::Year), years.iter().copied()));
    }
    if let Some(quarters) = &params.quarters {
        query = query.filter(Predicate::is_in(column(SemanticField::Quarter), quarters.iter().copied()));
    }
    if let Some(states) = &params.states {
        query = query.filter(Predicate::is_in(column(SemanticField::State), states.iter().cloned()));
    }
    if let Some(state) = kind.state_filter() {
        query = query.filter(Predicate::eq(column(SemanticField::State), state));
    }

    for alias in shape.order_by {
        query = query.order_by(*alias);
    }

    Planned::Ready(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::plan::Literal;
    use crate::query::FilterSelection;
    use crate::resolver::TableColumns;

    fn selection() -> FilterSelection {
        FilterSelection::new([2022], [1, 2, 3, 4], ["Karnataka", "Kerala"]).unwrap()
    }

    /// Resolve a dataset against a literal column list without a store
    fn resolve(dataset: &str, columns: &[&str], fields: &[SemanticField]) -> ResolvedColumns {
        let catalog = Catalog::builtin().unwrap();
        let dataset = catalog.get_dataset(dataset).unwrap();
        let live = TableColumns::new(columns.iter().map(|c| c.to_string()).collect());
        ResolvedColumns::from_parts(dataset, &live, fields)
    }

    const AGGRE_TRANSACTION: &[&str] = &[
        "State",
        "Year",
        "Quater",
        "Transaction_type",
        "Transaction_count",
        "Transaction_amount",
    ];

    #[test]
    fn test_statewise_category_query() {
        let kind = QueryKind::PaymentCategoriesByState;
        let params = QueryParams::for_kind(&kind, &selection());
        let resolved = resolve("aggregated_transaction", AGGRE_TRANSACTION, &required_fields(&kind, &params));

        let Planned::Ready(query) = plan_query(&kind, &params, &resolved) else {
            panic!("expected a ready query");
        };
        assert_eq!(query.table, "Aggre_transaction");
        assert_eq!(query.output_columns(), ["State", "Category", "Txn_count", "Txn_amount"]);
        assert_eq!(query.group_by[1].column, "Transaction_type");
        assert_eq!(query.measures[0].column, "Transaction_count");
        assert_eq!(
            query.filters,
            vec![
                Predicate::is_in("Year", [2022_i64]),
                Predicate::is_in("Quater", [1_i64, 2, 3, 4]),
                Predicate::is_in("State", ["Karnataka", "Kerala"]),
            ]
        );
        assert!(query.order_by.is_empty());
    }

    #[test]
    fn test_yearly_query_filters_only_quarters() {
        let kind = QueryKind::TransactionsByYear;
        let params = QueryParams::for_kind(&kind, &selection());
        let resolved = resolve(
            "map_transaction",
            &["State", "Year", "Quarter", "Transaction_count", "Transaction_amount"],
            &required_fields(&kind, &params),
        );

        let Planned::Ready(query) = plan_query(&kind, &params, &resolved) else {
            panic!("expected a ready query");
        };
        assert_eq!(query.filters, vec![Predicate::is_in("Quarter", [1_i64, 2, 3, 4])]);
        assert_eq!(query.order_by, vec!["Year"]);
    }

    #[test]
    fn test_trend_skips_the_year_filter() {
        let kind = QueryKind::PaymentCategoryTrend;
        let params = QueryParams::for_kind(&kind, &selection());
        assert_eq!(
            required_fields(&kind, &params),
            vec![
                SemanticField::Year,
                SemanticField::Category,
                SemanticField::Quarter,
                SemanticField::State,
                SemanticField::Amount,
            ]
        );
        let resolved = resolve("aggregated_transaction", AGGRE_TRANSACTION, &required_fields(&kind, &params));
        let Planned::Ready(query) = plan_query(&kind, &params, &resolved) else {
            panic!("expected a ready query");
        };
        let filtered: Vec<&str> = query.filters.iter().map(|p| p.column()).collect();
        assert_eq!(filtered, ["Quater", "State"]);
    }

    #[test]
    fn test_brand_distribution_state_filter() {
        let kind = QueryKind::BrandDistribution { state: Some("Kerala".into()) };
        let params = QueryParams::for_kind(&kind, &selection());
        let resolved = resolve(
            "aggregated_user",
            &["State", "Year", "Quater", "Brand", "Count"],
            &required_fields(&kind, &params),
        );

        let Planned::Ready(query) = plan_query(&kind, &params, &resolved) else {
            panic!("expected a ready query");
        };
        assert_eq!(
            query.filters.last(),
            Some(&Predicate::Eq {
                column: "State".into(),
                value: Literal::String("Kerala".into()),
            })
        );

        let all_states = QueryKind::BrandDistribution { state: None };
        let Planned::Ready(query) = plan_query(&all_states, &params, &resolved) else {
            panic!("expected a ready query");
        };
        assert!(query.filters.iter().all(|p| p.column() != "State"));
    }

    #[test]
    fn test_missing_measure_is_unresolved() {
        let kind = QueryKind::InsuranceByState;
        let params = QueryParams::for_kind(&kind, &selection());
        let resolved = resolve(
            "map_insurance",
            &["State", "Year", "Quarter", "insurance_count"],
            &required_fields(&kind, &params),
        );

        assert_eq!(
            plan_query(&kind, &params, &resolved),
            Planned::Unresolved {
                table: "Map_insurance".into(),
                columns: vec!["State".into(), "Insurance_count".into(), "Insurance_amount".into()],
                missing: vec![SemanticField::Amount],
            }
        );
    }

    #[test]
    fn test_missing_filter_column_is_unresolved() {
        // "quarter" is not a spelling aggregated_transaction accepts
        let kind = QueryKind::PaymentCategoriesOverall;
        let params = QueryParams::for_kind(&kind, &selection());
        let resolved = resolve(
            "aggregated_transaction",
            &["State", "Year", "quarter", "Transaction_type", "Transaction_count", "Transaction_amount"],
            &required_fields(&kind, &params),
        );
        let Planned::Unresolved { missing, columns, .. } = plan_query(&kind, &params, &resolved) else {
            panic!("expected an unresolved query");
        };
        assert_eq!(missing, vec![SemanticField::Quarter]);
        assert_eq!(columns, ["Category", "Txn_count", "Txn_amount"]);
    }

    #[test]
    fn test_available_periods_is_unfiltered_and_ordered() {
        let kind = QueryKind::AvailablePeriods;
        let params = QueryParams::unfiltered();
        let resolved = resolve("aggregated_transaction", AGGRE_TRANSACTION, &required_fields(&kind, &params));
        let Planned::Ready(query) = plan_query(&kind, &params, &resolved) else {
            panic!("expected a ready query");
        };
        assert!(query.filters.is_empty());
        assert!(query.measures.is_empty());
        assert_eq!(query.order_by, vec!["Year", "Quarter"]);
    }
}
