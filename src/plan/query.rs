use super::expr::Predicate;

/// A grouped column and the name it is exposed under
#[derive(Debug, Clone, PartialEq)]
pub struct GroupColumn {
    /// Physical column name
    pub column: String,
    /// Output column name
    pub alias: String,
}

/// SUM(column) AS alias
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub column: String,
    pub alias: String,
}

/// SELECT group.., SUM(measure).. FROM table WHERE filters GROUP BY group.. ORDER BY ..
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQuery {
    pub table: String,
    pub group_by: Vec<GroupColumn>,
    pub measures: Vec<Measure>,
    /// Conjunction of predicates; empty means no WHERE clause
    pub filters: Vec<Predicate>,
    /// Output column names, ascending
    pub order_by: Vec<String>,
}

impl AggregateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            group_by: Vec::new(),
            measures: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn group(mut self, column: impl Into<String>, alias: impl Into<String>) -> Self {
        self.group_by.push(GroupColumn {
            column: column.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn sum(mut self, column: impl Into<String>, alias: impl Into<String>) -> Self {
        self.measures.push(Measure {
            column: column.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn order_by(mut self, alias: impl Into<String>) -> Self {
        self.order_by.push(alias.into());
        self
    }

    /// Output column names: grouped columns first, then measures
    pub fn output_columns(&self) -> Vec<String> {
        self.group_by
            .iter()
            .map(|g| g.alias.clone())
            .chain(self.measures.iter().map(|m| m.alias.clone()))
            .collect()
    }
}
