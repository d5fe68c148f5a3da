//! Result tables (noun module)
//!
//! The flat, named-column shape every query returns and every chart consumes.

mod error;
mod value;

pub use error::TableError;
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io::Write;

/// Ordered column names plus rows of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultTable {
    /// An empty table with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        for row in rows {
            self.push_row(row)?;
        }
        Ok(self)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, TableError> {
        let idx = self.require(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Sum `value` per distinct `key`; output is `[key, value]` ordered by key
    pub fn sum_by(&self, key: &str, value: &str) -> Result<ResultTable, TableError> {
        let key_idx = self.require(key)?;
        let value_idx = self.require(value)?;

        // group on the cell, not its rendering
        let mut groups: Vec<(Value, Value)> = Vec::new();
        for row in &self.rows {
            let group_key = &row[key_idx];
            match groups.iter_mut().find(|(k, _)| k == group_key) {
                Some(group) => group.1 = group.1.add(&row[value_idx]),
                None => groups.push((group_key.clone(), Value::Null.add(&row[value_idx]))),
            }
        }
        groups.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut out = ResultTable::new([key, value]);
        out.rows = groups.into_iter().map(|(k, v)| vec![k, v]).collect();
        Ok(out)
    }

    /// Rows ordered by `column`, largest first; ties keep their order
    pub fn sorted_desc(&self, column: &str) -> Result<ResultTable, TableError> {
        let idx = self.require(column)?;
        let mut out = self.clone();
        out.rows.sort_by(|a, b| b[idx].total_cmp(&a[idx]));
        Ok(out)
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> ResultTable {
        ResultTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rows whose `column` equals one of `values`
    pub fn filter_in(&self, column: &str, values: &[Value]) -> Result<ResultTable, TableError> {
        let idx = self.require(column)?;
        Ok(ResultTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| values.contains(&r[idx]))
                .cloned()
                .collect(),
        })
    }

    /// Append a column computed from an existing one
    pub fn with_derived_column<F>(&self, name: &str, source: &str, f: F) -> Result<ResultTable, TableError>
    where
        F: Fn(&Value) -> Value,
    {
        let idx = self.require(source)?;
        let mut out = self.clone();
        out.columns.push(name.to_string());
        for row in &mut out.rows {
            let derived = f(&row[idx]);
            row.push(derived);
        }
        Ok(out)
    }

    /// Standard CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.columns)?;
        for row in &self.rows {
            csv.write_record(row.iter().map(|v| v.to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String, TableError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| TableError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> ResultTable {
        ResultTable::new(["State", "Category", "Txn_count", "Txn_amount"])
            .with_rows(vec![
                vec!["Kerala".into(), "Peer-to-peer".into(), 10.into(), 100.5.into()],
                vec!["Karnataka".into(), "Peer-to-peer".into(), 30.into(), 300.0.into()],
                vec!["Kerala".into(), "Recharge".into(), 5.into(), 20.0.into()],
                vec!["Goa".into(), "Recharge".into(), 1.into(), Value::Null],
            ])
            .unwrap()
    }

    #[test]
    fn test_row_width_checked() {
        let err = ResultTable::new(["a", "b"]).with_rows(vec![vec![1.into()]]).unwrap_err();
        assert!(matches!(err, TableError::RowWidth { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_sum_by_groups_sorted_by_key() {
        let totals = categories().sum_by("State", "Txn_amount").unwrap();
        assert_eq!(totals.columns(), ["State", "Txn_amount"]);
        assert_eq!(
            totals.rows(),
            [
                vec![Value::from("Goa"), Value::Null],
                vec![Value::from("Karnataka"), Value::Float(300.0)],
                vec![Value::from("Kerala"), Value::Float(120.5)],
            ]
        );

        let counts = categories().sum_by("Category", "Txn_count").unwrap();
        assert_eq!(counts.value(0, "Txn_count"), Some(&Value::Int(40)));
        assert_eq!(counts.value(1, "Txn_count"), Some(&Value::Int(6)));
    }

    #[test]
    fn test_sum_by_keeps_distinct_cells_apart() {
        let table = ResultTable::new(["State", "Users"])
            .with_rows(vec![
                vec![Value::Null, 1.into()],
                vec!["".into(), 2.into()],
                vec![Value::Int(1), 3.into()],
                vec!["1".into(), 4.into()],
                vec![Value::Null, 10.into()],
            ])
            .unwrap();
        let totals = table.sum_by("State", "Users").unwrap();
        assert_eq!(
            totals.rows(),
            [
                vec![Value::Null, Value::Int(11)],
                vec![Value::Int(1), Value::Int(3)],
                vec![Value::from(""), Value::Int(2)],
                vec![Value::from("1"), Value::Int(4)],
            ]
        );
    }

    #[test]
    fn test_sorted_desc_and_head() {
        let top = categories().sorted_desc("Txn_count").unwrap().head(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top.value(0, "State"), Some(&Value::from("Karnataka")));
        assert_eq!(top.value(1, "State"), Some(&Value::from("Kerala")));
    }

    #[test]
    fn test_sorted_desc_is_stable_for_ties() {
        let table = ResultTable::new(["k", "v"])
            .with_rows(vec![
                vec!["a".into(), 1.into()],
                vec!["b".into(), 2.into()],
                vec!["c".into(), 1.into()],
            ])
            .unwrap();
        let sorted = table.sorted_desc("v").unwrap();
        let keys: Vec<String> = sorted.column("k").unwrap().iter().map(|v| v.to_string()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_filter_in() {
        let kerala = categories().filter_in("State", &["Kerala".into()]).unwrap();
        assert_eq!(kerala.len(), 2);
        assert!(categories().filter_in("District", &[]).is_err());
    }

    #[test]
    fn test_derived_column() {
        let table = categories()
            .with_derived_column("Label", "State", |v| Value::Text(format!("{}!", v)))
            .unwrap();
        assert_eq!(table.columns().last().unwrap(), "Label");
        assert_eq!(table.value(0, "Label"), Some(&Value::from("Kerala!")));
    }

    #[test]
    fn test_csv_export() {
        let csv = categories().head(2).to_csv().unwrap();
        assert_eq!(
            csv,
            "State,Category,Txn_count,Txn_amount\nKerala,Peer-to-peer,10,100.5\nKarnataka,Peer-to-peer,30,300\n"
        );
    }

    #[test]
    fn test_csv_quotes_when_needed() {
        let table = ResultTable::new(["State"])
            .with_rows(vec![vec!["Dadra, Nagar \"Haveli\"".into()]])
            .unwrap();
        assert_eq!(table.to_csv().unwrap(), "State\n\"Dadra, Nagar \"\"Haveli\"\"\"\n");
    }

    #[test]
    fn test_empty_table_keeps_columns() {
        let table = ResultTable::new(["Brand", "Users"]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv().unwrap(), "Brand,Users\n");
    }
}
