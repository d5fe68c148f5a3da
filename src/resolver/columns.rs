use std::collections::HashMap;

/// The live column set of one table plus its case-insensitive index
#[derive(Debug, Clone, Default)]
pub struct TableColumns {
    columns: Vec<String>,
    by_lower: HashMap<String, String>,
}

impl TableColumns {
    /// Index `columns`; when two names differ only by case the later one wins
    pub fn new(columns: Vec<String>) -> Self {
        let by_lower = columns
            .iter()
            .map(|c| (c.to_lowercase(), c.clone()))
            .collect();
        Self { columns, by_lower }
    }

    /// Column names as stored
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First candidate present in the table, returned in the table's own spelling
    pub fn resolve<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&str> {
        candidates
            .iter()
            .find_map(|c| self.by_lower.get(&c.as_ref().to_lowercase()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> TableColumns {
        TableColumns::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_returns_stored_spelling() {
        let table = columns(&["State", "Year", "Quater", "Transaction_count"]);
        assert_eq!(table.resolve(&["quater", "Quater"]), Some("Quater"));
        assert_eq!(table.resolve(&["TRANSACTION_COUNT"]), Some("Transaction_count"));
        assert_eq!(table.resolve(&["transaction_count"]), Some("Transaction_count"));
    }

    #[test]
    fn test_first_candidate_wins() {
        let table = columns(&["registered_users", "registeredUsers"]);
        assert_eq!(
            table.resolve(&["registeredUsers", "registered_users"]),
            Some("registeredUsers")
        );
        assert_eq!(
            table.resolve(&["registered_users", "registeredUsers"]),
            Some("registered_users")
        );
    }

    #[test]
    fn test_no_match_is_absent() {
        let table = columns(&["State", "Year"]);
        assert_eq!(table.resolve(&["quarter", "Quarter"]), None);
        assert_eq!(table.resolve::<&str>(&[]), None);
        assert_eq!(TableColumns::default().resolve(&["State"]), None);
    }

    #[test]
    fn test_case_collision_keeps_last() {
        let table = columns(&["amount", "Amount"]);
        assert_eq!(table.resolve(&["AMOUNT"]), Some("Amount"));
        assert_eq!(table.columns().len(), 2);
    }
}
