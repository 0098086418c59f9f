//! Transaction history search

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
    Investment,
    Pension,
    Dividend,
}

/// One entry in the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub company: String,
    /// Signed amount; debits are negative
    pub amount: f64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    pub account: String,
}

impl Transaction {
    fn matches_query(&self, needle: &str) -> bool {
        [
            self.description.as_str(),
            self.company.as_str(),
            self.category.as_str(),
            self.account.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
            || self.amount.to_string().contains(needle)
    }
}

/// Narrowing applied to a transaction list
///
/// Filters run in order: kind, account, free-text query, then the result
/// limit. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub account: Option<String>,
    pub query: String,
    pub max_results: Option<usize>,
}

impl TransactionFilter {
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let needle = self.query.trim().to_lowercase();

        let matched = transactions
            .iter()
            .filter(|t| self.kind.map_or(true, |kind| t.kind == kind))
            .filter(|t| self.account.as_deref().map_or(true, |a| t.account == a))
            .filter(|t| needle.is_empty() || t.matches_query(&needle));

        match self.max_results {
            Some(limit) => matched.take(limit).collect(),
            None => matched.collect(),
        }
    }
}

/// Distinct account names, in first-seen order
pub fn accounts(transactions: &[Transaction]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for t in transactions {
        if !seen.contains(&t.account.as_str()) {
            seen.push(&t.account);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, description: &str, amount: f64, kind: TransactionKind, account: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            description: description.to_string(),
            company: "Vanguard".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            kind,
            category: "Investing".to_string(),
            account: account.to_string(),
        }
    }

    fn history() -> Vec<Transaction> {
        vec![
            tx("1", "Monthly ISA deposit", 500.0, TransactionKind::Investment, "Stocks & Shares ISA"),
            tx("2", "Employer pension contribution", 250.0, TransactionKind::Pension, "SIPP"),
            tx("3", "VWRL dividend", 42.17, TransactionKind::Dividend, "Stocks & Shares ISA"),
            tx("4", "Platform fee", -12.5, TransactionKind::Debit, "SIPP"),
            tx("5", "Salary", 3200.0, TransactionKind::Credit, "Current Account"),
        ]
    }

    fn ids(result: &[&Transaction]) -> Vec<String> {
        result.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all() {
        let h = history();
        assert_eq!(TransactionFilter::default().apply(&h).len(), 5);
    }

    #[test]
    fn test_filter_by_kind_and_account() {
        let h = history();
        let filter = TransactionFilter {
            account: Some("SIPP".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&h)), vec!["2", "4"]);

        let filter = TransactionFilter {
            kind: Some(TransactionKind::Dividend),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&h)), vec!["3"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let h = history();
        let filter = TransactionFilter {
            query: "  isa ".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&h)), vec!["1", "3"]);
    }

    #[test]
    fn test_query_matches_amount() {
        let h = history();
        let filter = TransactionFilter {
            query: "42.17".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&h)), vec!["3"]);
    }

    #[test]
    fn test_limit_applies_after_filters() {
        let h = history();
        let filter = TransactionFilter {
            query: "vanguard".to_string(),
            max_results: Some(2),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&h)), vec!["1", "2"]);
    }

    #[test]
    fn test_accounts_first_seen_order() {
        let h = history();
        assert_eq!(accounts(&h), vec!["Stocks & Shares ISA", "SIPP", "Current Account"]);
    }
}
