//! Ordered list of statements with grouping and selection helpers.

use crate::grouper::{ByPropertyIdGrouper, PropertyIdProvider};
use crate::model::{PropertyId, Snak, Statement};
use crate::order::RebuildingPropertyOrder;
use crate::rank::Rank;
use crate::selector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Statements in caller order. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementList {
    statements: Vec<Arc<Statement>>,
}

impl StatementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) -> Arc<Statement> {
        let statement = Arc::new(statement);
        self.statements.push(Arc::clone(&statement));
        statement
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Statement>> {
        self.statements.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Statement>] {
        &self.statements
    }

    /// Property ids in first-seen order.
    pub fn property_ids(&self) -> Vec<PropertyId> {
        let mut seen: Vec<PropertyId> = Vec::new();
        for statement in &self.statements {
            let property_id = statement.property_id();
            if !seen.contains(property_id) {
                seen.push(property_id.clone());
            }
        }
        seen
    }

    pub fn by_property_id(&self, property_id: &PropertyId) -> StatementList {
        self.statements
            .iter()
            .filter(|s| s.property_id() == property_id)
            .cloned()
            .collect()
    }

    pub fn with_rank(&self, rank: Rank) -> StatementList {
        selector::with_rank(&self.statements, rank).into()
    }

    /// Preferred statements if any exist, otherwise the normal ones.
    pub fn best_statements(&self) -> StatementList {
        selector::best_overall(&self.statements).into()
    }

    pub fn best_per_property(&self) -> StatementList {
        selector::best_per_property(&self.statements).into()
    }

    pub fn grouper(&self) -> ByPropertyIdGrouper<Statement> {
        ByPropertyIdGrouper::new(self.statements.iter().cloned())
    }

    /// A group-contiguous order over the same statements.
    pub fn grouped(&self) -> RebuildingPropertyOrder<Statement> {
        RebuildingPropertyOrder::new(self.statements.iter().cloned())
    }

    pub fn main_snaks(&self) -> Vec<&Snak> {
        self.statements.iter().map(|s| &s.mainsnak).collect()
    }
}

impl From<Vec<Arc<Statement>>> for StatementList {
    fn from(statements: Vec<Arc<Statement>>) -> Self {
        Self { statements }
    }
}

impl From<Vec<Statement>> for StatementList {
    fn from(statements: Vec<Statement>) -> Self {
        statements.into_iter().map(Arc::new).collect()
    }
}

impl FromIterator<Arc<Statement>> for StatementList {
    fn from_iter<I: IntoIterator<Item = Arc<Statement>>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StatementList {
    type Item = &'a Arc<Statement>;
    type IntoIter = std::slice::Iter<'a, Arc<Statement>>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PropertyId {
        PropertyId::new(s).unwrap()
    }

    fn statement(property: &str, id: &str, rank: Rank) -> Statement {
        Statement::new(Snak::no_value(pid(property)))
            .with_id(id)
            .with_rank(rank)
    }

    fn labels(list: &StatementList) -> Vec<String> {
        list.iter().map(|s| s.label()).collect()
    }

    fn sample() -> StatementList {
        StatementList::from(vec![
            statement("P2", "a", Rank::Normal),
            statement("P1", "b", Rank::Deprecated),
            statement("P2", "c", Rank::Preferred),
            statement("P1", "d", Rank::Normal),
        ])
    }

    #[test]
    fn test_property_ids_first_seen() {
        assert_eq!(sample().property_ids(), vec![pid("P2"), pid("P1")]);
    }

    #[test]
    fn test_by_property_id_and_rank() {
        let list = sample();
        assert_eq!(labels(&list.by_property_id(&pid("P1"))), vec!["b", "d"]);
        assert_eq!(labels(&list.with_rank(Rank::Normal)), vec!["a", "d"]);
    }

    #[test]
    fn test_best_statements() {
        let list = sample();
        assert_eq!(labels(&list.best_statements()), vec!["c"]);
        assert_eq!(labels(&list.best_per_property()), vec!["c", "d"]);
    }

    #[test]
    fn test_grouped_shares_statements() {
        let list = sample();
        let order = list.grouped();
        let flat = order.flat_view();
        assert!(Arc::ptr_eq(&flat[0], &list.as_slice()[0]));
        let grouped: Vec<String> = flat.iter().map(|s| s.label()).collect();
        assert_eq!(grouped, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_json_is_plain_array() {
        let mut list = StatementList::new();
        list.push(statement("P1", "x", Rank::Preferred));
        let value = serde_json::to_value(&list).unwrap();
        assert!(value.is_array());
        let parsed: StatementList = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, list);
    }
}
