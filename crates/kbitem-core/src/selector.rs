//! Best-statement selection on top of [`RankScale`].
//!
//! Two independent policies:
//! - [`best_per_property`] picks the top tier inside each property group.
//! - [`best_overall`] is a flat two-tier filter: preferred if any, else normal.
//!
//! Neither policy ever selects a deprecated statement.

use crate::grouper::{ByPropertyIdGrouper, PropertyIdProvider};
use crate::rank::{Rank, RankProvider, RankScale};
use std::cmp::Ordering;
use std::sync::Arc;

/// The highest-ranked statements of every property, in group order.
///
/// Each group starts at `Normal`: an equal rank joins the selection, a higher
/// rank replaces it, a lower rank is skipped. A group holding only deprecated
/// statements therefore contributes nothing.
pub fn best_per_property<T>(statements: &[Arc<T>]) -> Vec<Arc<T>>
where
    T: PropertyIdProvider + RankProvider,
{
    let grouper = ByPropertyIdGrouper::new(statements.iter().cloned());
    grouper
        .groups()
        .flat_map(|(_, group)| best_in_group(group))
        .collect()
}

fn best_in_group<T: RankProvider>(group: &[Arc<T>]) -> Vec<Arc<T>> {
    let mut best_rank = Rank::Normal;
    let mut selected = Vec::new();
    for statement in group {
        let rank = statement.rank();
        match RankScale::compare(Some(rank), Some(best_rank)) {
            Ordering::Equal => selected.push(Arc::clone(statement)),
            Ordering::Greater => {
                selected.clear();
                selected.push(Arc::clone(statement));
                best_rank = rank;
            }
            Ordering::Less => {}
        }
    }
    selected
}

/// Every preferred statement, or every normal one when none is preferred.
/// Properties are not considered.
pub fn best_overall<T: RankProvider>(statements: &[Arc<T>]) -> Vec<Arc<T>> {
    let preferred = with_rank(statements, Rank::Preferred);
    if preferred.is_empty() {
        with_rank(statements, Rank::Normal)
    } else {
        preferred
    }
}

/// Statements carrying exactly `rank`, in input order.
pub fn with_rank<T: RankProvider>(statements: &[Arc<T>], rank: Rank) -> Vec<Arc<T>> {
    statements
        .iter()
        .filter(|statement| statement.rank() == rank)
        .cloned()
        .collect()
}
