//! Statement ranks and the total order over them.

use crate::error::{DataModelError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Ordinal of the legacy truth rank carried by unranked claims.
/// It is never accepted as a statement rank.
pub const TRUTH_ORDINAL: i64 = 3;

/// Preference tier of a statement. Variants are declared lowest first, so the
/// derived `Ord` is the rank order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Deprecated = 0,
    #[default]
    Normal = 1,
    Preferred = 2,
}

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::Deprecated, Rank::Normal, Rank::Preferred];

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// Map a numeric ordinal back to a rank.
    pub fn from_ordinal(ordinal: i64) -> Result<Self> {
        match ordinal {
            0 => Ok(Rank::Deprecated),
            1 => Ok(Rank::Normal),
            2 => Ok(Rank::Preferred),
            TRUTH_ORDINAL => Err(DataModelError::InvalidArgument(
                "the truth rank only exists on unranked claims".to_string(),
            )),
            other => Err(DataModelError::InvalidArgument(format!(
                "unknown rank ordinal {other}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Deprecated => "deprecated",
            Rank::Normal => "normal",
            Rank::Preferred => "preferred",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that carries a rank.
pub trait RankProvider {
    fn rank(&self) -> Rank;
}

impl<T: RankProvider + ?Sized> RankProvider for Arc<T> {
    fn rank(&self) -> Rank {
        (**self).rank()
    }
}

impl<T: RankProvider + ?Sized> RankProvider for &T {
    fn rank(&self) -> Rank {
        (**self).rank()
    }
}

/// Stateless comparison policy over optional ranks.
///
/// An absent rank compares lower than every valid rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankScale;

impl RankScale {
    /// True only for the ordinals of `Deprecated`, `Normal` and `Preferred`.
    pub fn is_valid(ordinal: i64) -> bool {
        matches!(ordinal, 0..=2)
    }

    pub fn compare(a: Option<Rank>, b: Option<Rank>) -> Ordering {
        // `None` orders below every `Some`.
        a.cmp(&b)
    }

    /// Compare raw ordinals. A present ordinal that is not a valid rank is rejected.
    pub fn compare_ordinals(a: Option<i64>, b: Option<i64>) -> Result<Ordering> {
        let a = a.map(Rank::from_ordinal).transpose()?;
        let b = b.map(Rank::from_ordinal).transpose()?;
        Ok(Self::compare(a, b))
    }

    pub fn is_equal(a: Option<Rank>, b: Option<Rank>) -> bool {
        Self::compare(a, b) == Ordering::Equal
    }

    pub fn is_lower(a: Option<Rank>, b: Option<Rank>) -> bool {
        Self::compare(a, b) == Ordering::Less
    }

    pub fn is_higher(a: Option<Rank>, b: Option<Rank>) -> bool {
        Self::compare(a, b) == Ordering::Greater
    }

    /// Highest rank in `ranks`, or `None` when there is no present rank.
    ///
    /// Scanning stops at the first `Preferred`, which cannot be beaten.
    pub fn find_best_rank<I>(ranks: I) -> Option<Rank>
    where
        I: IntoIterator<Item = Option<Rank>>,
    {
        let mut best = None;
        for rank in ranks {
            if Self::is_higher(rank, best) {
                best = rank;
                if best == Some(Rank::Preferred) {
                    break;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_is_valid() {
        assert!(RankScale::is_valid(0));
        assert!(RankScale::is_valid(1));
        assert!(RankScale::is_valid(2));
        assert!(!RankScale::is_valid(TRUTH_ORDINAL));
        assert!(!RankScale::is_valid(-1));
    }

    #[test]
    fn test_absent_is_lowest() {
        for rank in Rank::ALL {
            assert_eq!(RankScale::compare(None, Some(rank)), Ordering::Less);
            assert_eq!(RankScale::compare(Some(rank), None), Ordering::Greater);
        }
        assert!(RankScale::is_equal(None, None));
    }

    #[test]
    fn test_ordinal_order() {
        assert!(RankScale::is_lower(Some(Rank::Deprecated), Some(Rank::Normal)));
        assert!(RankScale::is_higher(Some(Rank::Preferred), Some(Rank::Normal)));
        assert!(RankScale::is_equal(Some(Rank::Normal), Some(Rank::Normal)));
    }

    #[test]
    fn test_compare_ordinals_rejects_invalid() {
        assert_eq!(
            RankScale::compare_ordinals(Some(2), Some(0)),
            Ok(Ordering::Greater)
        );
        assert_eq!(RankScale::compare_ordinals(None, Some(0)), Ok(Ordering::Less));
        assert!(matches!(
            RankScale::compare_ordinals(Some(7), Some(0)),
            Err(DataModelError::InvalidArgument(_))
        ));
        assert!(matches!(
            RankScale::compare_ordinals(Some(1), Some(TRUTH_ORDINAL)),
            Err(DataModelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_find_best_rank() {
        assert_eq!(RankScale::find_best_rank(Vec::<Option<Rank>>::new()), None);
        assert_eq!(
            RankScale::find_best_rank([
                Some(Rank::Deprecated),
                Some(Rank::Normal),
                Some(Rank::Preferred),
                Some(Rank::Deprecated),
            ]),
            Some(Rank::Preferred)
        );
        assert_eq!(
            RankScale::find_best_rank([Some(Rank::Deprecated)]),
            Some(Rank::Deprecated)
        );
        assert_eq!(RankScale::find_best_rank([None, None]), None);
    }

    #[test]
    fn test_find_best_rank_stops_at_preferred() {
        let seen = Cell::new(0);
        let ranks = [
            Some(Rank::Normal),
            Some(Rank::Preferred),
            Some(Rank::Deprecated),
            Some(Rank::Normal),
        ];
        let best = RankScale::find_best_rank(ranks.iter().copied().inspect(|_| {
            seen.set(seen.get() + 1);
        }));
        assert_eq!(best, Some(Rank::Preferred));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_from_ordinal() {
        assert_eq!(Rank::from_ordinal(0), Ok(Rank::Deprecated));
        assert_eq!(Rank::from_ordinal(2), Ok(Rank::Preferred));
        assert!(Rank::from_ordinal(TRUTH_ORDINAL).is_err());
        assert_eq!(Rank::Preferred.ordinal(), 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Rank::Preferred).unwrap();
        assert_eq!(json, "\"preferred\"");
        let rank: Rank = serde_json::from_str("\"deprecated\"").unwrap();
        assert_eq!(rank, Rank::Deprecated);
    }
}
