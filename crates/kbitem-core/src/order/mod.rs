//! Ordered statement sequences that stay grouped by property id.
//!
//! Two representations are provided:
//! - [`RebuildingPropertyOrder`] keeps one flat vector and re-derives its
//!   grouping from scratch after every mutation.
//! - [`IncrementalPropertyOrder`] keeps the group order and the per-property
//!   lists separately and only touches the lists a mutation affects.
//!
//! Both implement [`PropertyOrder`], so callers can pick whichever trade-off
//! fits their mutation pattern.

mod incremental;
mod rebuilding;

pub use incremental::IncrementalPropertyOrder;
pub use rebuilding::RebuildingPropertyOrder;

use crate::error::Result;
use crate::grouper::PropertyIdProvider;
use crate::model::PropertyId;
use std::sync::Arc;

/// A sequence whose elements sharing a property id always form one contiguous run.
///
/// `index` arguments are interpreted by the implementation: a flat position
/// for [`RebuildingPropertyOrder`], a position inside the element's own group
/// for [`IncrementalPropertyOrder`]. `None` means "at the end".
pub trait PropertyOrder<T: PropertyIdProvider> {
    /// Elements in group order.
    fn flat_view(&self) -> Vec<Arc<T>>;

    /// Property ids in group order.
    fn property_ids(&self) -> &[PropertyId];

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_element(&mut self, element: Arc<T>, index: Option<usize>) -> Result<()>;

    fn move_element_to(&mut self, element: &Arc<T>, index: Option<usize>) -> Result<()>;

    fn remove_element(&mut self, element: &Arc<T>) -> Result<Arc<T>>;
}

/// True when every property id in `elements` occupies a single contiguous run.
pub fn is_group_contiguous<T: PropertyIdProvider>(elements: &[Arc<T>]) -> bool {
    let mut closed: Vec<&PropertyId> = Vec::new();
    let mut current: Option<&PropertyId> = None;
    for element in elements {
        let property_id = element.property_id();
        if current == Some(property_id) {
            continue;
        }
        if closed.contains(&property_id) {
            return false;
        }
        if let Some(previous) = current {
            closed.push(previous);
        }
        current = Some(property_id);
    }
    true
}
