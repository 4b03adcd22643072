use super::PropertyOrder;
use crate::error::{DataModelError, Result};
use crate::grouper::{ByPropertyIdGrouper, PropertyIdProvider};
use crate::model::PropertyId;
use std::sync::Arc;

/// Flat, group-contiguous sequence that regroups itself after every mutation.
///
/// Construction normalizes the input: elements of a property that were
/// interleaved with other properties end up next to each other, and groups
/// appear in the order their property was first seen.
#[derive(Debug)]
pub struct RebuildingPropertyOrder<T> {
    elements: Vec<Arc<T>>,
    grouper: ByPropertyIdGrouper<T>,
}

/// Position of one property's run inside the flat sequence.
struct GroupSpan<'a> {
    property_id: &'a PropertyId,
    start: usize,
    len: usize,
}

impl<T: PropertyIdProvider> RebuildingPropertyOrder<T> {
    pub fn new<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        let mut order = Self {
            elements: elements.into_iter().collect(),
            grouper: ByPropertyIdGrouper::new(Vec::new()),
        };
        order.rebuild_index();
        order
    }

    /// Current normalized order.
    pub fn flat_view(&self) -> Vec<Arc<T>> {
        self.elements.clone()
    }

    pub fn as_slice(&self) -> &[Arc<T>] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&Arc<T>> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn property_ids(&self) -> &[PropertyId] {
        self.grouper.property_ids()
    }

    pub fn grouper(&self) -> &ByPropertyIdGrouper<T> {
        &self.grouper
    }

    /// Position of `element`, compared by identity rather than value.
    pub fn index_of(&self, element: &Arc<T>) -> Result<usize> {
        self.elements
            .iter()
            .position(|e| Arc::ptr_eq(e, element))
            .ok_or_else(|| {
                DataModelError::NotFound(format!(
                    "element with property {} is not in this order",
                    element.property_id()
                ))
            })
    }

    /// Insert `element` at `index`, relocating its whole group first when the
    /// index lies outside that group's run.
    pub fn insert_at_index(&mut self, element: Arc<T>, index: usize) -> Result<()> {
        let len = self.elements.len();
        if index > len {
            return Err(DataModelError::OutOfRange { index, len });
        }

        let spans = self.group_spans();
        let (group_start, group_len) = spans
            .iter()
            .find(|span| span.property_id == element.property_id())
            .map_or((0, 0), |span| (span.start, span.len));
        let boundary = spans
            .iter()
            .map(|span| span.start)
            .find(|&start| start >= index)
            .unwrap_or(len);

        // An unseen property has the empty run at 0, so inserting it at the front is in place.
        let insert_at = if (group_start..=group_start + group_len).contains(&index) {
            index
        } else {
            tracing::debug!(
                property = %element.property_id(),
                from = group_start,
                to = boundary,
                "relocating group before insert"
            );
            let block: Vec<Arc<T>> = self
                .elements
                .drain(group_start..group_start + group_len)
                .collect();
            // Draining shifts everything after the block left by its length.
            let destination = if group_start < boundary {
                boundary - group_len
            } else {
                boundary
            };
            self.elements.splice(destination..destination, block);
            boundary
        };

        self.elements.insert(insert_at, element);
        self.rebuild_index();
        Ok(())
    }

    pub fn remove_at_index(&mut self, index: usize) -> Result<Arc<T>> {
        let len = self.elements.len();
        if index >= len {
            return Err(DataModelError::OutOfRange { index, len });
        }
        let removed = self.elements.remove(index);
        self.rebuild_index();
        Ok(removed)
    }

    pub fn remove_element(&mut self, element: &Arc<T>) -> Result<Arc<T>> {
        let index = self.index_of(element)?;
        self.remove_at_index(index)
    }

    /// Remove the element at `old_index` and insert it at `new_index`, which is
    /// a position in the sequence after the removal.
    pub fn move_to_index(&mut self, old_index: usize, new_index: usize) -> Result<Arc<T>> {
        let len = self.elements.len();
        if old_index >= len {
            return Err(DataModelError::OutOfRange {
                index: old_index,
                len,
            });
        }
        if new_index >= len {
            return Err(DataModelError::OutOfRange {
                index: new_index,
                len: len - 1,
            });
        }
        let element = self.remove_at_index(old_index)?;
        self.insert_at_index(Arc::clone(&element), new_index)?;
        Ok(element)
    }

    pub fn move_element(&mut self, element: &Arc<T>, index: usize) -> Result<Arc<T>> {
        let old_index = self.index_of(element)?;
        self.move_to_index(old_index, index)
    }

    pub fn into_vec(self) -> Vec<Arc<T>> {
        self.elements
    }

    fn group_spans(&self) -> Vec<GroupSpan<'_>> {
        let mut start = 0;
        self.grouper
            .groups()
            .map(|(property_id, group)| {
                let span = GroupSpan {
                    property_id,
                    start,
                    len: group.len(),
                };
                start += group.len();
                span
            })
            .collect()
    }

    /// Regroup the current flat sequence and store it back in group order.
    fn rebuild_index(&mut self) {
        let grouper = ByPropertyIdGrouper::new(std::mem::take(&mut self.elements));
        self.elements = grouper.clone().into_flat();
        self.grouper = grouper;
        tracing::trace!(
            elements = self.elements.len(),
            groups = self.grouper.property_ids().len(),
            "rebuilt property index"
        );
    }
}

impl<T: PropertyIdProvider> PropertyOrder<T> for RebuildingPropertyOrder<T> {
    fn flat_view(&self) -> Vec<Arc<T>> {
        RebuildingPropertyOrder::flat_view(self)
    }

    fn property_ids(&self) -> &[PropertyId] {
        RebuildingPropertyOrder::property_ids(self)
    }

    fn len(&self) -> usize {
        RebuildingPropertyOrder::len(self)
    }

    fn insert_element(&mut self, element: Arc<T>, index: Option<usize>) -> Result<()> {
        let index = index.unwrap_or(self.elements.len());
        self.insert_at_index(element, index)
    }

    fn move_element_to(&mut self, element: &Arc<T>, index: Option<usize>) -> Result<()> {
        let index = index.unwrap_or_else(|| self.elements.len().saturating_sub(1));
        self.move_element(element, index).map(|_| ())
    }

    fn remove_element(&mut self, element: &Arc<T>) -> Result<Arc<T>> {
        RebuildingPropertyOrder::remove_element(self, element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyId, Snak};

    fn snak(property: &str, value: &str) -> Arc<Snak> {
        Arc::new(Snak::value(
            PropertyId::new(property).unwrap(),
            serde_json::Value::String(value.to_string()),
        ))
    }

    fn values(order: &RebuildingPropertyOrder<Snak>) -> Vec<String> {
        order
            .as_slice()
            .iter()
            .map(|s| match s.as_ref() {
                Snak::Value { datavalue, .. } => datavalue.as_str().unwrap_or("").to_string(),
                other => other.kind().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_construction_normalizes() {
        let order =
            RebuildingPropertyOrder::new(vec![snak("P1", "a"), snak("P2", "c"), snak("P1", "b")]);
        assert_eq!(values(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_inside_own_group() {
        let mut order =
            RebuildingPropertyOrder::new(vec![snak("P1", "a"), snak("P1", "b"), snak("P2", "c")]);
        order.insert_at_index(snak("P1", "x"), 1).unwrap();
        assert_eq!(values(&order), vec!["a", "x", "b", "c"]);
    }

    #[test]
    fn test_insert_at_end_of_own_group() {
        let mut order =
            RebuildingPropertyOrder::new(vec![snak("P1", "a"), snak("P1", "b"), snak("P2", "c")]);
        order.insert_at_index(snak("P1", "x"), 2).unwrap();
        assert_eq!(values(&order), vec!["a", "b", "x", "c"]);
    }

    #[test]
    fn test_insert_relocates_group_forward() {
        let mut order = RebuildingPropertyOrder::new(vec![
            snak("P1", "a"),
            snak("P1", "b"),
            snak("P2", "c"),
            snak("P3", "d"),
        ]);
        order.insert_at_index(snak("P1", "x"), 3).unwrap();
        assert_eq!(values(&order), vec!["c", "a", "b", "x", "d"]);
    }

    #[test]
    fn test_insert_relocates_group_backward() {
        let mut order =
            RebuildingPropertyOrder::new(vec![snak("P2", "c"), snak("P1", "a"), snak("P1", "b")]);
        order.insert_at_index(snak("P1", "x"), 0).unwrap();
        assert_eq!(values(&order), vec!["x", "a", "b", "c"]);
    }

    #[test]
    fn test_insert_into_foreign_group_moves_to_next_boundary() {
        let mut order = RebuildingPropertyOrder::new(vec![
            snak("P1", "a"),
            snak("P2", "c"),
            snak("P2", "d"),
            snak("P3", "e"),
        ]);
        order.insert_at_index(snak("P1", "x"), 2).unwrap();
        assert_eq!(values(&order), vec!["c", "d", "a", "x", "e"]);
    }

    #[test]
    fn test_insert_new_property() {
        let mut order = RebuildingPropertyOrder::new(vec![snak("P1", "a"), snak("P1", "b")]);
        order.insert_at_index(snak("P9", "z"), 0).unwrap();
        assert_eq!(values(&order), vec!["z", "a", "b"]);

        order.insert_at_index(snak("P8", "y"), 2).unwrap();
        assert_eq!(values(&order), vec!["z", "a", "b", "y"]);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut order = RebuildingPropertyOrder::new(vec![snak("P1", "a")]);
        let err = order.insert_at_index(snak("P1", "b"), 2).unwrap_err();
        assert_eq!(err, DataModelError::OutOfRange { index: 2, len: 1 });
        assert_eq!(values(&order), vec!["a"]);
    }

    #[test]
    fn test_remove_at_length_is_out_of_range() {
        let mut order = RebuildingPropertyOrder::new(vec![snak("P1", "a")]);
        assert!(matches!(
            order.remove_at_index(1),
            Err(DataModelError::OutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_index_of_is_identity_based() {
        let a = snak("P1", "a");
        let twin = snak("P1", "a");
        let order = RebuildingPropertyOrder::new(vec![Arc::clone(&a)]);
        assert_eq!(order.index_of(&a).unwrap(), 0);
        assert!(matches!(
            order.index_of(&twin),
            Err(DataModelError::NotFound(_))
        ));
    }

    #[test]
    fn test_move_validates_before_removing() {
        let mut order = RebuildingPropertyOrder::new(vec![snak("P1", "a"), snak("P2", "b")]);
        assert!(order.move_to_index(0, 2).is_err());
        assert_eq!(values(&order), vec!["a", "b"]);
    }

    #[test]
    fn test_move_element_across_groups_keeps_contiguity() {
        let b = snak("P1", "b");
        let mut order = RebuildingPropertyOrder::new(vec![
            snak("P1", "a"),
            Arc::clone(&b),
            snak("P2", "c"),
            snak("P2", "d"),
        ]);
        // After removing `b` the sequence is [a, c, d]; index 3 is its end.
        order.move_element(&b, 3).unwrap();
        assert_eq!(values(&order), vec!["c", "d", "a", "b"]);
        assert!(crate::order::is_group_contiguous(order.as_slice()));
    }
}
