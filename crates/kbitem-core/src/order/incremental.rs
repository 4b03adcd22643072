use super::PropertyOrder;
use crate::error::{DataModelError, Result};
use crate::grouper::{ByPropertyIdGrouper, PropertyIdProvider};
use crate::model::PropertyId;
use std::collections::HashMap;
use std::sync::Arc;

/// Group order plus one element list per property, mutated in place.
///
/// Invariant: `property_ids` holds exactly the properties with a non-empty list.
#[derive(Debug)]
pub struct IncrementalPropertyOrder<T> {
    property_ids: Vec<PropertyId>,
    by_property_id: HashMap<PropertyId, Vec<Arc<T>>>,
}

/// Resolve an optional index against `len`, clamping past-the-end positions to the end.
fn clamp_index(index: Option<usize>, len: usize) -> usize {
    index.map_or(len, |i| i.min(len))
}

impl<T: PropertyIdProvider> IncrementalPropertyOrder<T> {
    pub fn new<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        let grouper = ByPropertyIdGrouper::new(elements);
        let by_property_id = grouper
            .groups()
            .map(|(property_id, group)| (property_id.clone(), group.to_vec()))
            .collect();
        Self {
            property_ids: grouper.property_ids().to_vec(),
            by_property_id,
        }
    }

    pub fn property_ids(&self) -> &[PropertyId] {
        &self.property_ids
    }

    pub fn by_property_id(&self, property_id: &PropertyId) -> Result<&[Arc<T>]> {
        self.by_property_id
            .get(property_id)
            .map(Vec::as_slice)
            .ok_or_else(|| DataModelError::NotFound(format!("property {property_id}")))
    }

    pub fn len(&self) -> usize {
        self.by_property_id.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.property_ids.is_empty()
    }

    /// Elements in group order.
    pub fn flat_view(&self) -> Vec<Arc<T>> {
        self.property_ids
            .iter()
            .filter_map(|id| self.by_property_id.get(id))
            .flat_map(|group| group.iter().cloned())
            .collect()
    }

    /// Move a whole group among the other groups. Past-the-end indices append.
    pub fn move_group_to_index(
        &mut self,
        property_id: &PropertyId,
        index: Option<usize>,
    ) -> Result<()> {
        let current = self
            .property_ids
            .iter()
            .position(|id| id == property_id)
            .ok_or_else(|| DataModelError::NotFound(format!("property {property_id}")))?;
        let moved = self.property_ids.remove(current);
        let at = clamp_index(index, self.property_ids.len());
        tracing::debug!(property = %moved, from = current, to = at, "moving property group");
        self.property_ids.insert(at, moved);
        Ok(())
    }

    /// Move `element` within its own group. Past-the-end indices append.
    pub fn move_element_to_index(&mut self, element: &Arc<T>, index: Option<usize>) -> Result<()> {
        let property_id = element.property_id();
        let group = self
            .by_property_id
            .get_mut(property_id)
            .ok_or_else(|| DataModelError::NotFound(format!("property {property_id}")))?;
        let current = group
            .iter()
            .position(|e| Arc::ptr_eq(e, element))
            .ok_or_else(|| {
                DataModelError::NotFound(format!("element in group of property {property_id}"))
            })?;
        let moved = group.remove(current);
        let at = clamp_index(index, group.len());
        group.insert(at, moved);
        Ok(())
    }

    /// Add `element` to its group at `index`.
    ///
    /// A property seen for the first time gets a new group appended after all
    /// existing groups; `index` never moves a group.
    pub fn add_element_at_index(&mut self, element: Arc<T>, index: Option<usize>) {
        let property_id = element.property_id();
        if let Some(group) = self.by_property_id.get_mut(property_id) {
            let at = clamp_index(index, group.len());
            group.insert(at, element);
            return;
        }
        let property_id = property_id.clone();
        self.property_ids.push(property_id.clone());
        self.by_property_id.insert(property_id, vec![element]);
    }

    /// Remove `element`, dropping its property from the group order if the group empties.
    pub fn remove_element(&mut self, element: &Arc<T>) -> Result<Arc<T>> {
        let property_id = element.property_id();
        let group = self
            .by_property_id
            .get_mut(property_id)
            .ok_or_else(|| DataModelError::NotFound(format!("property {property_id}")))?;
        let current = group
            .iter()
            .position(|e| Arc::ptr_eq(e, element))
            .ok_or_else(|| {
                DataModelError::NotFound(format!("element in group of property {property_id}"))
            })?;
        let removed = group.remove(current);
        if group.is_empty() {
            self.by_property_id.remove(property_id);
            self.property_ids.retain(|id| id != property_id);
        }
        Ok(removed)
    }
}

impl<T: PropertyIdProvider> PropertyOrder<T> for IncrementalPropertyOrder<T> {
    fn flat_view(&self) -> Vec<Arc<T>> {
        IncrementalPropertyOrder::flat_view(self)
    }

    fn property_ids(&self) -> &[PropertyId] {
        IncrementalPropertyOrder::property_ids(self)
    }

    fn len(&self) -> usize {
        IncrementalPropertyOrder::len(self)
    }

    fn insert_element(&mut self, element: Arc<T>, index: Option<usize>) -> Result<()> {
        self.add_element_at_index(element, index);
        Ok(())
    }

    fn move_element_to(&mut self, element: &Arc<T>, index: Option<usize>) -> Result<()> {
        self.move_element_to_index(element, index)
    }

    fn remove_element(&mut self, element: &Arc<T>) -> Result<Arc<T>> {
        IncrementalPropertyOrder::remove_element(self, element)
    }
}
