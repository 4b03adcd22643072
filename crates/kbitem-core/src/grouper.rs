//! Read-only grouping of elements by property id.

use crate::error::{DataModelError, Result};
use crate::model::PropertyId;
use std::collections::HashMap;
use std::sync::Arc;

/// Anything that can name the property it belongs to.
pub trait PropertyIdProvider {
    fn property_id(&self) -> &PropertyId;
}

impl<T: PropertyIdProvider + ?Sized> PropertyIdProvider for Arc<T> {
    fn property_id(&self) -> &PropertyId {
        (**self).property_id()
    }
}

impl<T: PropertyIdProvider + ?Sized> PropertyIdProvider for &T {
    fn property_id(&self) -> &PropertyId {
        (**self).property_id()
    }
}

/// Elements partitioned by property id.
///
/// Property ids iterate in first-seen order across the input; elements keep
/// their input order inside a group. Built once and never patched: callers
/// that need a fresh grouping build a new one.
#[derive(Debug)]
pub struct ByPropertyIdGrouper<T> {
    property_ids: Vec<PropertyId>,
    groups: HashMap<PropertyId, Vec<Arc<T>>>,
}

impl<T> Clone for ByPropertyIdGrouper<T> {
    fn clone(&self) -> Self {
        Self {
            property_ids: self.property_ids.clone(),
            groups: self.groups.clone(),
        }
    }
}

impl<T: PropertyIdProvider> ByPropertyIdGrouper<T> {
    pub fn new<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        let mut property_ids = Vec::new();
        let mut groups: HashMap<PropertyId, Vec<Arc<T>>> = HashMap::new();
        for element in elements {
            let property_id = element.property_id();
            match groups.get_mut(property_id) {
                Some(group) => group.push(element),
                None => {
                    property_ids.push(property_id.clone());
                    groups.insert(property_id.clone(), vec![element]);
                }
            }
        }
        Self {
            property_ids,
            groups,
        }
    }

    /// Property ids in first-seen order.
    pub fn property_ids(&self) -> &[PropertyId] {
        &self.property_ids
    }

    pub fn by_property_id(&self, property_id: &PropertyId) -> Result<&[Arc<T>]> {
        self.groups
            .get(property_id)
            .map(Vec::as_slice)
            .ok_or_else(|| DataModelError::NotFound(format!("property {property_id}")))
    }

    pub fn has_property_id(&self, property_id: &PropertyId) -> bool {
        self.groups.contains_key(property_id)
    }

    /// Iterate `(property id, group)` pairs in group order.
    pub fn groups(&self) -> impl Iterator<Item = (&PropertyId, &[Arc<T>])> {
        self.property_ids
            .iter()
            .filter_map(|id| self.groups.get(id).map(|group| (id, group.as_slice())))
    }

    /// Total number of grouped elements.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.property_ids.is_empty()
    }

    /// Concatenate the groups in group order, yielding a group-contiguous sequence.
    pub fn into_flat(mut self) -> Vec<Arc<T>> {
        let mut flat = Vec::with_capacity(self.len());
        for property_id in &self.property_ids {
            if let Some(group) = self.groups.remove(property_id) {
                flat.extend(group);
            }
        }
        flat
    }
}
