//! Binding tables for columns and parameters.

use super::buffer::{ApplicationDataBuffer, BindOffset};
use super::parameter::Parameter;
use std::collections::btree_map::{self, BTreeMap};

/// A descriptor that can be placed in a [`BindingTable`].
pub trait Bindable {
    /// Route the descriptor's address computation through `offset`.
    fn link_offset(&mut self, offset: BindOffset);
}

impl Bindable for ApplicationDataBuffer {
    fn link_offset(&mut self, offset: BindOffset) {
        ApplicationDataBuffer::link_offset(self, offset);
    }
}

/// Index → descriptor map sharing one bind offset cell.
///
/// Every entry is linked to the table's offset on insertion, so changing the
/// offset pointer (or the value behind it) moves all entries together.
#[derive(Debug)]
pub struct BindingTable<T> {
    entries: BTreeMap<u16, T>,
    offset: BindOffset,
}

impl<T: Bindable> Default for BindingTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Bindable> BindingTable<T> {
    /// Create an empty table without an offset pointer.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            offset: BindOffset::new(),
        }
    }

    /// Insert or replace the entry at `index`.
    pub fn bind(&mut self, index: u16, mut entry: T) {
        entry.link_offset(self.offset.clone());
        self.entries.insert(index, entry);
    }

    /// Remove the entry at `index`, if any.
    pub fn unbind(&mut self, index: u16) -> Option<T> {
        self.entries.remove(&index)
    }

    /// Remove every entry.
    pub fn unbind_all(&mut self) {
        self.entries.clear();
    }

    /// Entry at `index`.
    pub fn get(&self, index: u16) -> Option<&T> {
        self.entries.get(&index)
    }

    /// Entries in ascending index order.
    pub fn iter(&self) -> btree_map::Iter<'_, u16, T> {
        self.entries.iter()
    }

    /// Number of bound entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Install the application's bind offset pointer.
    ///
    /// # Safety
    ///
    /// See [`BindOffset::set`].
    pub unsafe fn set_offset_ptr(&mut self, ptr: *mut usize) {
        self.offset.set(ptr);
    }

    /// Installed bind offset pointer, null when none.
    pub fn offset_ptr(&self) -> *mut usize {
        self.offset.ptr()
    }
}

/// Output column bindings.
pub type ColumnBindingMap = BindingTable<ApplicationDataBuffer>;

/// Input parameter bindings.
pub type ParameterBindingMap = BindingTable<Parameter>;
