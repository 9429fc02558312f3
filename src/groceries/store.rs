//! In-memory item store
//!
//! Owns the list of grocery items in insertion order. Display order is
//! derived on demand by [`ItemStore::sorted`] and never persisted.
//! Every mutating operation reports whether the collection changed so the
//! caller knows when to write the blob back.

use serde::{Deserialize, Serialize};

/// A single grocery-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    last_id: i64,
}

impl ItemStore {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items, last_id: 0 }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append a new item. Blank or whitespace-only text is ignored.
    /// Returns the id of the new item.
    pub fn add(&mut self, text: &str) -> Option<String> {
        self.add_at(text, chrono::Utc::now().timestamp_millis())
    }

    fn add_at(&mut self, text: &str, now_millis: i64) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        let id = self.next_id(now_millis);
        self.items.push(Item {
            id: id.clone(),
            text: text.to_string(),
            is_completed: false,
        });
        Some(id)
    }

    /// Millisecond timestamp id, bumped forward on collision so two adds in
    /// the same millisecond (or a clash with a restored id) stay unique.
    fn next_id(&mut self, now_millis: i64) -> String {
        let mut candidate = now_millis.max(self.last_id + 1);
        while self.items.iter().any(|item| item.id == candidate.to_string()) {
            candidate += 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }

    /// Flip completion of the item with `id`. Unknown ids are a no-op.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_completed = !item.is_completed;
                true
            }
            None => false,
        }
    }

    /// Remove the item with `id`. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Remove every completed item, keeping the rest in order.
    /// Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.is_completed);
        before - self.items.len()
    }

    /// Display view: open items first, completed last, stable within each group
    pub fn sorted(&self) -> Vec<&Item> {
        let mut view: Vec<&Item> = self.items.iter().collect();
        view.sort_by_key(|item| item.is_completed);
        view
    }

    /// Texts of all items that are not yet completed, in insertion order
    pub fn open_texts(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| !item.is_completed)
            .map(|item| item.text.clone())
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_completed).count()
    }

    /// True when there is at least one item and every item is completed
    pub fn all_completed(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.is_completed)
    }
}
