//! Recency List Module
//!
//! Orders cached URIs from most to least recently used.

use std::collections::VecDeque;

// == Recency List ==
/// Recency order of cached URIs.
///
/// - Front = most recently used
/// - Back = least recently used (next eviction victim)
///
/// Promotion and removal are linear scans over the list.
#[derive(Debug, Default)]
pub struct RecencyList {
    order: VecDeque<String>,
}

impl RecencyList {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Promote ==
    /// Moves `uri` to the most-recently-used position, inserting it if absent.
    pub fn promote(&mut self, uri: &str) {
        self.remove(uri);
        self.order.push_front(uri.to_string());
    }

    // == Remove ==
    /// Drops `uri` from the list. Returns whether it was present.
    pub fn remove(&mut self, uri: &str) -> bool {
        match self.order.iter().position(|k| k == uri) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used URI.
    pub fn pop_lru(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// The least recently used URI, if any.
    #[allow(dead_code)]
    pub fn peek_lru(&self) -> Option<&str> {
        self.order.back().map(String::as_str)
    }

    /// The most recently used URI, if any.
    #[allow(dead_code)]
    pub fn peek_mru(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    /// Iterates URIs from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
