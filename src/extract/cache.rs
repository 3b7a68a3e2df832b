//! Bounded LRU cache for extracted batches.

use std::collections::{HashMap, VecDeque};

use sha2::{Digest, Sha256};
use tracing::debug;

use super::{ExtractedDocument, UploadedFile};

/// SHA-256 digest over the ordered `(lowercased name, content)` pairs of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct BatchKey(String);

impl BatchKey {
    pub(super) fn from_files(files: &[UploadedFile]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((files.len() as u64).to_le_bytes());
        for file in files {
            // Length prefixes keep ("ab", "c") distinct from ("a", "bc")
            let name = file.normalized_name();
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update((file.content().len() as u64).to_le_bytes());
            hasher.update(file.content());
        }
        Self(hex::encode(hasher.finalize()))
    }
}

/// Count-bounded cache evicting the least recently used batch.
pub(super) struct BatchCache {
    capacity: usize,
    entries: HashMap<BatchKey, ExtractedDocument>,
    /// Front is least recently used.
    order: VecDeque<BatchKey>,
}

impl BatchCache {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub(super) fn get(&mut self, key: &BatchKey) -> Option<ExtractedDocument> {
        let doc = self.entries.get(key)?.clone();
        self.touch(key);
        Some(doc)
    }

    pub(super) fn insert(&mut self, key: BatchKey, doc: ExtractedDocument) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.insert(key.clone(), doc).is_some() {
            self.touch(&key);
            return;
        }

        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    debug!("Evicted cached extraction {}", &oldest.0[..12]);
                }
                None => break,
            }
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: &BatchKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}
