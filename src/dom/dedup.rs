use std::collections::HashSet;

/// `(tag, label)`; a missing label is a key value of its own.
pub type DedupKey = (String, Option<String>);

/// Keys already emitted during one run.
#[derive(Debug, Clone, Default)]
pub struct SeenKeys {
    keys: HashSet<DedupKey>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the key; false if it was already present.
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Keeps the first item for each key, preserving order, and hands the
/// updated key set back to the caller.
pub fn retain_first<T, F>(items: Vec<T>, mut seen: SeenKeys, key: F) -> (Vec<T>, SeenKeys)
where
    F: Fn(&T) -> DedupKey,
{
    let kept = items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect();
    (kept, seen)
}
