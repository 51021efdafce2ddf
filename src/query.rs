//! Lookup over an already-parsed [`Document`]: array indexing, object
//! field lookup (linear below a threshold, sorted binary search above
//! it), and small format-string path queries chaining the two.

use crate::value::{Document, JsonObject, Value};

/// Field count at or above which an object is promoted to sorted-array
/// form for binary search. Below it, linear scan is cheaper (and avoids
/// paying a sort for objects that are only ever looked up once or twice).
pub const SORT_THRESHOLD: usize = 16;

/// One step of a path query: either an object field name or an array
/// index.
#[derive(Debug, Clone, Copy)]
pub enum PathStep<'a> {
    Object(&'a [u8]),
    Array(usize),
}

impl JsonObject {
    /// Look up `key`, scanning linearly. Never reorders `pairs`; suitable
    /// when only a shared reference is available, or when the object is
    /// known to be looked up at most once.
    pub fn get<'a>(&'a self, key: &[u8], input: &[u8]) -> Option<&'a Value> {
        self.pairs
            .iter()
            .find(|pair| pair.name.bytes(input).as_ref() == key)
            .map(|pair| &pair.value)
    }

    /// Look up `key`, promoting the object to sorted form (and switching
    /// to binary search) once its field count reaches [`SORT_THRESHOLD`].
    /// The promotion is a one-time cost amortized across subsequent
    /// lookups on the same object.
    pub fn get_mut<'a>(&'a mut self, key: &[u8], input: &[u8]) -> Option<&'a mut Value> {
        if self.pairs.len() >= SORT_THRESHOLD {
            if !self.sorted.get() {
                self.pairs
                    .sort_by(|a, b| a.name.bytes(input).as_ref().cmp(b.name.bytes(input).as_ref()));
                self.sorted.set(true);
            }
            let idx = self
                .pairs
                .binary_search_by(|pair| pair.name.bytes(input).as_ref().cmp(key))
                .ok()?;
            Some(&mut self.pairs[idx].value)
        } else {
            self.pairs
                .iter_mut()
                .find(|pair| pair.name.bytes(input).as_ref() == key)
                .map(|pair| &mut pair.value)
        }
    }
}

/// Index into an array, or `None` if `index` is out of range or `value`
/// is not an array.
pub fn array_get(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        _ => None,
    }
}

/// Run a path query against `value`, mutating any object encountered
/// along the way to promote it to sorted form if warranted. Returns
/// `None` as soon as any step misses or type-mismatches.
pub fn query_path<'a>(
    mut value: &'a mut Value,
    path: &[PathStep<'_>],
    input: &[u8],
) -> Option<&'a Value> {
    for step in path {
        value = match (step, value) {
            (PathStep::Object(key), Value::Object(obj)) => obj.get_mut(key, input)?,
            (PathStep::Array(idx), Value::Array(items)) => items.get_mut(*idx)?,
            _ => return None,
        };
    }
    Some(value)
}

impl Document {
    /// Convenience wrapper over [`query_path`] rooted at this document.
    pub fn query<'a>(&'a mut self, path: &[PathStep<'_>]) -> Option<&'a Value> {
        let Document { input, root } = self;
        query_path(root, path, &input[..])
    }
}
