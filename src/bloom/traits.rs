/// Approximate membership over byte keys.
///
/// Implementations may report false positives but never false negatives:
/// once `test_and_insert` returned `false` for a key, every later call for
/// that key returns `true`.
pub trait ApproximateSet {
    /// Insert `item` unless it already tests positive.
    ///
    /// Returns whether the item was (possibly falsely) present before the
    /// call.
    fn test_and_insert(&mut self, item: &[u8]) -> bool;

    fn contains(&self, item: &[u8]) -> bool;
}

pub trait ApproximateSetStats {
    /// Number of keys actually inserted (positives are not counted)
    fn insert_count(&self) -> usize;
    fn shard_count(&self) -> usize;
    fn capacity(&self) -> usize;
    fn bit_count(&self) -> usize;
    /// Target error rate the set was configured with
    fn false_positive_rate(&self) -> f64;
    /// Compound error rate estimated from the current fill of every shard
    fn estimated_false_positive_rate(&self) -> f64;
}
