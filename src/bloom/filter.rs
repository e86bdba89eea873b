use super::{
    ApproximateSet, ApproximateSetStats, ScalableFilterConfig, Shard,
};
use crate::error::Result;
use crate::hash::KeyDigest;
use tracing::debug;

pub struct ScalableBloomFilter {
    config: ScalableFilterConfig,
    shards: Vec<Shard>,
}

impl ScalableBloomFilter {
    pub fn new(config: ScalableFilterConfig) -> Result<Self> {
        config.validate()?;

        let first = Shard::new(config.shard_params(0));
        Ok(Self {
            config,
            shards: vec![first],
        })
    }

    pub fn config(&self) -> &ScalableFilterConfig {
        &self.config
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    fn contains_digest(&self, digest: &KeyDigest) -> bool {
        self.shards.iter().any(|shard| shard.contains(digest))
    }

    fn grow(&mut self) {
        let params = self.config.shard_params(self.shards.len());
        debug!(
            shard = self.shards.len(),
            capacity = params.capacity,
            bits = params.bit_vector_size,
            num_hashes = params.num_hashes,
            "Appending bloom filter shard"
        );
        self.shards.push(Shard::new(params));
    }
}

impl ApproximateSet for ScalableBloomFilter {
    fn test_and_insert(&mut self, item: &[u8]) -> bool {
        let digest = (self.config.hash_function)(item);
        if self.contains_digest(&digest) {
            return true;
        }

        if self.shards.last().is_none_or(Shard::is_full) {
            self.grow();
        }
        if let Some(active) = self.shards.last_mut() {
            active.insert(&digest);
        }
        false
    }

    fn contains(&self, item: &[u8]) -> bool {
        self.contains_digest(&(self.config.hash_function)(item))
    }
}

impl ApproximateSetStats for ScalableBloomFilter {
    fn insert_count(&self) -> usize {
        self.shards.iter().map(Shard::insert_count).sum()
    }

    fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn capacity(&self) -> usize {
        self.shards.iter().map(|s| s.params().capacity).sum()
    }

    fn bit_count(&self) -> usize {
        self.shards.iter().map(|s| s.params().bit_vector_size).sum()
    }

    fn false_positive_rate(&self) -> f64 {
        self.config.error_rate
    }

    fn estimated_false_positive_rate(&self) -> f64 {
        1.0 - self
            .shards
            .iter()
            .map(|s| 1.0 - s.estimated_false_positive_rate())
            .product::<f64>()
    }
}

impl std::fmt::Debug for ScalableBloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScalableBloomFilter {{ shards: {}, inserted: {}, capacity: {}, bits: {}, error_rate: {} }}",
            self.shard_count(),
            self.insert_count(),
            self.capacity(),
            self.bit_count(),
            self.config.error_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloom::ScalableFilterConfigBuilder;
    use crate::hash::KeyDigest;

    fn tiny_filter(capacity: usize) -> ScalableBloomFilter {
        let config = ScalableFilterConfigBuilder::default()
            .initial_capacity(capacity)
            .error_rate(0.01)
            .build()
            .expect("Unable to build ScalableFilterConfig");
        ScalableBloomFilter::new(config).expect("Failed to create filter")
    }

    #[test]
    fn test_workflow() {
        let mut filter = tiny_filter(100);
        assert!(!filter.test_and_insert(b"some data"));
        assert!(!filter.test_and_insert(b"another data"));
        assert!(filter.test_and_insert(b"some data"));
        assert!(filter.contains(b"another data"));
        assert!(!filter.contains(b"some"));
        assert_eq!(filter.insert_count(), 2);
    }

    #[test]
    fn test_positive_does_not_insert() {
        let mut filter = tiny_filter(100);
        filter.test_and_insert(b"x");
        for _ in 0..10 {
            assert!(filter.test_and_insert(b"x"));
        }
        assert_eq!(filter.insert_count(), 1);
    }

    #[test]
    fn test_grows_when_active_shard_full() {
        let mut filter = tiny_filter(4);
        for i in 0..4u32 {
            filter.test_and_insert(&i.to_le_bytes());
        }
        assert_eq!(filter.shard_count(), 1);

        // Inserting a fifth distinct key spills into a new shard
        let mut i = 4u32;
        while filter.shard_count() == 1 {
            filter.test_and_insert(&i.to_le_bytes());
            i += 1;
        }
        assert_eq!(filter.shard_count(), 2);
        assert_eq!(filter.shards()[1].params().capacity, 8);
        assert!(filter.shards()[0].is_full());
    }

    #[test]
    fn test_only_newest_shard_receives_inserts() {
        let mut filter = tiny_filter(2);
        for i in 0..20u32 {
            filter.test_and_insert(&i.to_le_bytes());
        }
        for shard in filter.shards() {
            assert!(shard.insert_count() <= shard.params().capacity);
        }
        // Every shard but the last is filled to exactly its capacity
        for shard in &filter.shards()[..filter.shard_count() - 1] {
            assert!(shard.is_full());
        }
    }

    #[test]
    fn test_custom_hash_function() {
        // Every key collides, so only the first one is ever "new"
        fn constant(_: &[u8]) -> KeyDigest {
            KeyDigest { h1: 42, h2: 7 }
        }
        let config = ScalableFilterConfigBuilder::default()
            .initial_capacity(10)
            .hash_function(constant)
            .build()
            .unwrap();
        let mut filter = ScalableBloomFilter::new(config).unwrap();
        assert!(!filter.test_and_insert(b"a"));
        assert!(filter.test_and_insert(b"b"));
    }

    #[test]
    fn test_empty_key() {
        let mut filter = tiny_filter(10);
        assert!(!filter.test_and_insert(b""));
        assert!(filter.test_and_insert(b""));
    }
}
