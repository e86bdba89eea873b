use super::ShardParams;
use crate::hash::KeyDigest;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};

/// One fixed-size Bloom filter inside a [`super::ScalableBloomFilter`].
pub struct Shard {
    params: ShardParams,
    bits: BitVec<usize, Lsb0>,
    insert_count: usize,
}

impl Shard {
    pub fn new(params: ShardParams) -> Self {
        let bits = bitvec![0; params.bit_vector_size];
        Self {
            params,
            bits,
            insert_count: 0,
        }
    }

    pub fn contains(&self, digest: &KeyDigest) -> bool {
        digest
            .indices(self.params.num_hashes, self.params.bit_vector_size)
            .all(|idx| self.bits[idx])
    }

    pub fn insert(&mut self, digest: &KeyDigest) {
        for idx in
            digest.indices(self.params.num_hashes, self.params.bit_vector_size)
        {
            self.bits.set(idx, true);
        }
        self.insert_count += 1;
    }

    /// A shard is full once it holds as many keys as it was sized for.
    pub fn is_full(&self) -> bool {
        self.insert_count >= self.params.capacity
    }

    pub fn params(&self) -> &ShardParams {
        &self.params
    }

    pub fn insert_count(&self) -> usize {
        self.insert_count
    }

    pub fn set_bits(&self) -> usize {
        self.bits.count_ones()
    }

    /// False positive probability given the bits actually set so far.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill = self.set_bits() as f64 / self.params.bit_vector_size as f64;
        fill.powi(self.params.num_hashes as i32)
    }
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shard {{ capacity: {}, inserted: {}, bits: {}, num_hashes: {}, false_positive_rate: {} }}",
            self.params.capacity,
            self.insert_count,
            self.params.bit_vector_size,
            self.params.num_hashes,
            self.params.false_positive_rate
        )
    }
}
