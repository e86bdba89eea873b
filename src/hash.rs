use fnv::FnvHasher;
use murmur3::murmur3_x64_128;
use std::hash::Hasher;
use std::io::Cursor;

/// A type alias for the hash function used by the Bloom filter shards.
///
/// **Parameters:**
///
/// - `item: &[u8]`
///   - A byte slice representing the item to be hashed.
///
/// **Returns:**
///
/// - `KeyDigest`
///   - Two independent 64 bit digests of the item.
///
/// **Usage:**
///
/// The digest is computed once per key and then stretched into as many bit
/// indices as each shard needs with [`KeyDigest::indices`]. Shards differ in
/// size and hash count, so hashing the key once and deriving indices per
/// shard keeps a lookup across N shards at a single pass over the key.
pub type HashFunction = fn(&[u8]) -> KeyDigest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDigest {
    pub h1: u64,
    pub h2: u64,
}

impl KeyDigest {
    /// Enhanced double hashing: `h1 + i*h2 + (i^3 - i)/6 (mod m)`.
    ///
    /// The cubic term keeps the index sequence from collapsing when `h2`
    /// is a multiple of `m`'s factors.
    pub fn indices(
        &self,
        num_hashes: usize,
        bit_count: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let m = bit_count as u64;
        (0..num_hashes as u64).map(move |i| {
            let cubic = i.wrapping_mul(i).wrapping_mul(i).wrapping_sub(i) / 6;
            (self
                .h1
                .wrapping_add(i.wrapping_mul(self.h2))
                .wrapping_add(cubic)
                % m) as usize
        })
    }
}

pub(crate) fn hash_murmur64(key: &[u8]) -> u64 {
    let mut cursor = Cursor::new(key);
    murmur3_x64_128(&mut cursor, 0).expect("Failed to compute Murmur3 hash")
        as u64
}

pub(crate) fn hash_fnv64(key: &[u8]) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(key);
    hasher.finish()
}

pub fn default_hash_function(item: &[u8]) -> KeyDigest {
    KeyDigest {
        h1: hash_murmur64(item),
        h2: hash_fnv64(item),
    }
}

pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil().max(1.0) as usize
}

pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    (((m as f64 / n as f64) * std::f64::consts::LN_2).round() as usize).max(1)
}
