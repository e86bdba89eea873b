//! Scalable Bloom filter.
//!
//! A chain of plain Bloom filters ("shards"). Queries consult every shard,
//! inserts only touch the newest one. When the newest shard reaches its
//! design capacity, a bigger shard with a tighter error target is appended.
pub mod config;
pub mod filter;
pub mod shard;
pub mod traits;

pub use config::{
    ScalableFilterConfig, ScalableFilterConfigBuilder,
    ScalableFilterConfigBuilderError, ShardParams,
};
pub use filter::ScalableBloomFilter;
pub use shard::Shard;
pub use traits::{ApproximateSet, ApproximateSetStats};
