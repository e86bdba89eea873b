use crate::error::{NoveltyError, Result};
use crate::hash::{
    HashFunction, default_hash_function, optimal_bit_vector_size,
    optimal_num_hashes,
};
use derive_builder::Builder;

#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct ScalableFilterConfig {
    /// Design capacity of the first shard
    #[builder(default = "100_000")]
    pub initial_capacity: usize,

    /// Compound false positive rate over all shards (0.0 to 1.0)
    #[builder(default = "0.001")]
    pub error_rate: f64,

    /// Capacity multiplier applied to every new shard
    #[builder(default = "2")]
    pub growth_factor: usize,

    /// Error rate multiplier applied to every new shard (0.0 to 1.0)
    #[builder(default = "0.9")]
    pub tightening_ratio: f64,

    /// Hash function to use
    #[builder(default = "default_hash_function")]
    pub hash_function: HashFunction,
}

impl Default for ScalableFilterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 100_000,
            error_rate: 0.001,
            growth_factor: 2,
            tightening_ratio: 0.9,
            hash_function: default_hash_function,
        }
    }
}

impl ScalableFilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(NoveltyError::InvalidConfig(
                "Initial capacity must be > 0".into(),
            ));
        }
        if self.error_rate <= 0.0 || self.error_rate >= 1.0 {
            return Err(NoveltyError::InvalidConfig(format!(
                "Error rate must be between 0 and 1, got {}",
                self.error_rate
            )));
        }
        if self.growth_factor < 2 {
            return Err(NoveltyError::InvalidConfig(format!(
                "Growth factor must be >= 2, got {}",
                self.growth_factor
            )));
        }
        if self.tightening_ratio <= 0.0 || self.tightening_ratio >= 1.0 {
            return Err(NoveltyError::InvalidConfig(format!(
                "Tightening ratio must be between 0 and 1, got {}",
                self.tightening_ratio
            )));
        }
        Ok(())
    }

    /// Parameters of the shard at position `index`.
    ///
    /// Error targets form the series `p(1-r), p(1-r)r, p(1-r)r^2, ...` which
    /// sums to `p`, so the union of all shards never exceeds the configured
    /// rate however many shards get appended.
    pub fn shard_params(&self, index: usize) -> ShardParams {
        let exp = index.min(i32::MAX as usize) as i32;
        let capacity = self
            .initial_capacity
            .saturating_mul(self.growth_factor.saturating_pow(exp as u32));
        let false_positive_rate = self.error_rate
            * (1.0 - self.tightening_ratio)
            * self.tightening_ratio.powi(exp);
        // Past ~f64::MIN_POSITIVE the formulas stop making sense
        let false_positive_rate = false_positive_rate.max(f64::MIN_POSITIVE);
        let bit_vector_size =
            optimal_bit_vector_size(capacity, false_positive_rate);
        let num_hashes = optimal_num_hashes(capacity, bit_vector_size);

        ShardParams {
            capacity,
            false_positive_rate,
            bit_vector_size,
            num_hashes,
        }
    }

    /// Tuning from environment variables, falling back to defaults.
    ///
    /// Reads `NOVELTY_INITIAL_CAPACITY` and `NOVELTY_ERROR_RATE` after loading
    /// a `.env` file if one exists.
    #[cfg(feature = "cli")]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Some(capacity) = env_var::<usize>("NOVELTY_INITIAL_CAPACITY")? {
            config.initial_capacity = capacity;
        }
        if let Some(rate) = env_var::<f64>("NOVELTY_ERROR_RATE")? {
            config.error_rate = rate;
        }
        Ok(config)
    }
}

#[cfg(feature = "cli")]
fn env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|e| {
            NoveltyError::EnvParseError {
                var_name: var_name.to_string(),
                value,
                error: e.to_string(),
            }
        }),
        Err(_) => Ok(None),
    }
}

/// Derived parameters of a single shard
#[derive(Debug, Clone, PartialEq)]
pub struct ShardParams {
    pub capacity: usize,
    pub false_positive_rate: f64,
    pub bit_vector_size: usize,
    pub num_hashes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        let built = ScalableFilterConfigBuilder::default().build().unwrap();
        let default = ScalableFilterConfig::default();
        assert_eq!(built.initial_capacity, default.initial_capacity);
        assert_eq!(built.error_rate, default.error_rate);
        assert_eq!(built.growth_factor, default.growth_factor);
        assert_eq!(built.tightening_ratio, default.tightening_ratio);
    }

    #[test]
    fn test_shard_params_grow_and_tighten() {
        let config = ScalableFilterConfigBuilder::default()
            .initial_capacity(1000)
            .error_rate(0.01)
            .build()
            .unwrap();

        let first = config.shard_params(0);
        let second = config.shard_params(1);
        assert_eq!(first.capacity, 1000);
        assert_eq!(second.capacity, 2000);
        assert!(second.false_positive_rate < first.false_positive_rate);
        assert!(second.bit_vector_size > 2 * first.bit_vector_size);
        assert!(second.num_hashes >= first.num_hashes);
    }

    #[test]
    fn test_shard_error_series_is_bounded() {
        let config = ScalableFilterConfig::default();
        let total: f64 = (0..64)
            .map(|i| config.shard_params(i).false_positive_rate)
            .sum();
        assert!(total <= config.error_rate);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = ScalableFilterConfigBuilder::default()
            .initial_capacity(0)
            .build()
            .unwrap();
        assert!(matches!(zero.validate(), Err(NoveltyError::InvalidConfig(_))));

        for rate in [0.0, 1.0, -0.5, 1.5] {
            let config = ScalableFilterConfigBuilder::default()
                .error_rate(rate)
                .build()
                .unwrap();
            assert!(config.validate().is_err(), "rate {rate} accepted");
        }

        let ratio = ScalableFilterConfigBuilder::default()
            .tightening_ratio(1.0)
            .build()
            .unwrap();
        assert!(ratio.validate().is_err());

        // A new shard must be bigger than the one before it
        for growth_factor in [0, 1] {
            let growth = ScalableFilterConfigBuilder::default()
                .growth_factor(growth_factor)
                .build()
                .unwrap();
            assert!(growth.validate().is_err());
        }
    }
}
