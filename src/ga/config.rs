//! GA configuration.
//!
//! [`GaConfig`] holds the operator parameters of one run. The evaluation
//! budget is passed separately to [`GaRunner::run`](super::GaRunner::run)
//! because it usually depends on the problem size.

use crate::error::{TspError, TspResult};

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use tsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert!((config.crossover_rate - 0.8).abs() < 1e-12);
/// assert!((config.mutation_rate - 0.1).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_crossover_rate(0.9)
///     .with_mutation_rate(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of tours per generation. Must be at least 2 so a binary
    /// tournament can draw two distinct individuals.
    pub population_size: usize,

    /// Probability of applying PMX to a selected pair (0.0–1.0).
    ///
    /// Otherwise both parents are cloned into the next generation.
    pub crossover_rate: f64,

    /// Probability of applying swap mutation to an offspring (0.0–1.0).
    pub mutation_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::InvalidArgument`] describing the first invalid field.
    pub fn validate(&self) -> TspResult<()> {
        if self.population_size < 2 {
            return Err(TspError::invalid_argument(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        check_probability("crossover_rate", self.crossover_rate)?;
        check_probability("mutation_rate", self.mutation_rate)?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> TspResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TspError::invalid_argument(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_crossover_rate(0.6)
            .with_mutation_rate(0.25);

        assert_eq!(config.population_size, 20);
        assert!((config.crossover_rate - 0.6).abs() < 1e-10);
        assert!((config.mutation_rate - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);

        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        for n in [0, 1] {
            let err = GaConfig::default()
                .with_population_size(n)
                .validate()
                .unwrap_err();
            assert!(matches!(err, TspError::InvalidArgument { .. }));
        }
        assert!(GaConfig::default().with_population_size(2).validate().is_ok());
    }

    #[test]
    fn test_validate_rates_set_directly() {
        let config = GaConfig {
            crossover_rate: 1.5,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GaConfig {
            mutation_rate: f64::NAN,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_boundary_rates_valid() {
        let config = GaConfig {
            population_size: 2,
            crossover_rate: 0.0,
            mutation_rate: 1.0,
        };
        assert!(config.validate().is_ok());
    }
}
