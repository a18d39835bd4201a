//! Comparison configuration.

use kairos_arima::SearchConfig;

use crate::error::EvaluateError;

/// Configuration for [`compare_models`](crate::compare_models).
#[derive(Debug, Clone, PartialEq)]
pub struct CompareConfig {
    search: SearchConfig,
    period: usize,
    parallel: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            period: 12,
            parallel: true,
        }
    }
}

impl CompareConfig {
    /// Set the order search configuration shared by both model families.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Set the seasonal period `m` used by the SARIMA search.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Run the ARIMA and SARIMA searches concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the order search configuration.
    pub fn search(&self) -> &SearchConfig {
        &self.search
    }

    /// Returns the seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Returns whether the two searches run concurrently.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Checks the period and the embedded search configuration.
    ///
    /// # Errors
    ///
    /// [`EvaluateError::InvalidParameter`] if the period is below 2, or the
    /// search configuration's own error.
    pub fn validate(&self) -> Result<(), EvaluateError> {
        if self.period < 2 {
            return Err(EvaluateError::InvalidParameter {
                name: "period",
                value: self.period,
                reason: "seasonal period must be at least 2",
            });
        }
        self.search.validate()?;
        Ok(())
    }
}
