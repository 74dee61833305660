//! Error types shared by the enrichment formulas, the nuclide data provider
//! and the multicomponent solver.

use crate::nucname::Nuclide;

/// Result type for enrichment operations.
pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Errors that can occur while evaluating enrichment relations or solving a cascade.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnrichmentError {
    /// Missing, conflicting or out-of-range input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Value function evaluated outside the open interval (0, 1)
    #[error("Value function is undefined at x = {0}")]
    DomainError(f64),
    /// Iteration budget exhausted before the residual dropped below tolerance
    #[error("Cascade did not converge after {iterations} iterations (residual: {residual:.3e})")]
    NonConvergence {
        /// Iterations performed by the loop that gave up
        iterations: usize,
        /// Residual measure at the last iteration
        residual: f64,
    },
    /// No mass or abundance registered for the nuclide
    #[error("No nuclide data available for {0}")]
    DataUnavailable(Nuclide),
}

impl EnrichmentError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EnrichmentError::InvalidInput(message.into())
    }

    /// Returns true if the error reports an exhausted iteration budget.
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, EnrichmentError::NonConvergence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EnrichmentError::invalid("xp == xt");
        assert_eq!(err.to_string(), "Invalid input: xp == xt");

        let err = EnrichmentError::DomainError(1.0);
        assert_eq!(err.to_string(), "Value function is undefined at x = 1");

        let err = EnrichmentError::NonConvergence { iterations: 5, residual: 0.00125 };
        assert_eq!(err.to_string(), "Cascade did not converge after 5 iterations (residual: 1.250e-3)");
        assert!(err.is_non_convergence());

        let err = EnrichmentError::DataUnavailable(Nuclide::from_id(922390000));
        assert_eq!(err.to_string(), "No nuclide data available for U239");
        assert!(!err.is_non_convergence());
    }
}
