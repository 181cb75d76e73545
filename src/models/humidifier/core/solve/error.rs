use thiserror::Error;

/// Errors that end a field solve.
///
/// Both variants are terminal: no partial fields are returned. They usually
/// mean the operating point or device parameters are outside the range the
/// model can handle.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError {
    /// The tracked error exceeded the divergence ceiling or became non-finite.
    #[error(
        "model diverged at iteration {iteration} (error={error:e}), check input parameter range or model parameters"
    )]
    Diverged {
        /// Largest raw cell change in the failing iteration.
        error: f64,

        /// Iteration at which divergence was detected.
        iteration: usize,
    },

    /// The iteration cap was reached before the error met the threshold.
    #[error(
        "model did not converge in {iterations} iterations (error={error:e}), check input parameter range or model parameters"
    )]
    NotConverged {
        /// Largest raw cell change in the last iteration.
        error: f64,

        /// Iteration count performed.
        iterations: usize,
    },
}

impl SolveError {
    /// Returns the last computed error value.
    #[must_use]
    pub fn error(&self) -> f64 {
        match *self {
            Self::Diverged { error, .. } | Self::NotConverged { error, .. } => error,
        }
    }

    /// Returns the number of iterations performed before failing.
    #[must_use]
    pub fn iterations(&self) -> usize {
        match *self {
            Self::Diverged { iteration, .. } => iteration,
            Self::NotConverged { iterations, .. } => iterations,
        }
    }
}
