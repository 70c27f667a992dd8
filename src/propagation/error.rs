//! Error taxonomy for the propagation core
//!
//! All validation failures surface synchronously at the constructor or
//! setter that received the bad value; nothing retries or recovers
//! inside the core.

/// Propagation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed construction or mutation parameter: non-positive step
    /// count, inverted time window, negative start time, eccentricity
    /// outside `[0, 1)`, or an unknown integrator name.
    InvalidArgument { message: String },

    /// The orbital radius collapsed below the configured floor (or went
    /// non-finite) while stepping, so the inverse-square law can no
    /// longer be evaluated meaningfully.
    NumericalInstability { step: usize, radius_km: f64 },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            Self::NumericalInstability { step, radius_km } => {
                write!(
                    f,
                    "numerical instability at step {}: orbital radius {:.6e} km",
                    step, radius_km
                )
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
