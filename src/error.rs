use thiserror::Error;

/// Rejected input from the command line or the HTTP payload.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("--{flag} must be a finite amount >= 0")]
    NegativeAmount { flag: &'static str },
    #[error("--tax-shock-multiplier must be >= 1")]
    TaxMultiplier,
    #[error("--{flag} must be between 0 and 100")]
    ShareOutOfRange { flag: &'static str },
    #[error("at most {max} reflection responses are accepted, got {got}")]
    TooManyReflections { max: usize, got: usize },
}
