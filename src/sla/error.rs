use thiserror::Error;

/// Errors raised by the SLA engine itself (as opposed to tracker failures).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlaError {
    #[error("Missing SEV label")]
    MissingSeverity,

    #[error("Too many SEV labels ({0})")]
    TooManySeverities(usize),

    #[error("No severity policy configured for {0}")]
    UnknownSeverity(String),

    #[error("Issue {0} has both mobile and extension labels")]
    ConflictingTargets(u64),

    #[error("No timeline bucket covers {days} remaining days")]
    UndefinedBucket { days: i64 },

    #[error("Invalid triage date label value: {0:?}")]
    InvalidTriageDate(String),

    #[error("Malformed resolution date comment: {0:?}")]
    MalformedLedgerEntry(String),

    #[error("Invalid repository reference: {0:?}")]
    InvalidRepo(String),
}
