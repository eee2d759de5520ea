//! Two-tier price extraction: a deterministic fast path and a delegated
//! semantic path, coordinated by a confidence predicate.

pub mod coordinator;
pub mod fast;
pub mod semantic;

pub use coordinator::ExtractionOutcome;
pub use fast::FastOutcome;
pub use semantic::SemanticOutcome;
