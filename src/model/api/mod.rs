//! API-compatible types.
//!
//! The types in this module are what the HTTP layer and the verification tool
//! exchange: tallies always travel next to the candidate they belong to.

mod ballot;
mod candidate;
mod pagination;
mod results;

pub use ballot::{BallotRequest, CastReceipt, ValidationReport};
pub use candidate::CandidateDesc;
pub use pagination::{Paginated, PaginationRequest, PaginationResult};
pub use results::{BallotDump, CategoryResults, ResultsSummary, VerificationError};
