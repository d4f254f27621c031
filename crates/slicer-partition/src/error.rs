//! Internal-only reject reasons.
//!
//! The public edit API returns a plain `bool` ("applied" / "rejected") per
//! the design note that edit rejection carries no diagnostic obligation.
//! This enum exists purely so the trace logging in `editor.rs` can say
//! *why* without the caller ever seeing it, the way the teacher's decoder
//! logs intermediate detail that never crosses its public `Result`.

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum RejectReason
{
    Degenerate,
    OutOfRange,
    Duplicate,
    CapacityReached,
    NoEligibleLeaf,
    UnknownIndex
}
