use crate::results::{AggregateResult, PartialResult};

/// Merges partial results in the order given.
///
/// The set of (keyword, file) pairs in the output does not depend on that order; only the
/// order of files listed under a keyword does.
pub fn aggregate<I>(partials: I) -> AggregateResult
where
    I: IntoIterator<Item = PartialResult>,
{
    partials
        .into_iter()
        .fold(AggregateResult::new(), |mut merged, partial| {
            merged.merge(partial);
            merged
        })
}
