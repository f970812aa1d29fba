use tracing::info;

use crate::process::dataset::Dataset;
use crate::process::header::HeaderClassifier;
use crate::schema::RecordKind;

/// Merge the Lista A and Lista B datasets of one record kind.
///
/// An empty side yields the other side unchanged. Otherwise a header-like
/// first record of `b` is dropped, `b`'s records follow `a`'s, ids are
/// renumbered and `a`'s header is kept.
pub fn combine(
    mut a: Dataset,
    mut b: Dataset,
    kind: RecordKind,
    classifier: &HeaderClassifier,
) -> Dataset {
    debug_assert_eq!(a.kind(), kind);
    debug_assert_eq!(b.kind(), kind);

    if a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }

    if b.drop_leading_header(classifier) {
        info!(kind = %kind, "dropped duplicated header from Lista B before combining");
    }
    a.append(b);
    a
}
