//! Error classification: which failures are retried and which abort.
//!
//! An [`ErrorKind`] names a family of errors. A session keeps two ordered,
//! duplicate-free [`KindSet`]s:
//!
//! - the **retry** set: when non-empty, only matching errors are retried
//! - the **abort** set: matching errors surface immediately, whatever the
//!   retry set says
//!
//! # Matching
//!
//! [`ErrorKind::of::<T>()`](ErrorKind::of) matches an error that *is* a `T`
//! or that carries a `T` anywhere in its [`source`](Error::source) chain, so
//! an application error wrapping an `io::Error` matches `ErrorKind::of::<io::Error>()`.
//! [`ErrorKind::matching`] matches with an arbitrary predicate.
//!
//! # Examples
//!
//! ```rust
//! use rebound_core::classify::{ErrorKind, KindSet, should_retry};
//! use std::io;
//!
//! let mut retry_on = KindSet::new();
//! retry_on.insert(ErrorKind::of::<io::Error>());
//!
//! let mut abort_on = KindSet::new();
//! abort_on.insert(ErrorKind::matching("permission denied", |err| {
//!     err.downcast_ref::<io::Error>()
//!         .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
//! }));
//!
//! let transient = io::Error::new(io::ErrorKind::TimedOut, "slow");
//! let fatal = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
//!
//! assert!(should_retry(&transient, &retry_on, &abort_on));
//! assert!(!should_retry(&fatal, &retry_on, &abort_on));
//! ```

use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync;

#[derive(Clone)]
enum Matcher {
    Type(fn(&(dyn Error + 'static)) -> bool),
    Predicate(Arc<Predicate>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Identity {
    Type(TypeId),
    Named(Cow<'static, str>),
}

/// A family of errors the classifier can recognise.
///
/// Two kinds are equal when they have the same identity: the same type for
/// [`ErrorKind::of`], the same name for [`ErrorKind::matching`].
#[derive(Clone)]
pub struct ErrorKind {
    identity: Identity,
    name: Cow<'static, str>,
    matcher: Matcher,
}

impl ErrorKind {
    /// Errors of type `T`, or errors whose source chain contains a `T`.
    pub fn of<T: Error + 'static>() -> Self {
        Self {
            identity: Identity::Type(TypeId::of::<T>()),
            name: Cow::Borrowed(type_name::<T>()),
            matcher: Matcher::Type(chain_contains::<T>),
        }
    }

    /// Errors accepted by `predicate`. The name identifies the kind.
    pub fn matching<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            identity: Identity::Named(name.clone()),
            name,
            matcher: Matcher::Predicate(Arc::new(predicate)),
        }
    }

    /// Human-readable name: the type name or the name given to [`matching`](Self::matching).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `error` belongs to this kind.
    pub fn matches(&self, error: &(dyn Error + 'static)) -> bool {
        match &self.matcher {
            Matcher::Type(matches) => matches(error),
            Matcher::Predicate(predicate) => predicate(error),
        }
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for ErrorKind {}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorKind").field(&self.name).finish()
    }
}

fn chain_contains<T: Error + 'static>(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if err.is::<T>() {
            return true;
        }
        current = err.source();
    }
    false
}

/// Ordered set of error kinds without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindSet {
    kinds: Vec<ErrorKind>,
}

impl KindSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `kind` unless an equal kind is already present.
    ///
    /// Returns `true` when the kind was added.
    pub fn insert(&mut self, kind: ErrorKind) -> bool {
        if self.kinds.contains(&kind) {
            return false;
        }
        self.kinds.push(kind);
        true
    }

    /// Remove `kind`. Returns `true` when it was present.
    pub fn remove(&mut self, kind: &ErrorKind) -> bool {
        let before = self.kinds.len();
        self.kinds.retain(|k| k != kind);
        self.kinds.len() != before
    }

    /// Remove every kind.
    pub fn clear(&mut self) {
        self.kinds.clear();
    }

    /// Whether an equal kind is present.
    pub fn contains(&self, kind: &ErrorKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Whether any kind in the set matches `error`.
    pub fn matches(&self, error: &(dyn Error + 'static)) -> bool {
        self.kinds.iter().any(|kind| kind.matches(error))
    }

    /// Number of kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Kinds in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorKind> {
        self.kinds.iter()
    }
}

impl FromIterator<ErrorKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        let mut set = Self::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl Extend<ErrorKind> for KindSet {
    fn extend<I: IntoIterator<Item = ErrorKind>>(&mut self, iter: I) {
        for kind in iter {
            self.insert(kind);
        }
    }
}

/// Decide whether a caught error is retried.
///
/// Rules, in priority order:
/// 1. an error matching the abort set is never retried
/// 2. an empty retry set retries everything
/// 3. otherwise only errors matching the retry set are retried
pub fn should_retry(error: &(dyn Error + 'static), retry_on: &KindSet, abort_on: &KindSet) -> bool {
    if abort_on.matches(error) {
        return false;
    }
    retry_on.is_empty() || retry_on.matches(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct RequestError {
        #[source]
        cause: io::Error,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("cancelled")]
    struct Cancelled;

    fn set(kinds: impl IntoIterator<Item = ErrorKind>) -> KindSet {
        kinds.into_iter().collect()
    }

    #[test]
    fn test_empty_sets_retry_everything() {
        assert!(should_retry(&Cancelled, &KindSet::new(), &KindSet::new()));
    }

    #[test]
    fn test_retry_set_restricts_retries() {
        let retry_on = set([ErrorKind::of::<io::Error>()]);

        assert!(should_retry(&io::Error::other("x"), &retry_on, &KindSet::new()));
        assert!(!should_retry(&Cancelled, &retry_on, &KindSet::new()));
    }

    #[test]
    fn test_abort_set_takes_precedence() {
        let retry_on = set([ErrorKind::of::<Cancelled>()]);
        let abort_on = set([ErrorKind::of::<Cancelled>()]);

        assert!(!should_retry(&Cancelled, &retry_on, &abort_on));
        assert!(!should_retry(&Cancelled, &KindSet::new(), &abort_on));
    }

    #[test]
    fn test_kind_matches_through_source_chain() {
        let err = RequestError {
            cause: io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
        };
        let kind = ErrorKind::of::<io::Error>();

        assert!(kind.matches(&err));
        assert!(ErrorKind::of::<RequestError>().matches(&err));
        assert!(!ErrorKind::of::<Cancelled>().matches(&err));
    }

    #[test]
    fn test_predicate_kind() {
        let timeouts = ErrorKind::matching("timeout", |err| {
            err.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut)
        });

        assert_eq!(timeouts.name(), "timeout");
        assert!(timeouts.matches(&io::Error::new(io::ErrorKind::TimedOut, "t")));
        assert!(!timeouts.matches(&io::Error::new(io::ErrorKind::NotFound, "n")));
    }

    #[test]
    fn test_set_is_ordered_and_unique() {
        let mut kinds = KindSet::new();

        assert!(kinds.insert(ErrorKind::of::<io::Error>()));
        assert!(kinds.insert(ErrorKind::of::<Cancelled>()));
        assert!(!kinds.insert(ErrorKind::of::<io::Error>()));
        assert!(!kinds.insert(ErrorKind::of::<io::Error>()));

        let names: Vec<_> = kinds.iter().map(ErrorKind::name).collect();
        assert_eq!(names, vec![type_name::<io::Error>(), type_name::<Cancelled>()]);
    }

    #[test]
    fn test_named_kinds_compare_by_name() {
        let mut kinds = KindSet::new();

        assert!(kinds.insert(ErrorKind::matching("flaky", |_| true)));
        assert!(!kinds.insert(ErrorKind::matching("flaky", |_| false)));
        assert!(kinds.contains(&ErrorKind::matching("flaky", |_| false)));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut kinds = set([ErrorKind::of::<io::Error>(), ErrorKind::of::<Cancelled>()]);

        assert!(kinds.remove(&ErrorKind::of::<io::Error>()));
        assert!(!kinds.remove(&ErrorKind::of::<io::Error>()));
        assert_eq!(kinds.len(), 1);

        kinds.clear();
        assert!(kinds.is_empty());
    }
}
