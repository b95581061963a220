//! Error types for the hcsolver core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{distance::DistanceError, result::ClusterId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while assembling a [`crate::PointSet`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointSetError {
    /// A point was supplied without an identifier.
    #[error("point at position {position} has an empty identifier")]
    EmptyIdentifier {
        /// Zero-based position of the offending point.
        position: usize,
    },
    /// Two points shared the same identifier.
    #[error("point identifier `{id}` appears more than once")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: Arc<str>,
    },
    /// Points must carry at least one coordinate.
    #[error("point `{id}` has no coordinates")]
    ZeroDimension {
        /// Identifier of the point without coordinates.
        id: Arc<str>,
    },
    /// A point's coordinate count differed from the first point's.
    #[error("point `{id}` has {actual} coordinates but {expected} were expected")]
    DimensionMismatch {
        /// Identifier of the offending point.
        id: Arc<str>,
        /// Dimension established by the first point.
        expected: usize,
        /// Dimension of the offending point.
        actual: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("point `{id}` has a non-finite coordinate at index {index}: {value}")]
    NonFinite {
        /// Identifier of the offending point.
        id: Arc<str>,
        /// Index of the offending coordinate.
        index: usize,
        /// The rejected value.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`PointSetError`] variants.
    enum PointSetErrorCode for PointSetError {
        /// A point was supplied without an identifier.
        EmptyIdentifier => EmptyIdentifier { .. } => "POINTS_EMPTY_IDENTIFIER",
        /// Two points shared the same identifier.
        DuplicateIdentifier => DuplicateIdentifier { .. } => "POINTS_DUPLICATE_IDENTIFIER",
        /// Points must carry at least one coordinate.
        ZeroDimension => ZeroDimension { .. } => "POINTS_ZERO_DIMENSION",
        /// A point's coordinate count differed from the first point's.
        DimensionMismatch => DimensionMismatch { .. } => "POINTS_DIMENSION_MISMATCH",
        /// A coordinate was NaN or infinite.
        NonFinite => NonFinite { .. } => "POINTS_NON_FINITE",
    }
}

/// An error produced by [`crate::ClusterState`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ClusterStateError {
    /// The handle does not refer to a cluster in the current partition.
    #[error("cluster {id} is not part of the current partition")]
    UnknownCluster {
        /// The stale or foreign handle.
        id: ClusterId,
    },
    /// No cluster in the current partition carries the requested name.
    #[error("no cluster named `{name}` exists in the current partition")]
    UnknownClusterName {
        /// The requested display name.
        name: String,
    },
    /// A cluster cannot be merged with itself.
    #[error("cannot merge cluster {id} with itself")]
    SelfMerge {
        /// The handle passed on both sides of the merge.
        id: ClusterId,
    },
    /// A point identifier was supplied twice when seeding the state.
    #[error("point identifier `{id}` appears more than once")]
    DuplicatePoint {
        /// The repeated identifier.
        id: Arc<str>,
    },
    /// The partition and the reverse index disagree.
    #[error("cluster state is inconsistent: {reason}")]
    Inconsistent {
        /// Description of the violated invariant.
        reason: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`ClusterStateError`] variants.
    enum ClusterStateErrorCode for ClusterStateError {
        /// The handle does not refer to a cluster in the current partition.
        UnknownCluster => UnknownCluster { .. } => "STATE_UNKNOWN_CLUSTER",
        /// No cluster in the current partition carries the requested name.
        UnknownClusterName => UnknownClusterName { .. } => "STATE_UNKNOWN_CLUSTER_NAME",
        /// A cluster cannot be merged with itself.
        SelfMerge => SelfMerge { .. } => "STATE_SELF_MERGE",
        /// A point identifier was supplied twice when seeding the state.
        DuplicatePoint => DuplicatePoint { .. } => "STATE_DUPLICATE_POINT",
        /// The partition and the reverse index disagree.
        Inconsistent => Inconsistent { .. } => "STATE_INCONSISTENT",
    }
}

/// Error type produced when constructing or running [`crate::Clusterer`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClusteringError {
    /// No linkage rule was configured on the builder.
    #[error("a linkage rule must be configured before clustering")]
    MissingLinkage,
    /// Computing a pairwise distance failed.
    #[error("distance between `{left}` and `{right}` failed: {error}")]
    Distance {
        /// Identifier of the first point of the pair.
        left: Arc<str>,
        /// Identifier of the second point of the pair.
        right: Arc<str>,
        #[source]
        /// Underlying metric failure.
        error: DistanceError,
    },
    /// The distance matrix and the cluster state describe different point sets.
    #[error("distance matrix covers {matrix} points but the cluster state holds {state}")]
    MatrixMismatch {
        /// Number of points covered by the matrix.
        matrix: usize,
        /// Number of points tracked by the state.
        state: usize,
    },
    /// The cluster state's point at `index` is not the matrix's point there.
    #[error("cluster state point `{point}` at index {index} does not match the distance matrix")]
    PointMismatch {
        /// Position in the state's point order.
        index: usize,
        /// Identifier the state holds at that position.
        point: Arc<str>,
    },
    /// A merge was rejected by the cluster state.
    #[error(transparent)]
    State(#[from] ClusterStateError),
}

define_error_codes! {
    /// Stable codes describing [`ClusteringError`] variants.
    enum ClusteringErrorCode for ClusteringError {
        /// No linkage rule was configured on the builder.
        MissingLinkage => MissingLinkage => "HCSOLVER_MISSING_LINKAGE",
        /// Computing a pairwise distance failed.
        DistanceFailure => Distance { .. } => "HCSOLVER_DISTANCE_FAILURE",
        /// The distance matrix and the cluster state describe different point sets.
        MatrixMismatch => MatrixMismatch { .. } => "HCSOLVER_MATRIX_MISMATCH",
        /// The cluster state and the distance matrix order different points.
        PointMismatch => PointMismatch { .. } => "HCSOLVER_POINT_MISMATCH",
        /// A merge was rejected by the cluster state.
        StateFailure => State { .. } => "HCSOLVER_STATE_FAILURE",
    }
}

impl ClusteringError {
    /// Retrieve the inner [`ClusterStateErrorCode`] when the error originated in
    /// the [`crate::ClusterState`].
    #[must_use]
    pub const fn state_code(&self) -> Option<ClusterStateErrorCode> {
        match self {
            Self::State(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ClusteringError>;
