//! hcsolver core library.
//!
//! Agglomerative hierarchical clustering over labeled points. A
//! [`Clusterer`] seeds one singleton cluster per point, builds a
//! [`DistanceMatrix`] once, and merges the pair of clusters selected by the
//! [`LinkageSelector`] until the partition reaches the requested depth.
//!
//! The engine is single-threaded and deterministic for a given point order.
//! Pairs at equal distance are merged in matrix iteration order, which follows
//! point insertion order.

mod builder;
mod clusterer;
mod distance;
mod error;
mod linkage;
mod matrix;
mod observer;
mod points;
mod result;
mod state;

pub use crate::{
    builder::ClustererBuilder,
    clusterer::Clusterer,
    distance::{
        Coordinates, Distance, DistanceError, DistanceMetric, Operand, manhattan_distance,
        squared_euclidean_distance,
    },
    error::{
        ClusterStateError, ClusterStateErrorCode, ClusteringError, ClusteringErrorCode,
        PointSetError, PointSetErrorCode, Result,
    },
    linkage::{Linkage, LinkageSelector, MergeCandidate},
    matrix::{DistanceMatrix, PairDistance},
    observer::{MergeObserver, MergeStep, NoopObserver, TraceEntry, TraceRecorder},
    points::{Point, PointSet},
    result::{ClusterId, ClusterSnapshot, ClusteringOutcome, Termination},
    state::ClusterState,
};
