//! Cluster-count selection: sweep candidate ks, score each fit by inertia
//! (elbow diagnostics) and silhouette (selection), pick the best.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::kmeans;
use crate::matrix::ImputedMatrix;

/// One point of the diagnostic series handed to the display layer.
#[derive(Debug, Clone, Serialize)]
pub struct KDiagnostics {
    pub k: usize,
    pub inertia: f64,
    pub silhouette: f64,
}

#[derive(Debug, Clone)]
pub struct ClusterSelection {
    pub chosen_k: usize,
    /// Full per-k series, ascending k.
    pub diagnostics: Vec<KDiagnostics>,
    /// Canonical cluster id per matrix row: ids are relabeled by first
    /// appearance in row order, so identical partitions compare equal across
    /// runs regardless of internal label permutation.
    pub assignment: Vec<usize>,
}

/// Sweep k in `k_min..=k_max` (clamped to leave silhouette defined), select
/// the k with the highest silhouette, smallest k winning ties.
///
/// The per-k fits run in parallel; each derives its RNG purely from
/// (seed, k), so the result is identical to a sequential sweep.
pub fn sweep(
    matrix: &ImputedMatrix,
    k_min: usize,
    k_max: usize,
    seed: u64,
) -> Result<ClusterSelection> {
    let n = matrix.n_rows();
    if k_min < 2 {
        return Err(AnalysisError::DegenerateInput(format!(
            "candidate range must start at k >= 2, got {k_min}"
        )));
    }
    if n < k_min {
        return Err(AnalysisError::DegenerateInput(format!(
            "{n} countries cannot form {k_min} clusters"
        )));
    }
    if (1..n).all(|i| matrix.row(i) == matrix.row(0)) {
        return Err(AnalysisError::DegenerateInput(
            "matrix has a single distinct row, nothing to cluster".to_string(),
        ));
    }

    // silhouette needs at least one cluster with >= 2 members, so k stops at
    // n - 1
    let upper = k_max.min(n - 1);
    if upper < k_min {
        return Err(AnalysisError::DegenerateInput(format!(
            "no viable candidate k in {k_min}..={k_max} for {n} countries"
        )));
    }
    let candidates: Vec<usize> = (k_min..=upper).collect();
    debug!(
        "Sweep starting - candidates={}..={}, seed={}",
        k_min, upper, seed
    );

    let start = std::time::Instant::now();
    let fits: Vec<(KDiagnostics, Vec<usize>)> = candidates
        .par_iter()
        .map(|&k| {
            let fit = kmeans::fit(matrix, k, seed);
            let silhouette = kmeans::silhouette(matrix, &fit.labels, k);
            (
                KDiagnostics {
                    k,
                    inertia: fit.inertia,
                    silhouette,
                },
                fit.labels,
            )
        })
        .collect();

    // max silhouette; strict > keeps the first (smallest) k on ties
    let mut best_idx = 0usize;
    for (i, (diag, _)) in fits.iter().enumerate() {
        if diag.silhouette > fits[best_idx].0.silhouette {
            best_idx = i;
        }
    }
    let chosen_k = fits[best_idx].0.k;
    let assignment = canonicalize(&fits[best_idx].1);
    let diagnostics = fits.into_iter().map(|(d, _)| d).collect();

    info!(
        "Sweep completed - duration={:.2}s, chosen_k={}, candidates={}",
        start.elapsed().as_secs_f32(),
        chosen_k,
        candidates.len()
    );
    Ok(ClusterSelection {
        chosen_k,
        diagnostics,
        assignment,
    })
}

/// Relabel cluster ids by first appearance in row order.
fn canonicalize(labels: &[usize]) -> Vec<usize> {
    let mut mapping: Vec<Option<usize>> = vec![None; labels.len()];
    let mut next = 0usize;
    labels
        .iter()
        .map(|&raw| {
            *mapping[raw].get_or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect()
}
