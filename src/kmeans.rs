//! Seeded k-means over the imputed matrix, plus the silhouette quality
//! metric used by the cluster-count sweep.
//!
//! Determinism is the binding constraint: identical matrix + identical seed
//! must reproduce the identical partition. All randomness flows from one
//! `StdRng` derived from (seed, k), ties in assignment and centroid repair
//! break toward the lowest index, and the restart loop keeps the first fit
//! with strictly lower inertia.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::matrix::ImputedMatrix;

const N_INIT: usize = 10;
const MAX_ITER: usize = 300;

#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster id per matrix row. Labels are arbitrary here; the selector
    /// canonicalizes them before anything downstream sees them.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances.
    pub inertia: f64,
}

fn dist2(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Fit k-means with `N_INIT` k-means++ restarts, keeping the lowest-inertia
/// run. The RNG is derived from (seed, k) so each candidate k is independent
/// of sweep order.
pub fn fit(matrix: &ImputedMatrix, k: usize, seed: u64) -> KMeansFit {
    assert!(k >= 1 && k <= matrix.n_rows(), "k out of range");
    let mut rng = StdRng::seed_from_u64(seed ^ (k as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));

    let mut best: Option<KMeansFit> = None;
    for _ in 0..N_INIT {
        let fit = lloyd(matrix, k, &mut rng);
        let better = best.as_ref().map_or(true, |b| fit.inertia < b.inertia);
        if better {
            best = Some(fit);
        }
    }
    let best = best.unwrap();
    debug!("KMeans fit - k={}, inertia={:.3}", k, best.inertia);
    best
}

fn lloyd(matrix: &ImputedMatrix, k: usize, rng: &mut StdRng) -> KMeansFit {
    let n = matrix.n_rows();
    let dim = matrix.n_cols();
    let mut centroids = init_plusplus(matrix, k, rng);
    let mut labels = vec![0usize; n];

    for _ in 0..MAX_ITER {
        // assignment step; ties go to the lowest centroid index
        let mut changed = false;
        for i in 0..n {
            let row = matrix.row(i);
            let mut best_c = 0usize;
            let mut best_d = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = dist2(row, centroid);
                if d < best_d {
                    best_d = d;
                    best_c = c;
                }
            }
            if labels[i] != best_c {
                labels[i] = best_c;
                changed = true;
            }
        }

        // update step
        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];
        for i in 0..n {
            counts[labels[i]] += 1;
            for (s, v) in sums[labels[i]].iter_mut().zip(matrix.row(i)) {
                *s += v;
            }
        }
        for c in 0..k {
            if counts[c] == 0 {
                // repair an empty cluster with the point farthest from its
                // centroid (lowest index on ties)
                let (far, _) = (0..n)
                    .map(|i| (i, dist2(matrix.row(i), &centroids[labels[i]])))
                    .fold((0, f64::NEG_INFINITY), |acc, (i, d)| {
                        if d > acc.1 {
                            (i, d)
                        } else {
                            acc
                        }
                    });
                centroids[c] = matrix.row(far).to_vec();
                labels[far] = c;
            } else {
                for (j, s) in sums[c].iter().enumerate() {
                    centroids[c][j] = s / counts[c] as f64;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let inertia = (0..n)
        .map(|i| dist2(matrix.row(i), &centroids[labels[i]]))
        .sum();
    KMeansFit { labels, inertia }
}

/// k-means++ seeding: first centroid uniform, the rest weighted by squared
/// distance to the nearest centroid chosen so far.
fn init_plusplus(matrix: &ImputedMatrix, k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = matrix.n_rows();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(matrix.row(rng.gen_range(0..n)).to_vec());

    let mut d2 = vec![0.0f64; n];
    while centroids.len() < k {
        let latest = centroids.last().unwrap();
        for i in 0..n {
            let d = dist2(matrix.row(i), latest);
            if centroids.len() == 1 || d < d2[i] {
                d2[i] = d;
            }
        }
        let total: f64 = d2.iter().sum();
        let pick = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut chosen = n - 1;
            for (i, &w) in d2.iter().enumerate() {
                target -= w;
                if target <= 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // all remaining mass is zero (duplicate rows); any row works
            rng.gen_range(0..n)
        };
        centroids.push(matrix.row(pick).to_vec());
    }
    centroids
}

/// Mean silhouette coefficient of a partition, in [-1, 1]. Points in
/// singleton clusters contribute 0 (their cohesion is undefined).
pub fn silhouette(matrix: &ImputedMatrix, labels: &[usize], k: usize) -> f64 {
    let n = matrix.n_rows();
    debug_assert!(k >= 2 && n >= 2);

    let mut cluster_sizes = vec![0usize; k];
    for &l in labels {
        cluster_sizes[l] += 1;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        if cluster_sizes[own] <= 1 {
            continue; // s(i) = 0
        }
        // mean distance to every cluster
        let mut dist_sums = vec![0.0f64; k];
        for j in 0..n {
            if i == j {
                continue;
            }
            dist_sums[labels[j]] += dist2(matrix.row(i), matrix.row(j)).sqrt();
        }
        let a = dist_sums[own] / (cluster_sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && cluster_sizes[c] > 0)
            .map(|c| dist_sums[c] / cluster_sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::ImputedMatrix;

    fn blob_matrix() -> ImputedMatrix {
        // two tight blobs far apart
        ImputedMatrix::from_rows(
            (0..6).map(|i| format!("C{i}")).collect(),
            vec!["AIRA_1".to_string(), "AIRA_2".to_string()],
            vec![
                vec![0.0, 0.1],
                vec![0.1, 0.0],
                vec![0.0, 0.0],
                vec![10.0, 10.1],
                vec![10.1, 10.0],
                vec![10.0, 10.0],
            ],
        )
    }

    #[test]
    fn recovers_separated_blobs() {
        let fit = fit(&blob_matrix(), 2, 42);
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[1], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_eq!(fit.labels[4], fit.labels[5]);
        assert_ne!(fit.labels[0], fit.labels[3]);
    }

    #[test]
    fn identical_seed_reproduces_identical_partition() {
        let m = blob_matrix();
        let a = fit(&m, 3, 42);
        let b = fit(&m, 3, 42);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn silhouette_high_for_clean_split() {
        let m = blob_matrix();
        let f = fit(&m, 2, 42);
        let s = silhouette(&m, &f.labels, 2);
        assert!(s > 0.9, "expected near-perfect separation, got {s}");
        assert!(s <= 1.0);
    }

    #[test]
    fn silhouette_handles_singleton_clusters() {
        let m = ImputedMatrix::from_rows(
            vec!["A".into(), "B".into(), "C".into()],
            vec!["AIRA_1".to_string()],
            vec![vec![0.0], vec![0.1], vec![9.0]],
        );
        let labels = vec![0, 0, 1];
        let s = silhouette(&m, &labels, 2);
        assert!((-1.0..=1.0).contains(&s));
    }

    #[test]
    fn duplicate_rows_do_not_break_the_fit() {
        let m = ImputedMatrix::from_rows(
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec!["AIRA_1".to_string()],
            vec![vec![1.0], vec![1.0], vec![1.0], vec![5.0]],
        );
        let f = fit(&m, 2, 7);
        assert_eq!(f.labels.len(), 4);
        assert!(f.inertia.is_finite());
    }
}
