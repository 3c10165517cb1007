use std::collections::BTreeSet;

use crate::model::Target;

/// Per-slot set differences after matching observed clusters against
/// declared ones.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClusterDiff {
    pub left_only: Vec<Target>,
    pub right_only: Vec<Target>,
}

/// Above this size the factorial search is replaced with the assignment
/// algorithm; both optimize the same objective.
const EXHAUSTIVE_SEARCH_LIMIT: usize = 8;

/// Match the clusters of `lhs` against those of `rhs` with the permutation of
/// `max(|lhs|, |rhs|)` slots that maximizes the summed pairwise intersection
/// sizes, a slot missing on either side contributing zero. Returns one
/// difference pair per matched slot.
#[must_use]
pub fn cluster_diff(lhs: &[BTreeSet<Target>], rhs: &[BTreeSet<Target>]) -> Vec<ClusterDiff> {
    let size = lhs.len().max(rhs.len());
    if size == 0 {
        return Vec::new();
    }

    let scores: Vec<Vec<usize>> = (0..size)
        .map(|i| {
            (0..size)
                .map(|j| intersection_size(lhs.get(i), rhs.get(j)))
                .collect()
        })
        .collect();

    let permutation = if size <= EXHAUSTIVE_SEARCH_LIMIT {
        best_permutation_exhaustive(&scores, size)
    } else {
        best_permutation_assignment(&scores, size)
    };

    (0..size)
        .map(|i| single_diff(lhs.get(i), rhs.get(permutation[i])))
        .collect()
}

fn intersection_size(lhs: Option<&BTreeSet<Target>>, rhs: Option<&BTreeSet<Target>>) -> usize {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs.intersection(rhs).count(),
        _ => 0,
    }
}

fn single_diff(lhs: Option<&BTreeSet<Target>>, rhs: Option<&BTreeSet<Target>>) -> ClusterDiff {
    match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => ClusterDiff {
            left_only: lhs.difference(rhs).cloned().collect(),
            right_only: rhs.difference(lhs).cloned().collect(),
        },
        (Some(lhs), None) => ClusterDiff {
            left_only: lhs.iter().cloned().collect(),
            right_only: Vec::new(),
        },
        (None, Some(rhs)) => ClusterDiff {
            left_only: Vec::new(),
            right_only: rhs.iter().cloned().collect(),
        },
        (None, None) => ClusterDiff::default(),
    }
}

/// Try every permutation in lexicographic order, keeping the first maximum.
fn best_permutation_exhaustive(scores: &[Vec<usize>], size: usize) -> Vec<usize> {
    let mut best_score = None;
    let mut best = Vec::new();
    let mut current = Vec::with_capacity(size);
    let mut used = vec![false; size];

    fn recurse(
        scores: &[Vec<usize>],
        size: usize,
        current: &mut Vec<usize>,
        used: &mut [bool],
        score: usize,
        best_score: &mut Option<usize>,
        best: &mut Vec<usize>,
    ) {
        if current.len() == size {
            if best_score.is_none_or(|b| score > b) {
                *best_score = Some(score);
                best.clone_from(current);
            }
            return;
        }
        let row = current.len();
        for column in 0..size {
            if used[column] {
                continue;
            }
            used[column] = true;
            current.push(column);
            recurse(
                scores,
                size,
                current,
                used,
                score + scores[row][column],
                best_score,
                best,
            );
            current.pop();
            used[column] = false;
        }
    }

    recurse(
        scores,
        size,
        &mut current,
        &mut used,
        0,
        &mut best_score,
        &mut best,
    );
    best
}

/// Kuhn-Munkres assignment over the negated scores (minimization with
/// potentials, O(n^3)). Returns the column matched to each row.
fn best_permutation_assignment(scores: &[Vec<usize>], size: usize) -> Vec<usize> {
    let inf = i64::MAX / 2;
    let cost = |row: usize, column: usize| -> i64 {
        -i64::try_from(scores[row][column]).unwrap_or(i64::MAX / 4)
    };

    // 1-based arrays; matched_row[j] is the row assigned to column j
    let mut row_potential = vec![0_i64; size + 1];
    let mut column_potential = vec![0_i64; size + 1];
    let mut matched_row = vec![0_usize; size + 1];
    let mut way = vec![0_usize; size + 1];

    for row in 1..=size {
        matched_row[0] = row;
        let mut j0 = 0_usize;
        let mut min_value = vec![inf; size + 1];
        let mut used = vec![false; size + 1];

        loop {
            used[j0] = true;
            let i0 = matched_row[j0];
            let mut delta = inf;
            let mut j1 = 0;
            for j in 1..=size {
                if used[j] {
                    continue;
                }
                let current = cost(i0 - 1, j - 1) - row_potential[i0] - column_potential[j];
                if current < min_value[j] {
                    min_value[j] = current;
                    way[j] = j0;
                }
                if min_value[j] < delta {
                    delta = min_value[j];
                    j1 = j;
                }
            }
            for j in 0..=size {
                if used[j] {
                    row_potential[matched_row[j]] += delta;
                    column_potential[j] -= delta;
                } else {
                    min_value[j] -= delta;
                }
            }
            j0 = j1;
            if matched_row[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            matched_row[j0] = matched_row[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut permutation = vec![0_usize; size];
    for column in 1..=size {
        if matched_row[column] != 0 {
            permutation[matched_row[column] - 1] = column - 1;
        }
    }
    permutation
}

#[cfg(test)]
#[path = "cluster_diff_tests.rs"]
mod tests;
