//! Pareto analysis over the three objectives.
//!
//! Only the economic, social and environmental scores take part in
//! dominance; the weighted score is a display aggregate.
//!
//! # Reference
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//! Algorithm: NSGA-II", crowding distance in Sec. III-B

use std::borrow::Borrow;
use std::collections::HashMap;

use crate::models::{Scores, Solution};

/// Objective accessors, in a fixed order.
const OBJECTIVES: [fn(&Scores) -> f64; 3] = [
    |s: &Scores| s.economic,
    |s: &Scores| s.social,
    |s: &Scores| s.environmental,
];

/// Whether `a` Pareto-dominates `b` (maximization).
///
/// `a` must be at least as good in every objective and strictly better
/// in one. Equal score vectors dominate neither way.
pub fn dominates(a: &Scores, b: &Scores) -> bool {
    let mut strictly_better = false;
    for objective in OBJECTIVES {
        let (va, vb) = (objective(a), objective(b));
        if va < vb {
            return false;
        }
        if va > vb {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Valid solutions not dominated by any other valid solution.
///
/// O(n²) pairwise check; input order is preserved.
pub fn pareto_front(solutions: &[Solution]) -> Vec<&Solution> {
    let valid: Vec<&Solution> = solutions.iter().filter(|s| s.is_valid).collect();
    valid
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !valid
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && dominates(&other.scores, &candidate.scores))
        })
        .map(|(_, s)| *s)
        .collect()
}

/// NSGA-II crowding distance per member, keyed by canonical hash.
///
/// Fronts of two or fewer members get infinite distance throughout.
/// Objectives are ordered with `f64::total_cmp`.
/// Per objective the two extremes are infinite and interior members add
/// their normalized neighbour gap. An objective with zero range adds
/// nothing to interior members.
pub fn crowding_distance<S: Borrow<Solution>>(front: &[S]) -> HashMap<String, f64> {
    let hashes: Vec<String> = front.iter().map(|s| s.borrow().canonical_hash()).collect();
    let n = front.len();
    if n <= 2 {
        return hashes.into_iter().map(|h| (h, f64::INFINITY)).collect();
    }

    let mut distance = vec![0.0_f64; n];
    for objective in OBJECTIVES {
        let value = |i: usize| objective(&front[i].borrow().scores);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        let (first, last) = (order[0], order[n - 1]);
        distance[first] = f64::INFINITY;
        distance[last] = f64::INFINITY;

        // NaN sorts to an end, so a NaN score only ever voids the range
        let range = value(last) - value(first);
        if !(range.is_finite() && range > 0.0) {
            continue;
        }
        for w in order.windows(3) {
            distance[w[1]] += (value(w[2]) - value(w[0])) / range;
        }
    }

    hashes.into_iter().zip(distance).collect()
}

/// Picks the `k` most spread-out members of a front.
///
/// Members are ranked by crowding distance (largest first), ties broken
/// by canonical hash. Returns the whole front, in that order, when
/// `k >= front.len()`.
pub fn select_diverse<S: Borrow<Solution>>(front: &[S], k: usize) -> Vec<&Solution> {
    let distances = crowding_distance(front);
    let mut ranked: Vec<(&Solution, String)> = front
        .iter()
        .map(|s| (s.borrow(), s.borrow().canonical_hash()))
        .collect();
    ranked.sort_by(|(_, ha), (_, hb)| {
        let da = distances.get(ha).copied().unwrap_or(0.0);
        let db = distances.get(hb).copied().unwrap_or(0.0);
        db.total_cmp(&da).then_with(|| ha.cmp(hb))
    });
    ranked.into_iter().take(k).map(|(s, _)| s).collect()
}
