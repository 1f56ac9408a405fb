//! Removal of redundant instants.
//!
//! For three consecutive instants `v1@t1, v2@t2, v3@t3` the middle one is
//! redundant when the interpolation already reproduces it: a flat Step run
//! (`v1 == v2`), a flat triple, or (Linear) `v2` collinear with `v1` and
//! `v3` at the time ratio `(t2 - t1) / (t3 - t1)`.

use super::Sequence;
use crate::compute::segment::collinear_instants;
use crate::types::Interpolation;
use tseq_types::Instant;

/// Whether `inst2` may be dropped from `inst1, inst2, inst3`.
pub(crate) fn is_redundant(inst1: &Instant, inst2: &Instant, inst3: &Instant, interp: Interpolation) -> bool {
    let flat = inst1.value == inst2.value;
    if !interp.is_linear() {
        return flat;
    }
    (flat && inst2.value == inst3.value) || collinear_instants(inst1, inst2, inst3)
}

/// Drop the redundant instants of a run in one left-to-right pass.
///
/// The first and last instants are always kept.
///
/// # Examples
///
/// ```
/// use tseq::Interpolation;
/// use tseq::sequence::normalize::normalize_instants;
/// use tseq_types::Instant;
///
/// let run = vec![Instant::new(1, 1), Instant::new(1, 2), Instant::new(2, 3)];
/// let normal = normalize_instants(run, Interpolation::Step);
/// assert_eq!(normal, vec![Instant::new(1, 1), Instant::new(2, 3)]);
/// ```
pub fn normalize_instants(instants: Vec<Instant>, interp: Interpolation) -> Vec<Instant> {
    if instants.len() < 3 {
        return instants;
    }
    let mut result: Vec<Instant> = Vec::with_capacity(instants.len());
    let mut iter = instants.into_iter();
    let (Some(first), Some(mut pending)) = (iter.next(), iter.next()) else {
        return result;
    };
    result.push(first);
    for inst in iter {
        let redundant = result
            .last()
            .is_some_and(|kept| is_redundant(kept, &pending, &inst, interp));
        if redundant {
            pending = inst;
        } else {
            result.push(std::mem::replace(&mut pending, inst));
        }
    }
    result.push(pending);
    result
}

/// Fuse consecutive sequences across their shared bound where possible.
///
/// Sequences must be sorted and either disjoint or sharing exactly their
/// touching instant. Two sequences are adjacent when the first ends where
/// the second starts and at least one of them includes that instant.
pub fn normalize_sequences(sequences: Vec<Sequence>) -> Vec<Sequence> {
    let mut result: Vec<Sequence> = Vec::with_capacity(sequences.len());
    let mut iter = sequences.into_iter();
    let Some(mut current) = iter.next() else {
        return result;
    };
    for next in iter {
        match fuse(&current, &next) {
            Some(joined) => {
                log::debug!(
                    "fused sequences at {} into {} instants",
                    next.period.lower,
                    joined.len()
                );
                current = joined;
            }
            None => result.push(std::mem::replace(&mut current, next)),
        }
    }
    result.push(current);
    result
}

fn fuse(seq1: &Sequence, seq2: &Sequence) -> Option<Sequence> {
    let adjacent = seq1.period.upper == seq2.period.lower
        && (seq1.period.upper_inc || seq2.period.lower_inc);
    if !adjacent {
        return None;
    }
    let linear = seq1.interp.is_linear();
    let (n1, n2) = (seq1.instants.len(), seq2.instants.len());
    let last1 = &seq1.instants[n1 - 1];
    let first1 = &seq2.instants[0];

    if n1 > 1 && n2 > 1 {
        let last2 = &seq1.instants[n1 - 2];
        let first2 = &seq2.instants[1];
        let seam_equal = last1.value == first1.value;
        let redundant_seam = (!linear && last2.value == last1.value && seam_equal)
            || (last2.value == last1.value && seam_equal && first1.value == first2.value)
            || (seam_equal && collinear_instants(last2, first1, first2));
        if redundant_seam {
            return Some(seq1.join_unchecked(seq2, true, true));
        }
    }
    if !linear && !seq1.period.upper_inc {
        // The closing instant of an open Step sequence only repeats the held value
        return Some(seq1.join_unchecked(seq2, true, false));
    }
    if last1.value == first1.value {
        return Some(seq1.join_unchecked(seq2, false, true));
    }
    None
}
