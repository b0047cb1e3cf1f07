use crate::core::models::amino_acid::{AminoAcid, ResidueClass};
use crate::core::models::sequence::Sequence;

// Terminal pKa values (EMBOSS).
const PKA_N_TERMINUS: f64 = 9.69;
const PKA_C_TERMINUS: f64 = 2.34;

const PI_LOWER_BOUND: f64 = 0.0;
const PI_UPPER_BOUND: f64 = 14.0;
const PI_CHARGE_TOLERANCE: f64 = 1e-3;
const PI_MAX_ITERATIONS: usize = 100;

/// Width of the sliding window used to detect charge clusters.
pub const CHARGE_WINDOW: usize = 5;

/// Net charge at pH 7.0 from the per-residue table contributions.
pub fn net_charge(seq: &Sequence) -> f64 {
    seq.iter().map(AminoAcid::charge).sum()
}

/// Absolute net charge per residue.
pub fn charge_density(seq: &Sequence) -> f64 {
    net_charge(seq).abs() / seq.len() as f64
}

/// Fraction of residues carrying a full charge (K, R, D, E).
pub fn charged_fraction(seq: &Sequence) -> f64 {
    seq.fraction_where(|aa| aa.charge().abs() >= 1.0)
}

#[inline]
fn positive_fraction(ph: f64, pka: f64) -> f64 {
    1.0 / (1.0 + 10_f64.powf(ph - pka))
}

#[inline]
fn negative_fraction(ph: f64, pka: f64) -> f64 {
    1.0 / (1.0 + 10_f64.powf(pka - ph))
}

/// Henderson-Hasselbalch net charge at an arbitrary pH, including both termini.
pub fn charge_at_ph(seq: &Sequence, ph: f64) -> f64 {
    let mut charge = positive_fraction(ph, PKA_N_TERMINUS) - negative_fraction(ph, PKA_C_TERMINUS);

    for aa in seq.iter() {
        let Some(pka) = aa.properties().side_chain_pka else {
            continue;
        };
        match aa.class() {
            ResidueClass::PositivelyCharged => charge += positive_fraction(ph, pka),
            _ => charge -= negative_fraction(ph, pka),
        }
    }
    charge
}

/// Isoelectric point by bisection on [`charge_at_ph`].
pub fn isoelectric_point(seq: &Sequence) -> f64 {
    let mut lo = PI_LOWER_BOUND;
    let mut hi = PI_UPPER_BOUND;

    for _ in 0..PI_MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let charge = charge_at_ph(seq, mid);
        if charge.abs() < PI_CHARGE_TOLERANCE {
            return mid;
        }
        if charge > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// How evenly charge is spread along the chain, in `[0, 1]`.
///
/// Computed as one minus the largest absolute mean charge found in any
/// window of [`CHARGE_WINDOW`] residues. Sequences shorter than the window
/// are treated as a single window.
pub fn charge_uniformity(seq: &Sequence) -> f64 {
    let charges: Vec<f64> = seq.iter().map(AminoAcid::charge).collect();
    let window = CHARGE_WINDOW.min(charges.len());
    let worst = charges
        .windows(window)
        .map(|w| (w.iter().sum::<f64>() / window as f64).abs())
        .fold(0.0_f64, f64::max);
    (1.0 - worst).clamp(0.0, 1.0)
}
