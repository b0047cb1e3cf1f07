use crate::core::models::amino_acid::AminoAcid;
use crate::core::models::sequence::Sequence;
use nalgebra::Vector2;

/// Angular step between consecutive residues on an ideal alpha helix.
pub const HELIX_ANGLE_DEGREES: f64 = 100.0;

/// Largest magnitude on the Kyte-Doolittle scale, used to normalize moments.
pub const KYTE_DOOLITTLE_MAX: f64 = 4.5;

/// Grand average of hydropathy (GRAVY) on the Kyte-Doolittle scale.
#[inline]
pub fn mean_hydrophobicity(seq: &Sequence) -> f64 {
    seq.iter().map(AminoAcid::hydrophobicity).sum::<f64>() / seq.len() as f64
}

pub fn hydrophobic_fraction(seq: &Sequence) -> f64 {
    seq.fraction_where(AminoAcid::is_hydrophobic)
}

/// Eisenberg hydrophobic moment per residue.
///
/// Each residue contributes a vector of length equal to its hydropathy,
/// rotated by `angle_degrees` relative to its predecessor. The magnitude of
/// the resultant, divided by the sequence length, measures how strongly the
/// hydrophobic residues segregate onto one face of the projected structure.
pub fn hydrophobic_moment(seq: &Sequence, angle_degrees: f64) -> f64 {
    let step = angle_degrees.to_radians();
    let resultant = seq
        .iter()
        .enumerate()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, (i, aa)| {
            let theta = step * i as f64;
            acc + Vector2::new(theta.cos(), theta.sin()) * aa.hydrophobicity()
        });
    resultant.norm() / seq.len() as f64
}

/// Helical hydrophobic moment scaled into `[0, 1]`.
pub fn normalized_helical_moment(seq: &Sequence) -> f64 {
    (hydrophobic_moment(seq, HELIX_ANGLE_DEGREES) / KYTE_DOOLITTLE_MAX).clamp(0.0, 1.0)
}

/// Maps GRAVY from `[-4.5, 4.5]` onto a hydrophilicity score in `[0, 1]`.
pub fn hydrophilicity(seq: &Sequence) -> f64 {
    ((KYTE_DOOLITTLE_MAX - mean_hydrophobicity(seq)) / (2.0 * KYTE_DOOLITTLE_MAX)).clamp(0.0, 1.0)
}
