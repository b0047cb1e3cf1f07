use crate::core::models::amino_acid::{AminoAcid, ResidueClass, StabilityClass, StructureTendency};
use crate::core::models::sequence::Sequence;

const WATER_MASS: f64 = 18.01528;

const INSTABILITY_BASELINE: f64 = 50.0;
const INSTABILITY_STEP: f64 = 2.0;

/// Sequences scoring below this instability index are considered stable.
pub const INSTABILITY_THRESHOLD: f64 = 40.0;

/// Average molecular weight of the peptide in Daltons.
pub fn molecular_weight(seq: &Sequence) -> f64 {
    seq.iter()
        .map(|aa| aa.properties().molecular_weight)
        .sum::<f64>()
        + WATER_MASS
}

/// Residue fractions indexed like [`AminoAcid::ALL`].
pub fn composition(seq: &Sequence) -> [f64; 20] {
    let mut counts = [0.0; 20];
    for aa in seq.iter() {
        counts[aa as usize] += 1.0;
    }
    let n = seq.len() as f64;
    counts.map(|c| c / n)
}

pub fn aromaticity(seq: &Sequence) -> f64 {
    seq.fraction_where(|aa| aa.class() == ResidueClass::Aromatic)
}

fn tendency_balance(seq: &Sequence, favoured: StructureTendency) -> f64 {
    let score: i64 = seq
        .iter()
        .map(|aa| match aa.properties().structure {
            t if t == favoured => 1,
            StructureTendency::Breaker => -1,
            _ => 0,
        })
        .sum();
    score as f64 / seq.len() as f64
}

/// Net fraction of helix formers over helix breakers, in `[-1, 1]`.
pub fn helix_propensity(seq: &Sequence) -> f64 {
    tendency_balance(seq, StructureTendency::HelixFormer)
}

/// Net fraction of sheet formers over breakers, in `[-1, 1]`.
pub fn sheet_propensity(seq: &Sequence) -> f64 {
    tendency_balance(seq, StructureTendency::SheetFormer)
}

/// Composition-based instability estimate in `[0, 100]`.
///
/// Starts from a neutral baseline of 50 and moves two points per
/// destabilizing residue up, and two points per stabilizing residue down.
pub fn instability_index(seq: &Sequence) -> f64 {
    let balance: i64 = seq
        .iter()
        .map(|aa| match aa.properties().stability {
            StabilityClass::Destabilizing => 1,
            StabilityClass::Stabilizing => -1,
            StabilityClass::Neutral => 0,
        })
        .sum();
    (INSTABILITY_BASELINE + balance as f64 * INSTABILITY_STEP).clamp(0.0, 100.0)
}

/// Fraction of residues drawn from the rarely tolerated M, C, W set.
pub fn rare_residue_fraction(seq: &Sequence) -> f64 {
    seq.fraction_where(|aa| {
        matches!(
            aa,
            AminoAcid::Methionine | AminoAcid::Cysteine | AminoAcid::Tryptophan
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn seq(s: &str) -> Sequence {
        Sequence::parse(s).unwrap()
    }

    #[test]
    fn molecular_weight_of_glycine_adds_water() {
        assert!((molecular_weight(&seq("G")) - (57.0519 + WATER_MASS)).abs() < TOLERANCE);
    }

    #[test]
    fn composition_fractions_sum_to_one() {
        let c = composition(&seq("ACDEFGHIKLMNPQRSTVWY"));
        assert!((c.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
        assert!(c.iter().all(|&f| (f - 0.05).abs() < TOLERANCE));
    }

    #[test]
    fn composition_of_homopolymer_is_one_hot() {
        let c = composition(&seq("KKKK"));
        assert!((c[AminoAcid::Lysine as usize] - 1.0).abs() < TOLERANCE);
        assert!((c.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn aromaticity_counts_f_w_y() {
        assert!((aromaticity(&seq("FWYA")) - 0.75).abs() < TOLERANCE);
    }

    #[test]
    fn helix_propensity_balances_formers_and_breakers() {
        assert!((helix_propensity(&seq("AELM")) - 1.0).abs() < TOLERANCE);
        assert!((helix_propensity(&seq("PG")) + 1.0).abs() < TOLERANCE);
        assert!(helix_propensity(&seq("AP")).abs() < TOLERANCE);
    }

    #[test]
    fn sheet_propensity_balances_formers_and_breakers() {
        assert!((sheet_propensity(&seq("VIYF")) - 1.0).abs() < TOLERANCE);
        assert!((sheet_propensity(&seq("VG")) - 0.0).abs() < TOLERANCE);
    }

    #[test]
    fn instability_index_moves_from_baseline() {
        assert!((instability_index(&seq("S")) - 50.0).abs() < TOLERANCE);
        assert!((instability_index(&seq("KKK")) - 56.0).abs() < TOLERANCE);
        assert!((instability_index(&seq("AAA")) - 44.0).abs() < TOLERANCE);
    }

    #[test]
    fn instability_index_is_clamped() {
        let long_unstable = "K".repeat(60);
        assert!((instability_index(&seq(&long_unstable)) - 100.0).abs() < TOLERANCE);
        let long_stable = "A".repeat(60);
        assert!(instability_index(&seq(&long_stable)).abs() < TOLERANCE);
    }

    #[test]
    fn rare_residue_fraction_counts_m_c_w() {
        assert!((rare_residue_fraction(&seq("MCWA")) - 0.75).abs() < TOLERANCE);
    }
}
