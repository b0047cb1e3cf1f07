use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // A
    Glycine,    // G
    Isoleucine, // I
    Leucine,    // L
    Proline,    // P
    Valine,     // V
    Methionine, // M

    // --- Aromatic ---
    Phenylalanine, // F
    Tryptophan,    // W
    Tyrosine,      // Y

    // --- Polar, Uncharged ---
    Asparagine, // N
    Cysteine,   // C
    Glutamine,  // Q
    Serine,     // S
    Threonine,  // T

    // --- Positively Charged (Basic) ---
    Arginine,  // R
    Histidine, // H
    Lysine,    // K

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // D
    GlutamicAcid, // E
}

/// Coarse physicochemical class of a residue side chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidueClass {
    Nonpolar,
    Aromatic,
    Polar,
    PositivelyCharged,
    NegativelyCharged,
}

/// Intrinsic secondary-structure preference used by the propensity descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureTendency {
    HelixFormer,
    SheetFormer,
    Breaker,
    Indifferent,
}

/// Contribution of a residue to the composition-based instability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StabilityClass {
    Stabilizing,
    Destabilizing,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AminoAcidProperties {
    pub code: char,
    pub three_letter: &'static str,
    /// Kyte-Doolittle (1982) hydropathy.
    pub hydrophobicity: f64,
    /// Net side-chain charge at pH 7.0, in elementary charges.
    pub charge: f64,
    /// Natural occurrence frequency, used as a sampling weight.
    pub abundance: f64,
    /// Average residue mass in Daltons (peptide-bonded, water removed).
    pub molecular_weight: f64,
    pub class: ResidueClass,
    pub hydrophobic: bool,
    pub structure: StructureTendency,
    pub stability: StabilityClass,
    /// Side-chain pKa (EMBOSS) for ionizable residues.
    pub side_chain_pka: Option<f64>,
}

macro_rules! aa {
    ($code:literal, $three:literal, $kd:expr, $q:expr, $w:expr, $mw:expr, $class:ident, $hyd:expr, $ss:ident, $stab:ident, $pka:expr) => {
        AminoAcidProperties {
            code: $code,
            three_letter: $three,
            hydrophobicity: $kd,
            charge: $q,
            abundance: $w,
            molecular_weight: $mw,
            class: ResidueClass::$class,
            hydrophobic: $hyd,
            structure: StructureTendency::$ss,
            stability: StabilityClass::$stab,
            side_chain_pka: $pka,
        }
    };
}

// Indexed by `AminoAcid as usize`; order must follow the enum declaration.
#[rustfmt::skip]
static PROPERTY_TABLE: [AminoAcidProperties; 20] = [
    aa!('A', "ALA",  1.8,  0.0, 0.087,  71.0788, Nonpolar,          true,  HelixFormer, Stabilizing,   None),
    aa!('G', "GLY", -0.4,  0.0, 0.074,  57.0519, Nonpolar,          false, Breaker,     Stabilizing,   None),
    aa!('I', "ILE",  4.5,  0.0, 0.052, 113.1594, Nonpolar,          true,  SheetFormer, Stabilizing,   None),
    aa!('L', "LEU",  3.8,  0.0, 0.095, 113.1594, Nonpolar,          true,  HelixFormer, Stabilizing,   None),
    aa!('P', "PRO", -1.6,  0.0, 0.038,  97.1167, Nonpolar,          false, Breaker,     Neutral,       None),
    aa!('V', "VAL",  4.2,  0.0, 0.067,  99.1326, Nonpolar,          true,  SheetFormer, Stabilizing,   None),
    aa!('M', "MET",  1.9,  0.0, 0.024, 131.1926, Nonpolar,          true,  HelixFormer, Stabilizing,   None),
    aa!('F', "PHE",  2.8,  0.0, 0.037, 147.1766, Aromatic,          true,  SheetFormer, Stabilizing,   None),
    aa!('W', "TRP", -0.9,  0.0, 0.010, 186.2132, Aromatic,          true,  Indifferent, Stabilizing,   None),
    aa!('Y', "TYR", -1.3,  0.0, 0.012, 163.1760, Aromatic,          true,  SheetFormer, Stabilizing,   Some(10.07)),
    aa!('N', "ASN", -3.5,  0.0, 0.039, 114.1038, Polar,             false, Indifferent, Destabilizing, None),
    aa!('C', "CYS",  2.5,  0.0, 0.019, 103.1388, Polar,             false, Indifferent, Stabilizing,   Some(8.18)),
    aa!('Q', "GLN", -3.5,  0.0, 0.036, 128.1307, Polar,             false, Indifferent, Destabilizing, None),
    aa!('S', "SER", -0.8,  0.0, 0.056,  87.0782, Polar,             false, Indifferent, Neutral,       None),
    aa!('T', "THR", -0.7,  0.0, 0.051, 101.1051, Polar,             false, Indifferent, Stabilizing,   None),
    aa!('R', "ARG", -4.5,  1.0, 0.042, 156.1875, PositivelyCharged, false, Indifferent, Destabilizing, Some(12.48)),
    aa!('H', "HIS", -3.2,  0.1, 0.015, 137.1411, PositivelyCharged, false, Indifferent, Stabilizing,   Some(6.00)),
    aa!('K', "LYS", -3.9,  1.0, 0.048, 128.1741, PositivelyCharged, false, Indifferent, Destabilizing, Some(10.53)),
    aa!('D', "ASP", -3.5, -1.0, 0.047, 115.0886, NegativelyCharged, false, Indifferent, Destabilizing, Some(3.65)),
    aa!('E', "GLU", -3.5, -1.0, 0.063, 129.1155, NegativelyCharged, false, HelixFormer, Destabilizing, Some(4.25)),
];

#[rustfmt::skip]
static CODE_LOOKUP: Map<char, AminoAcid> = phf_map! {
    'A' => AminoAcid::Alanine,       'G' => AminoAcid::Glycine,
    'I' => AminoAcid::Isoleucine,    'L' => AminoAcid::Leucine,
    'P' => AminoAcid::Proline,       'V' => AminoAcid::Valine,
    'M' => AminoAcid::Methionine,    'F' => AminoAcid::Phenylalanine,
    'W' => AminoAcid::Tryptophan,    'Y' => AminoAcid::Tyrosine,
    'N' => AminoAcid::Asparagine,    'C' => AminoAcid::Cysteine,
    'Q' => AminoAcid::Glutamine,     'S' => AminoAcid::Serine,
    'T' => AminoAcid::Threonine,     'R' => AminoAcid::Arginine,
    'H' => AminoAcid::Histidine,     'K' => AminoAcid::Lysine,
    'D' => AminoAcid::AsparticAcid,  'E' => AminoAcid::GlutamicAcid,
};

impl AminoAcid {
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::Alanine,
        AminoAcid::Glycine,
        AminoAcid::Isoleucine,
        AminoAcid::Leucine,
        AminoAcid::Proline,
        AminoAcid::Valine,
        AminoAcid::Methionine,
        AminoAcid::Phenylalanine,
        AminoAcid::Tryptophan,
        AminoAcid::Tyrosine,
        AminoAcid::Asparagine,
        AminoAcid::Cysteine,
        AminoAcid::Glutamine,
        AminoAcid::Serine,
        AminoAcid::Threonine,
        AminoAcid::Arginine,
        AminoAcid::Histidine,
        AminoAcid::Lysine,
        AminoAcid::AsparticAcid,
        AminoAcid::GlutamicAcid,
    ];

    #[inline]
    pub fn properties(self) -> &'static AminoAcidProperties {
        &PROPERTY_TABLE[self as usize]
    }

    pub fn from_code(code: char) -> Option<Self> {
        CODE_LOOKUP
            .get(&code.to_ascii_uppercase())
            .copied()
    }

    #[inline]
    pub fn code(self) -> char {
        self.properties().code
    }

    pub fn to_three_letter(self) -> &'static str {
        self.properties().three_letter
    }

    #[inline]
    pub fn hydrophobicity(self) -> f64 {
        self.properties().hydrophobicity
    }

    #[inline]
    pub fn charge(self) -> f64 {
        self.properties().charge
    }

    #[inline]
    pub fn class(self) -> ResidueClass {
        self.properties().class
    }

    #[inline]
    pub fn is_hydrophobic(self) -> bool {
        self.properties().hydrophobic
    }

    /// Residues carrying a full positive charge at physiological pH.
    pub fn is_cationic(self) -> bool {
        self.charge() >= 1.0
    }

    pub fn is_charged(self) -> bool {
        matches!(
            self.class(),
            ResidueClass::PositivelyCharged | ResidueClass::NegativelyCharged
        )
    }

    /// Sampling weights over [`AminoAcid::ALL`] proportional to natural abundance.
    pub fn abundance_weights() -> [f64; 20] {
        Self::ALL.map(|aa| aa.properties().abundance)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown amino acid code: '{0}'")]
pub struct UnknownCodeError(pub char);

impl TryFrom<char> for AminoAcid {
    type Error = UnknownCodeError;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownCodeError(code))
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown residue name: '{0}'")]
pub struct UnknownResidueNameError(pub String);

impl FromStr for AminoAcid {
    type Err = UnknownResidueNameError;

    /// Accepts either a one-letter or a three-letter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_code(c).ok_or_else(|| UnknownResidueNameError(s.to_string()));
        }
        let upper = trimmed.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|aa| aa.to_three_letter() == upper)
            .ok_or_else(|| UnknownResidueNameError(s.to_string()))
    }
}
