//! IEEE-754 single-precision bit-field decomposition.
//!
//! Every function here is pure: it takes a slice and returns owned results.
//! Floats are reinterpreted with `bytemuck`, then split into sign, exponent
//! and mantissa. Mantissa deltas use plain signed subtraction; large jumps are
//! signal, not errors.

use std::collections::BTreeMap;
use std::collections::HashMap;

//==================================================================================
// 1. Bit Samples
//==================================================================================

pub const SIGN_SHIFT: u32 = 31;
pub const EXPONENT_SHIFT: u32 = 23;
pub const EXPONENT_MASK: u32 = 0xFF;
pub const MANTISSA_MASK: u32 = 0x7F_FFFF;

/// The three fields of one 32-bit float pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitSample {
    pub sign: u8,
    pub exponent: u8,
    pub mantissa: u32,
}

impl BitSample {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            sign: ((bits >> SIGN_SHIFT) & 0x1) as u8,
            exponent: ((bits >> EXPONENT_SHIFT) & EXPONENT_MASK) as u8,
            mantissa: bits & MANTISSA_MASK,
        }
    }
}

/// Reinterprets floats as their raw bit patterns.
pub fn bitcast(values: &[f32]) -> Vec<u32> {
    bytemuck::cast_slice::<f32, u32>(values).to_vec()
}

pub fn decompose(bits: &[u32]) -> Vec<BitSample> {
    bits.iter().map(|&b| BitSample::from_bits(b)).collect()
}

//==================================================================================
// 2. Derived Series
//==================================================================================

/// Successive mantissa differences, one shorter than `samples`.
pub fn mantissa_deltas(samples: &[BitSample]) -> Vec<i32> {
    samples
        .windows(2)
        .map(|w| w[1].mantissa as i32 - w[0].mantissa as i32)
        .collect()
}

/// The most frequent exponent. On a tie the value seen first in `samples` wins.
pub fn modal_exponent(samples: &[BitSample]) -> Option<u8> {
    let mut counts: HashMap<u8, usize> = HashMap::new();
    for s in samples {
        *counts.entry(s.exponent).or_insert(0) += 1;
    }

    let mut best: Option<(u8, usize)> = None;
    for s in samples {
        let count = counts[&s.exponent];
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((s.exponent, count)),
        }
    }
    best.map(|(exponent, _)| exponent)
}

/// Quantization of the mantissas that share one exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationProfile {
    pub exponent: u8,
    /// Distinct mantissas, ascending.
    pub mantissas: Vec<u32>,
    /// `(gap, count)` between consecutive distinct mantissas, most frequent
    /// first, ties by ascending gap.
    pub gaps: Vec<(u32, usize)>,
}

/// Profiles the mantissas of the modal exponent. `None` for an empty input.
pub fn quantization_profile(samples: &[BitSample]) -> Option<QuantizationProfile> {
    let exponent = modal_exponent(samples)?;
    let mut mantissas: Vec<u32> = samples
        .iter()
        .filter(|s| s.exponent == exponent)
        .map(|s| s.mantissa)
        .collect();
    mantissas.sort_unstable();
    mantissas.dedup();

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for w in mantissas.windows(2) {
        *counts.entry(w[1] - w[0]).or_insert(0) += 1;
    }
    let mut gaps: Vec<(u32, usize)> = counts.into_iter().collect();
    // Stable sort keeps ascending gap order among equal counts.
    gaps.sort_by(|a, b| b.1.cmp(&a.1));

    log_metric!(
        "event" = "quantization_profile",
        "exponent" = exponent,
        "distinct_mantissas" = mantissas.len(),
        "distinct_gaps" = gaps.len()
    );
    Some(QuantizationProfile {
        exponent,
        mantissas,
        gaps,
    })
}

//==================================================================================
// 3. Byte Correlation
//==================================================================================

/// `(bits 0..8, bits 8..16)` of each value.
pub fn low_byte_pairs(values: &[i64]) -> Vec<(i64, i64)> {
    values.iter().map(|&x| (x & 0xFF, (x & 0xFF00) >> 8)).collect()
}

/// `(bits 8..16, bits 16..23)` of each value.
pub fn high_byte_pairs(values: &[i64]) -> Vec<(i64, i64)> {
    values
        .iter()
        .map(|&x| ((x & 0xFF00) >> 8, (x & 0x7F_0000) >> 16))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(bits: &[u32]) -> Vec<BitSample> {
        decompose(bits)
    }

    #[test]
    fn test_decompose_pi() {
        let sample = BitSample::from_bits(0x4049_0FDB);
        assert_eq!(sample.sign, 0);
        assert_eq!(sample.exponent, 128);
        assert_eq!(sample.mantissa, 0x49_0FDB);
    }

    #[test]
    fn test_bitcast_matches_to_bits() {
        let values = [std::f32::consts::PI, -1.0, 1.5e-3];
        let bits = bitcast(&values);
        assert_eq!(bits[0], 0x4049_0FDB);
        assert_eq!(bits, values.iter().map(|v| v.to_bits()).collect::<Vec<_>>());
        assert_eq!(BitSample::from_bits(bits[1]).sign, 1);
    }

    #[test]
    fn test_fields_reassemble_the_pattern() {
        for &bits in &[0u32, 0x8000_0001, 0x7F80_0000, 0x4049_0FDB, u32::MAX] {
            let s = BitSample::from_bits(bits);
            let rebuilt = ((s.sign as u32) << 31) | ((s.exponent as u32) << 23) | s.mantissa;
            assert_eq!(rebuilt, bits);
        }
    }

    #[test]
    fn test_mantissa_deltas_are_signed_and_one_shorter() {
        let s = samples(&[0x4000_0010, 0x4000_0004, 0x407F_FFFF]);
        assert_eq!(mantissa_deltas(&s), vec![-12, 0x7F_FFFB]);
        assert!(mantissa_deltas(&s[..1]).is_empty());
    }

    #[test]
    fn test_modal_exponent_tie_goes_to_first_seen() {
        // Exponents: 129, 128, 128, 129.
        let s = samples(&[0x4080_0000, 0x4000_0000, 0x4000_0001, 0x4080_0001]);
        assert_eq!(modal_exponent(&s), Some(129));
        assert_eq!(modal_exponent(&[]), None);
    }

    #[test]
    fn test_quantization_profile_counts_gaps() {
        // Modal exponent 128 with mantissas {0, 4, 8, 12, 14, 8}; exponent 129 once.
        let s = samples(&[
            0x4000_0000,
            0x4000_0004,
            0x4000_0008,
            0x4000_000C,
            0x4000_000E,
            0x4000_0008,
            0x4080_0000,
        ]);
        let profile = quantization_profile(&s).unwrap();
        assert_eq!(profile.exponent, 128);
        assert_eq!(profile.mantissas, vec![0, 4, 8, 12, 14]);
        assert_eq!(profile.gaps, vec![(4, 3), (2, 1)]);
    }

    #[test]
    fn test_byte_pairs() {
        assert_eq!(low_byte_pairs(&[0x12_3456]), vec![(0x56, 0x34)]);
        assert_eq!(high_byte_pairs(&[0x12_3456]), vec![(0x34, 0x12)]);
        // Negative deltas are split in two's complement.
        assert_eq!(low_byte_pairs(&[-1]), vec![(0xFF, 0xFF)]);
        assert_eq!(high_byte_pairs(&[-1]), vec![(0xFF, 0x7F)]);
    }
}
