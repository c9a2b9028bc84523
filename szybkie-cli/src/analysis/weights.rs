use anyhow::{bail, Result};

use szybkie_db::models::{DOMAIN_SIZE, DRAW_SIZE};

/// Poids strictement positif pour chaque numéro du domaine (index 0 = numéro 1).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector([f64; DOMAIN_SIZE]);

impl Default for WeightVector {
    fn default() -> Self {
        Self::uniform()
    }
}

impl WeightVector {
    pub fn uniform() -> Self {
        Self([1.0; DOMAIN_SIZE])
    }

    pub fn from_weights(weights: [f64; DOMAIN_SIZE]) -> Result<Self> {
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w <= 0.0 {
                bail!("Poids invalide pour le numéro {} : {}", i + 1, w);
            }
        }
        Ok(Self(weights))
    }

    /// `None` hors du domaine 1-32.
    pub fn get(&self, number: u8) -> Option<f64> {
        self.0.get((number as usize).wrapping_sub(1)).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn is_uniform(&self) -> bool {
        self.0.iter().all(|&w| w == self.0[0])
    }

    /// Poids élevés à `exponent` pour accentuer l'écart entre numéros chauds et froids.
    /// Les poids sont d'abord ramenés dans (0, 1] par le maximum : les rapports sont
    /// conservés et le résultat reste fini quel que soit l'exposant.
    pub fn amplified(&self, exponent: f64) -> Vec<f64> {
        let max = self.0.iter().copied().fold(f64::MIN_POSITIVE, f64::max);
        self.0
            .iter()
            .map(|w| (w / max).powf(exponent).max(f64::MIN_POSITIVE))
            .collect()
    }
}

/// Poids = nombre d'apparitions, ou 1 pour un numéro jamais sorti.
pub fn compute_weights(draws: &[[u8; DRAW_SIZE]]) -> WeightVector {
    let mut counts = [0u32; DOMAIN_SIZE];

    for numbers in draws {
        for &n in numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }

    let mut weights = [1.0f64; DOMAIN_SIZE];
    for (w, &count) in weights.iter_mut().zip(counts.iter()) {
        if count > 0 {
            *w = count as f64;
        }
    }
    WeightVector(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_is_uniform() {
        let weights = compute_weights(&[]);
        assert_eq!(weights.as_slice().len(), 32);
        assert!(weights.as_slice().iter().all(|&w| w == 1.0));
        assert_eq!(weights, WeightVector::uniform());
    }

    #[test]
    fn test_single_occurrence_matches_default() {
        let weights = compute_weights(&[[1, 2, 3, 4, 5, 6]]);
        assert!(weights.as_slice().iter().all(|&w| w == 1.0));
        assert!(weights.is_uniform());
    }

    #[test]
    fn test_two_occurrences() {
        let weights = compute_weights(&[[1, 2, 3, 4, 5, 6], [1, 2, 3, 4, 5, 6]]);
        for n in 1..=6u8 {
            assert_eq!(weights.get(n), Some(2.0), "numéro {n}");
        }
        for n in 7..=32u8 {
            assert_eq!(weights.get(n), Some(1.0), "numéro {n}");
        }
        assert!(!weights.is_uniform());
    }

    #[test]
    fn test_out_of_domain_ignored() {
        let weights = compute_weights(&[[0, 33, 40, 7, 7, 7]]);
        assert_eq!(weights.get(7), Some(3.0));
        assert_eq!(weights.as_slice().iter().filter(|&&w| w != 1.0).count(), 1);
    }

    #[test]
    fn test_amplified() {
        let weights = compute_weights(&[[1, 2, 3, 4, 5, 6], [1, 7, 8, 9, 10, 11]]);
        let amplified = weights.amplified(1.4);
        assert!((amplified[0] - 1.0).abs() < 1e-12);
        assert!((amplified[1] - 0.5f64.powf(1.4)).abs() < 1e-12);
        // Le rapport chaud/froid vaut 2^1.4, comme sans normalisation.
        assert!((amplified[0] / amplified[1] - 2.0f64.powf(1.4)).abs() < 1e-9);
    }

    #[test]
    fn test_amplified_stays_finite_with_large_exponent() {
        let history = vec![[3, 8, 14, 19, 25, 31]; 20];
        let amplified = compute_weights(&history).amplified(300.0);
        assert!(amplified.iter().all(|w| w.is_finite() && *w > 0.0), "{:?}", amplified);
        assert_eq!(amplified[2], 1.0);
        assert!(amplified.iter().sum::<f64>().is_finite());
    }

    #[test]
    fn test_get_outside_domain() {
        let weights = WeightVector::uniform();
        assert_eq!(weights.get(0), None);
        assert_eq!(weights.get(33), None);
        assert_eq!(weights.get(1), Some(1.0));
        assert_eq!(weights.get(32), Some(1.0));
    }

    #[test]
    fn test_from_weights_rejects_non_positive() {
        let mut raw = [1.0; DOMAIN_SIZE];
        assert!(WeightVector::from_weights(raw).is_ok());
        raw[5] = 0.0;
        assert!(WeightVector::from_weights(raw).is_err());
        raw[5] = f64::INFINITY;
        assert!(WeightVector::from_weights(raw).is_err());
    }
}
