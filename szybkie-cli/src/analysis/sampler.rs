use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use szybkie_db::models::DRAW_SIZE;

use super::filters::{self, Filter};
use super::weights::WeightVector;
use crate::config::{FallbackParity, SamplerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// La grille a passé tous les filtres.
    Accepted,
    /// Tentatives épuisées : dernière grille tirée, sans garantie sur les filtres.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub numbers: [u8; DRAW_SIZE],
    pub sum: u32,
    pub even_count: u8,
    pub outcome: Outcome,
    pub attempts: u32,
}

impl Suggestion {
    pub fn is_fallback(&self) -> bool {
        self.outcome == Outcome::Fallback
    }

    /// Parité réelle, indépendante de ce que rapporte `even_count` en mode secours.
    pub fn actual_even_count(&self) -> u8 {
        filters::even_count(&self.numbers)
    }
}

/// Rejets par filtre pendant une génération.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub attempts: u32,
    pub rejected_sum: u32,
    pub rejected_parity: u32,
    pub rejected_run: u32,
}

impl SamplerStats {
    fn record(&mut self, filter: Filter) {
        match filter {
            Filter::Sum => self.rejected_sum += 1,
            Filter::Parity => self.rejected_parity += 1,
            Filter::ConsecutiveRun => self.rejected_run += 1,
        }
    }

    pub fn rejected(&self) -> u32 {
        self.rejected_sum + self.rejected_parity + self.rejected_run
    }

    pub fn merge(&mut self, other: &SamplerStats) {
        self.attempts += other.attempts;
        self.rejected_sum += other.rejected_sum;
        self.rejected_parity += other.rejected_parity;
        self.rejected_run += other.rejected_run;
    }
}

/// Poids relatif (après amplification) en dessous duquel un numéro n'est plus
/// considéré comme tirable.
const MIN_RELATIVE_WEIGHT: f64 = 1e-6;

/// Échantillonnage par rejet borné : tirages pondérés, puis filtres, au plus
/// `max_attempts` fois.
pub struct ConstrainedSampler {
    config: SamplerConfig,
    dist: WeightedIndex<f64>,
}

impl ConstrainedSampler {
    pub fn new(weights: &WeightVector, config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let amplified = weights.amplified(config.bias_exponent);
        // Moins de 6 numéros tirables : `draw_candidate` ne terminerait pas.
        let reachable = amplified.iter().filter(|&&w| w >= MIN_RELATIVE_WEIGHT).count();
        if reachable < DRAW_SIZE {
            bail!(
                "Exposant {} trop fort pour cet historique : {} numéro(s) tirable(s) sur {} requis",
                config.bias_exponent,
                reachable,
                DRAW_SIZE
            );
        }
        let dist = WeightedIndex::new(&amplified)
            .context("Poids amplifiés inutilisables")?;
        Ok(Self { config, dist })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Suggestion {
        self.generate_with_stats(rng).0
    }

    pub fn generate_with_stats<R: Rng + ?Sized>(&self, rng: &mut R) -> (Suggestion, SamplerStats) {
        let mut stats = SamplerStats::default();

        loop {
            stats.attempts += 1;
            let numbers = self.draw_candidate(rng);
            let sum = filters::numbers_sum(&numbers);

            match filters::check(&numbers, &self.config) {
                Ok(()) => {
                    let suggestion = Suggestion {
                        numbers,
                        sum,
                        even_count: filters::even_count(&numbers),
                        outcome: Outcome::Accepted,
                        attempts: stats.attempts,
                    };
                    return (suggestion, stats);
                }
                Err(filter) => {
                    stats.record(filter);
                    if stats.attempts >= self.config.max_attempts {
                        log::info!(
                            "Aucune grille valide après {} tentatives, grille de secours",
                            stats.attempts
                        );
                        let even_count = match self.config.fallback_parity {
                            FallbackParity::Zero => 0,
                            FallbackParity::Actual => filters::even_count(&numbers),
                        };
                        let suggestion = Suggestion {
                            numbers,
                            sum,
                            even_count,
                            outcome: Outcome::Fallback,
                            attempts: stats.attempts,
                        };
                        return (suggestion, stats);
                    }
                }
            }
        }
    }

    /// Tirages avec remise jusqu'à obtenir 6 numéros distincts ; les doublons
    /// sont simplement ignorés. Renvoie la grille triée.
    fn draw_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> [u8; DRAW_SIZE] {
        let mut candidate = BTreeSet::new();
        while candidate.len() < DRAW_SIZE {
            let idx = self.dist.sample(rng);
            candidate.insert((idx + 1) as u8);
        }

        let mut numbers = [0u8; DRAW_SIZE];
        for (slot, n) in numbers.iter_mut().zip(candidate) {
            *slot = n;
        }
        numbers
    }
}
