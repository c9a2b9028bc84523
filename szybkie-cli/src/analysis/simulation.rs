use std::collections::BTreeMap;

use indicatif::ProgressBar;
use rand::Rng;

use szybkie_db::models::DRAW_SIZE;

use super::filters::longest_run;
use super::sampler::{ConstrainedSampler, SamplerStats};

/// Bilan de `trials` générations successives avec le même échantillonneur.
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    pub trials: usize,
    pub fallbacks: usize,
    pub stats: SamplerStats,
    /// Somme -> nombre de grilles acceptées.
    pub sum_histogram: BTreeMap<u32, usize>,
    /// Index = nombre de numéros pairs.
    pub even_histogram: [usize; DRAW_SIZE + 1],
    /// Grilles acceptées qui violeraient un filtre ; doit rester à 0.
    pub violations: usize,
}

impl SimulationReport {
    pub fn accepted(&self) -> usize {
        self.trials - self.fallbacks
    }

    pub fn fallback_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.fallbacks as f64 / self.trials as f64
    }

    /// Taux d'acceptation d'une tentative isolée.
    pub fn acceptance_rate(&self) -> f64 {
        if self.stats.attempts == 0 {
            return 0.0;
        }
        self.accepted() as f64 / self.stats.attempts as f64
    }

    pub fn mean_attempts(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.stats.attempts as f64 / self.trials as f64
    }
}

pub fn simulate<R: Rng + ?Sized>(
    sampler: &ConstrainedSampler,
    trials: usize,
    rng: &mut R,
    pb: &ProgressBar,
) -> SimulationReport {
    let config = sampler.config();
    let mut report = SimulationReport {
        trials,
        ..Default::default()
    };

    for _ in 0..trials {
        let (suggestion, stats) = sampler.generate_with_stats(rng);
        report.stats.merge(&stats);

        if suggestion.is_fallback() {
            report.fallbacks += 1;
        } else {
            *report.sum_histogram.entry(suggestion.sum).or_insert(0) += 1;
            report.even_histogram[suggestion.even_count as usize] += 1;

            let even = suggestion.even_count as usize;
            if !(config.sum_min..=config.sum_max).contains(&suggestion.sum)
                || even == 0
                || even == DRAW_SIZE
                || longest_run(&suggestion.numbers) > config.max_consecutive_run
            {
                report.violations += 1;
            }
        }
        pb.inc(1);
    }

    report
}
