use anyhow::Result;
use rand::Rng;

use crate::analysis::sampler::{ConstrainedSampler, Suggestion};
use crate::analysis::weights::{compute_weights, WeightVector};
use crate::config::SamplerConfig;
use crate::provider::{History, HistoryProvider};

/// État de la source d'historique, pour l'affichage uniquement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStatus {
    Online { draws: usize },
    Simulation { reason: String },
}

impl HistoryStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, HistoryStatus::Online { .. })
    }
}

impl std::fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryStatus::Online { draws } => write!(f, "EN LIGNE : {} tirages", draws),
            HistoryStatus::Simulation { reason } => write!(f, "MODE SIMULATION ({})", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub suggestion: Suggestion,
    pub status: HistoryStatus,
    pub weights: WeightVector,
}

/// Interroge la source une seule fois ; toute erreur devient un historique vide.
pub fn load_history<P: HistoryProvider + ?Sized>(provider: &mut P) -> (History, HistoryStatus) {
    match provider.fetch() {
        Ok(draws) if !draws.is_empty() => {
            let status = HistoryStatus::Online { draws: draws.len() };
            (draws, status)
        }
        Ok(_) => {
            log::warn!("Source {} : historique vide, poids uniformes", provider.name());
            let status = HistoryStatus::Simulation {
                reason: "historique vide".to_string(),
            };
            (Vec::new(), status)
        }
        Err(e) => {
            log::warn!("Source {} indisponible : {e:#}", provider.name());
            let status = HistoryStatus::Simulation {
                reason: format!("{e:#}"),
            };
            (Vec::new(), status)
        }
    }
}

/// Historique -> poids -> échantillonnage contraint. Seule une configuration
/// invalide (ou un exposant qui ne laisse pas 6 numéros tirables) produit une erreur.
pub fn produce_suggestion<P, R>(
    provider: &mut P,
    config: &SamplerConfig,
    rng: &mut R,
) -> Result<Prediction>
where
    P: HistoryProvider + ?Sized,
    R: Rng + ?Sized,
{
    let (history, status) = load_history(provider);
    let weights = compute_weights(&history);
    let sampler = ConstrainedSampler::new(&weights, config.clone())?;
    let suggestion = sampler.generate(rng);

    log::debug!(
        "Grille {:?} en {} tentative(s) ({:?})",
        suggestion.numbers,
        suggestion.attempts,
        suggestion.outcome
    );

    Ok(Prediction {
        suggestion,
        status,
        weights,
    })
}
