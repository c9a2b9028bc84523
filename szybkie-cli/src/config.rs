use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Borne basse de la somme acceptée (la moyenne d'un 6 sur 32 vaut 99).
pub const SUM_MIN: u32 = 75;
pub const SUM_MAX: u32 = 125;
/// Exposant appliqué aux poids : le domaine est petit, un biais léger serait imperceptible.
pub const BIAS_EXPONENT: f64 = 1.4;
pub const MAX_ATTEMPTS: u32 = 5000;
/// Longueur maximale d'une suite de numéros consécutifs (5,6 passe, 5,6,7 non).
pub const MAX_CONSECUTIVE_RUN: usize = 2;

/// Parité rapportée quand le tirage de secours est renvoyé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FallbackParity {
    /// Toujours 0, comportement historique.
    #[default]
    Zero,
    /// Nombre réel de numéros pairs.
    Actual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub sum_min: u32,
    pub sum_max: u32,
    pub bias_exponent: f64,
    pub max_attempts: u32,
    pub max_consecutive_run: usize,
    pub fallback_parity: FallbackParity,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sum_min: SUM_MIN,
            sum_max: SUM_MAX,
            bias_exponent: BIAS_EXPONENT,
            max_attempts: MAX_ATTEMPTS,
            max_consecutive_run: MAX_CONSECUTIVE_RUN,
            fallback_parity: FallbackParity::Zero,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sum_min > self.sum_max {
            bail!(
                "Fenêtre de somme invalide : {} > {}",
                self.sum_min,
                self.sum_max
            );
        }
        if !self.bias_exponent.is_finite() || self.bias_exponent < 0.0 {
            bail!("Exposant de biais invalide : {}", self.bias_exponent);
        }
        if self.max_attempts == 0 {
            bail!("Le nombre de tentatives doit être au moins 1");
        }
        if self.max_consecutive_run == 0 {
            bail!("La longueur de suite autorisée doit être au moins 1");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {:?}", path))?;
        let config: SamplerConfig = serde_json::from_str(&json)
            .with_context(|| format!("JSON invalide dans {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {:?}", path))?;
        Ok(())
    }

    /// Configuration par défaut, ou celle du fichier si fourni.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
