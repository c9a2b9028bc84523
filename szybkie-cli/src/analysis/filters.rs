use szybkie_db::models::DRAW_SIZE;

use crate::config::SamplerConfig;

/// Filtres appliqués dans cet ordre ; le premier échec rejette la grille.
pub const FILTER_CHAIN: [Filter; 3] = [Filter::Sum, Filter::Parity, Filter::ConsecutiveRun];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Sum,
    Parity,
    ConsecutiveRun,
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Sum => write!(f, "Somme"),
            Filter::Parity => write!(f, "Parité"),
            Filter::ConsecutiveRun => write!(f, "Suites"),
        }
    }
}

impl Filter {
    /// `numbers` doit être trié.
    pub fn accepts(&self, numbers: &[u8; DRAW_SIZE], config: &SamplerConfig) -> bool {
        match self {
            Filter::Sum => {
                let sum = numbers_sum(numbers);
                (config.sum_min..=config.sum_max).contains(&sum)
            }
            Filter::Parity => {
                let even = even_count(numbers) as usize;
                even != 0 && even != DRAW_SIZE
            }
            Filter::ConsecutiveRun => longest_run(numbers) <= config.max_consecutive_run,
        }
    }
}

/// Renvoie le premier filtre qui rejette la grille triée.
pub fn check(numbers: &[u8; DRAW_SIZE], config: &SamplerConfig) -> Result<(), Filter> {
    match FILTER_CHAIN.iter().find(|f| !f.accepts(numbers, config)) {
        Some(&filter) => Err(filter),
        None => Ok(()),
    }
}

pub fn numbers_sum(numbers: &[u8]) -> u32 {
    numbers.iter().map(|&n| n as u32).sum()
}

pub fn even_count(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|&&n| n % 2 == 0).count() as u8
}

/// Longueur de la plus longue suite de numéros consécutifs (1 si aucune).
pub fn longest_run(sorted: &[u8]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let mut longest = 1;
    let mut current = 1;
    for pair in sorted.windows(2) {
        if pair[1] == pair[0] + 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SamplerConfig {
        SamplerConfig::default()
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run(&[1, 3, 5, 7, 9, 11]), 1);
        assert_eq!(longest_run(&[1, 5, 6, 10, 20, 30]), 2);
        assert_eq!(longest_run(&[1, 5, 6, 7, 20, 30]), 3);
        assert_eq!(longest_run(&[27, 28, 29, 30, 31, 32]), 6);
        assert_eq!(longest_run(&[]), 0);
    }

    #[test]
    fn test_sum_and_parity_helpers() {
        assert_eq!(numbers_sum(&[1, 2, 3, 4, 5, 6]), 21);
        assert_eq!(even_count(&[1, 2, 3, 4, 5, 6]), 3);
        assert_eq!(even_count(&[1, 3, 5, 7, 9, 11]), 0);
    }

    #[test]
    fn test_accepts_typical_grid() {
        // 3 + 8 + 14 + 19 + 25 + 31 = 100
        assert_eq!(check(&[3, 8, 14, 19, 25, 31], &config()), Ok(()));
    }

    #[test]
    fn test_sum_bounds_inclusive() {
        // 2 + 5 + 10 + 15 + 20 + 23 = 75
        assert_eq!(check(&[2, 5, 10, 15, 20, 23], &config()), Ok(()));
        // 10 + 15 + 20 + 23 + 27 + 30 = 125
        assert_eq!(check(&[10, 15, 20, 23, 27, 30], &config()), Ok(()));
        // 1 + 5 + 10 + 15 + 20 + 23 = 74
        assert_eq!(check(&[1, 5, 10, 15, 20, 23], &config()), Err(Filter::Sum));
        // 10 + 15 + 20 + 23 + 27 + 31 = 126
        assert_eq!(check(&[10, 15, 20, 23, 27, 31], &config()), Err(Filter::Sum));
    }

    #[test]
    fn test_parity_rejects_all_odd_and_all_even() {
        // 5 + 9 + 13 + 17 + 25 + 31 = 100, tous impairs
        assert_eq!(check(&[5, 9, 13, 17, 25, 31], &config()), Err(Filter::Parity));
        // 4 + 8 + 14 + 18 + 24 + 32 = 100, tous pairs
        assert_eq!(check(&[4, 8, 14, 18, 24, 32], &config()), Err(Filter::Parity));
    }

    #[test]
    fn test_consecutive_pair_allowed_triple_rejected() {
        // 5 + 6 + 14 + 20 + 25 + 30 = 100
        assert_eq!(check(&[5, 6, 14, 20, 25, 30], &config()), Ok(()));
        // 5 + 6 + 14 + 15 + 25 + 30 = 95, deux paires séparées
        assert_eq!(longest_run(&[5, 6, 14, 15, 25, 30]), 2);
        assert_eq!(check(&[5, 6, 14, 15, 25, 30], &config()), Ok(()));
        // 5 + 6 + 7 + 20 + 29 + 32 = 99
        assert_eq!(check(&[5, 6, 7, 20, 29, 32], &config()), Err(Filter::ConsecutiveRun));
    }

    #[test]
    fn test_chain_short_circuits_in_order() {
        // Somme 21, tous consécutifs : la somme échoue en premier.
        assert_eq!(check(&[1, 2, 3, 4, 5, 6], &config()), Err(Filter::Sum));
        // Somme 100, tous impairs : rejet sur la parité.
        assert_eq!(check(&[9, 11, 13, 15, 21, 31], &config()), Err(Filter::Parity));
    }

    #[test]
    fn test_custom_run_limit() {
        let config = SamplerConfig { max_consecutive_run: 3, ..Default::default() };
        assert_eq!(check(&[5, 6, 7, 20, 29, 32], &config), Ok(()));
    }
}
