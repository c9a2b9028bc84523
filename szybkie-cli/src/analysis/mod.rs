pub mod filters;
pub mod sampler;
pub mod simulation;
pub mod weights;

use szybkie_db::models::{domain, HeatTag, NumberStats, DOMAIN_SIZE, DRAW_SIZE};

use self::weights::compute_weights;

/// Fréquence, retard et poids de chaque numéro. `draws[0]` est le tirage le plus récent.
pub fn compute_stats(draws: &[[u8; DRAW_SIZE]]) -> Vec<NumberStats> {
    let weights = compute_weights(draws);
    let mut stats: Vec<NumberStats> = domain()
        .zip(weights.as_slice())
        .map(|(n, &weight)| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
            weight,
            tag: HeatTag::Normal,
        })
        .collect();

    let mut seen = [false; DOMAIN_SIZE];
    for (i, numbers) in draws.iter().enumerate() {
        for &n in numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < stats.len() {
                stats[idx].frequency += 1;
                if !seen[idx] {
                    seen[idx] = true;
                    stats[idx].gap = i as u32;
                }
            }
        }
    }

    for (stat, &was_seen) in stats.iter_mut().zip(seen.iter()) {
        if !was_seen {
            stat.gap = draws.len() as u32;
        }
    }

    tag_stats(&mut stats, draws.len());
    stats
}

/// Écart relatif de 30 % par rapport à la fréquence attendue sous tirage uniforme.
pub fn tag_stats(stats: &mut [NumberStats], draw_count: usize) {
    if draw_count == 0 {
        return;
    }
    let expected = (draw_count * DRAW_SIZE) as f64 / DOMAIN_SIZE as f64;
    let threshold = 0.3;

    for s in stats.iter_mut() {
        let deviation = (s.frequency as f64 - expected) / expected;
        s.tag = if deviation > threshold {
            HeatTag::Hot
        } else if deviation < -threshold {
            HeatTag::Cold
        } else {
            HeatTag::Normal
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_frequency_and_gap() {
        let draws = vec![
            [1, 2, 3, 4, 5, 6],
            [1, 7, 8, 9, 10, 11],
            [1, 2, 12, 13, 14, 15],
        ];
        let stats = compute_stats(&draws);
        assert_eq!(stats.len(), 32);

        assert_eq!(stats[0].frequency, 3);
        assert_eq!(stats[0].gap, 0);
        assert_eq!(stats[0].weight, 3.0);

        assert_eq!(stats[1].frequency, 2);
        assert_eq!(stats[1].gap, 0);

        assert_eq!(stats[6].frequency, 1);
        assert_eq!(stats[6].gap, 1);
        assert_eq!(stats[6].weight, 1.0);

        assert_eq!(stats[31].frequency, 0);
        assert_eq!(stats[31].gap, 3);
        assert_eq!(stats[31].weight, 1.0);
    }

    #[test]
    fn test_stats_tags() {
        let draws = vec![[1, 2, 3, 4, 5, 6]; 4];
        let stats = compute_stats(&draws);
        assert_eq!(stats[0].tag, HeatTag::Hot);
        assert_eq!(stats[31].tag, HeatTag::Cold);
    }

    #[test]
    fn test_stats_empty_history() {
        let stats = compute_stats(&[]);
        assert!(stats.iter().all(|s| s.frequency == 0 && s.gap == 0 && s.tag == HeatTag::Normal));
        assert!(stats.iter().all(|s| s.weight == 1.0));
    }
}
