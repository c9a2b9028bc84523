use anyhow::{bail, Result};

/// Nombre de numéros tirables (1-32).
pub const DOMAIN_SIZE: usize = 32;

/// Nombre de numéros par tirage.
pub const DRAW_SIZE: usize = 6;

#[derive(Debug, Clone)]
pub struct Draw {
    pub draw_id: String,
    pub date: String,
    pub numbers: [u8; DRAW_SIZE],
}

impl Draw {
    pub fn sorted_numbers(&self) -> [u8; DRAW_SIZE] {
        let mut numbers = self.numbers;
        numbers.sort();
        numbers
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
    pub weight: f64,
    pub tag: HeatTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatTag {
    Hot,
    Cold,
    Normal,
}

impl std::fmt::Display for HeatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeatTag::Hot => write!(f, "HOT"),
            HeatTag::Cold => write!(f, "COLD"),
            HeatTag::Normal => write!(f, "-"),
        }
    }
}

/// Itère sur les numéros du domaine, dans l'ordre croissant.
pub fn domain() -> impl Iterator<Item = u8> {
    1..=DOMAIN_SIZE as u8
}

pub fn validate_draw(numbers: &[u8; DRAW_SIZE]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n as usize > DOMAIN_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, DOMAIN_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_draw(&[32, 31, 30, 29, 28, 27]).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 33]).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6]).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 6, 6]).is_err());
    }

    #[test]
    fn test_sorted_numbers() {
        let draw = Draw {
            draw_id: "001".to_string(),
            date: "2024-01-01".to_string(),
            numbers: [30, 4, 17, 1, 22, 9],
        };
        assert_eq!(draw.sorted_numbers(), [1, 4, 9, 17, 22, 30]);
        assert_eq!(draw.numbers, [30, 4, 17, 1, 22, 9]);
    }

    #[test]
    fn test_heat_tag_display() {
        assert_eq!(HeatTag::Hot.to_string(), "HOT");
        assert_eq!(HeatTag::Cold.to_string(), "COLD");
        assert_eq!(HeatTag::Normal.to_string(), "-");
    }

    #[test]
    fn test_domain_bounds() {
        let all: Vec<u8> = domain().collect();
        assert_eq!(all.len(), DOMAIN_SIZE);
        assert_eq!(all[0], 1);
        assert_eq!(all[DOMAIN_SIZE - 1], 32);
    }
}
