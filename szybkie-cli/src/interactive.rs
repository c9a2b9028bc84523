use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use szybkie::config::SamplerConfig;
use szybkie::provider::{CachedHistory, SqliteHistory};
use szybkie_db::rusqlite::Connection;

use super::prompt;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate,
    History,
    Add,
    Stats,
    Refresh,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "generer" | "générer" | "generate" | "gen" => Some(InteractiveCommand::Generate),
        "2" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "3" | "ajouter" | "add" => Some(InteractiveCommand::Add),
        "4" | "stats" | "statistiques" => Some(InteractiveCommand::Stats),
        "5" | "rafraichir" | "rafraîchir" | "refresh" => Some(InteractiveCommand::Refresh),
        "6" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(ttl: Duration) {
    println!();
    println!("── Mode interactif ──");
    println!("  1. generer    Générer une grille (6 numéros)");
    println!("  2. historique Derniers tirages");
    println!("  3. ajouter    Ajouter un tirage");
    println!("  4. stats      Fréquences et poids");
    println!("  5. rafraichir Vider le cache d'historique ({} s)", ttl.as_secs());
    println!("  6. quitter    Quitter");
    println!();
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn cmd_generate_interactive(
    provider: &mut CachedHistory<SqliteHistory<'_>>,
    config: &SamplerConfig,
    rng: &mut StdRng,
) -> Result<()> {
    let n_str = prompt_with_default("Nombre de grilles", "1")?;
    let n: usize = n_str.parse().context("Nombre invalide")?;
    super::cmd_generate(provider, config, n, rng)
}

fn cmd_history_interactive(conn: &Connection) -> Result<()> {
    let n_str = prompt_with_default("Nombre de tirages", "10")?;
    let n: u32 = n_str.parse().context("Nombre invalide")?;
    super::cmd_list(conn, n)
}

fn cmd_stats_interactive(conn: &Connection, window: u32) -> Result<()> {
    let n_str = prompt_with_default("Fenêtre d'analyse", &window.to_string())?;
    let n: u32 = n_str.parse().context("Nombre invalide")?;
    super::cmd_stats(conn, n)
}

pub fn run_interactive(conn: &Connection, window: u32, ttl: Duration, config: &SamplerConfig) -> Result<()> {
    println!("Bienvenue dans le mode interactif de szybkie600 !");

    let mut provider = CachedHistory::new(SqliteHistory::new(conn, window), ttl);
    let seed_str = prompt_with_default("Seed (vide = aléatoire)", "")?;
    let seed: Option<u64> = if seed_str.is_empty() {
        None
    } else {
        Some(seed_str.parse().context("Seed invalide")?)
    };
    let mut rng = super::make_rng(seed);

    loop {
        display_menu(provider.ttl());
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let result = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Generate) => cmd_generate_interactive(&mut provider, config, &mut rng),
            Some(InteractiveCommand::History) => cmd_history_interactive(conn),
            Some(InteractiveCommand::Add) => {
                // Un nouveau tirage doit être pris en compte immédiatement.
                let added = super::cmd_add(conn);
                provider.invalidate();
                added
            }
            Some(InteractiveCommand::Stats) => cmd_stats_interactive(conn, window),
            Some(InteractiveCommand::Refresh) => {
                provider.invalidate();
                println!("Cache vidé, l'historique sera relu à la prochaine grille.");
                Ok(())
            }
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-6) ou un nom de commande.", input);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Erreur: {e:#}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Add));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Refresh));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("generer"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("générer"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("historique"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("ajouter"), Some(InteractiveCommand::Add));
        assert_eq!(parse_command("stats"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("rafraichir"), Some(InteractiveCommand::Refresh));
        assert_eq!(parse_command("quitter"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("QUIT"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("Generer"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command(" gen "), Some(InteractiveCommand::Generate));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("7"), None);
    }
}
