mod interactive;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use szybkie::analysis::compute_stats;
use szybkie::analysis::sampler::ConstrainedSampler;
use szybkie::analysis::simulation::simulate;
use szybkie::analysis::weights::compute_weights;
use szybkie::config::{FallbackParity, SamplerConfig};
use szybkie::display::{
    display_draws, display_import_summary, display_predictions, display_simulation, display_stats,
    display_status,
};
use szybkie::import::{import_csv, parse_date};
use szybkie::provider::{CachedHistory, HistoryProvider, SqliteHistory, DEFAULT_TTL};
use szybkie::suggest::{load_history, produce_suggestion};
use szybkie_db::db::{count_draws, db_path, fetch_last_draws, fetch_last_draws_numbers, insert_draw, migrate, open_db};
use szybkie_db::models::{validate_draw, Draw, DRAW_SIZE};
use szybkie_db::rusqlite::Connection;

#[derive(Parser)]
#[command(name = "szybkie600", about = "Générateur de grilles Szybkie 600 (6 sur 32)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/szybkie600.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Ajouter un tirage manuellement
    Add,

    /// Afficher fréquences, retards et poids
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "50")]
        window: u32,
    },

    /// Générer des grilles pondérées par les numéros chauds
    Generate {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "50")]
        window: u32,

        /// Nombre de grilles à générer
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier de configuration de l'échantillonneur (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Parité rapportée pour une grille de secours
        #[arg(long)]
        fallback_parity: Option<FallbackParity>,
    },

    /// Mesurer le comportement de l'échantillonneur sur de nombreux essais
    Simulate {
        /// Nombre de générations
        #[arg(short, long, default_value = "10000")]
        trials: usize,

        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "50")]
        window: u32,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier de configuration de l'échantillonneur (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Écrire la configuration par défaut dans un fichier JSON
    InitConfig {
        #[arg(short, long, default_value = "sampler.json")]
        output: PathBuf,
    },

    /// Mode interactif (REPL)
    Interactive {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "50")]
        window: u32,

        /// Durée de validité du cache d'historique, en secondes
        #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
        ttl: u64,

        /// Fichier de configuration de l'échantillonneur (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Add => cmd_add(&conn),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Generate {
            window,
            count,
            seed,
            config,
            fallback_parity,
        } => {
            let mut config = SamplerConfig::load_or_default(config.as_deref())?;
            if let Some(parity) = fallback_parity {
                config.fallback_parity = parity;
            }
            let mut provider = CachedHistory::new(SqliteHistory::new(&conn, window), DEFAULT_TTL);
            let mut rng = make_rng(seed);
            cmd_generate(&mut provider, &config, count, &mut rng)
        }
        Command::Simulate {
            trials,
            window,
            seed,
            config,
        } => cmd_simulate(&conn, trials, window, seed, config.as_deref()),
        Command::InitConfig { output } => {
            SamplerConfig::default().save(&output)?;
            println!("Configuration par défaut écrite dans {}", output.display());
            Ok(())
        }
        Command::Interactive { window, ttl, config } => {
            let config = SamplerConfig::load_or_default(config.as_deref())?;
            interactive::run_interactive(&conn, window, Duration::from_secs(ttl), &config)
        }
    }
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

pub(crate) fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : szybkie600 import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

pub(crate) fn cmd_stats(conn: &Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : szybkie600 import");
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws_numbers(conn, effective_window)?;
    let stats = compute_stats(&draws);
    display_stats(&stats, effective_window);
    Ok(())
}

pub(crate) fn cmd_generate<P: HistoryProvider + ?Sized>(
    provider: &mut P,
    config: &SamplerConfig,
    count: usize,
    rng: &mut StdRng,
) -> Result<()> {
    let mut predictions = Vec::with_capacity(count);
    for _ in 0..count {
        predictions.push(produce_suggestion(provider, config, rng)?);
    }
    display_predictions(&predictions, config);
    Ok(())
}

fn cmd_simulate(
    conn: &Connection,
    trials: usize,
    window: u32,
    seed: Option<u64>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = SamplerConfig::load_or_default(config_path)?;
    let mut provider = SqliteHistory::new(conn, window);
    let (history, status) = load_history(&mut provider);
    display_status(&status);

    let weights = compute_weights(&history);
    let sampler = ConstrainedSampler::new(&weights, config)?;
    let mut rng = make_rng(seed);

    let pb = ProgressBar::new(trials as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .context("Modèle de barre de progression invalide")?
        .progress_chars("=> "));

    let report = simulate(&sampler, trials, &mut rng, &pb);
    pb.finish_and_clear();

    display_simulation(&report);
    Ok(())
}

pub(crate) fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_id = prompt("Identifiant du tirage (ex: 1001) : ")?;
    let raw_date = prompt("Date (JJ.MM.AAAA) : ")?;
    let date = parse_date(&raw_date)?;
    let numbers = prompt_numbers()?;

    let draw = Draw {
        draw_id,
        date,
        numbers,
    };

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

pub(crate) fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        anyhow::bail!("Fin de l'entrée standard");
    }
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<[u8; DRAW_SIZE]> {
    loop {
        let input = prompt("6 numéros (séparés par des espaces, 1-32) : ")?;
        match parse_numbers(&input) {
            Some(numbers) if validate_draw(&numbers).is_ok() => return Ok(numbers),
            Some(_) => println!("Numéros invalides (1-32, pas de doublons). Réessayez."),
            None => println!("Entrez exactement 6 numéros. Réessayez."),
        }
    }
}

fn parse_numbers(input: &str) -> Option<[u8; DRAW_SIZE]> {
    let nums: Vec<u8> = input
        .split_whitespace()
        .map(|s| s.parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    nums.try_into().ok()
}
