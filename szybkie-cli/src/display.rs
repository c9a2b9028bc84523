use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};
use textplots::{Chart, Plot, Shape};

use crate::analysis::sampler::Suggestion;
use crate::analysis::simulation::SimulationReport;
use crate::config::SamplerConfig;
use crate::import::ImportResult;
use crate::suggest::{HistoryStatus, Prediction};
use szybkie_db::models::{Draw, HeatTag, NumberStats, DRAW_SIZE};

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Date", "Numéros"]);

    for draw in draws {
        table.add_row(vec![
            &draw.draw_id,
            &draw.date,
            &format_numbers(&draw.sorted_numbers()),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], window: u32) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Retard", "Poids", "Tag"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        let color = match stat.tag {
            HeatTag::Hot => Color::Green,
            HeatTag::Cold => Color::Red,
            HeatTag::Normal => Color::White,
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)),
            Cell::new(stat.frequency.to_string()),
            Cell::new(stat.gap.to_string()),
            Cell::new(format!("{:.0}", stat.weight)),
            Cell::new(stat.tag.to_string()).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_status(status: &HistoryStatus) {
    match status {
        HistoryStatus::Online { .. } => println!("🟢 {status}"),
        HistoryStatus::Simulation { .. } => println!("🟠 {status}"),
    }
}

pub fn display_predictions(predictions: &[Prediction], config: &SamplerConfig) {
    let Some(first) = predictions.first() else {
        println!("Aucune grille générée.");
        return;
    };
    display_status(&first.status);
    println!("\n🎲 Grilles suggérées (6 sur 32)\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "#".to_string(),
            "Numéros".to_string(),
            format!("Somme ({}-{})", config.sum_min, config.sum_max),
            "Pairs".to_string(),
            "Tentatives".to_string(),
            "Filtres".to_string(),
        ]);

    for (i, p) in predictions.iter().enumerate() {
        table.add_row(suggestion_row(i + 1, &p.suggestion));
    }
    println!("{table}");

    if predictions.iter().any(|p| p.suggestion.is_fallback()) {
        println!("⚠️  Grille de secours : aucun tirage n'a satisfait les filtres dans la limite de tentatives.");
    }
}

fn suggestion_row(index: usize, s: &Suggestion) -> Vec<Cell> {
    let verdict = if s.is_fallback() {
        Cell::new("SECOURS").fg(Color::Yellow)
    } else {
        Cell::new("OK").fg(Color::Green)
    };
    vec![
        Cell::new(index),
        Cell::new(format_numbers(&s.numbers)),
        Cell::new(s.sum),
        Cell::new(format!("{}/{}", s.even_count, DRAW_SIZE)),
        Cell::new(s.attempts),
        verdict,
    ]
}

pub fn display_simulation(report: &SimulationReport) {
    println!("\n🧪 Simulation sur {} générations\n", report.trials);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Indicateur", "Valeur"]);

    table.add_row(vec!["Grilles acceptées".to_string(), report.accepted().to_string()]);
    table.add_row(vec![
        "Grilles de secours".to_string(),
        format!("{} ({:.4} %)", report.fallbacks, report.fallback_rate() * 100.0),
    ]);
    table.add_row(vec!["Tentatives".to_string(), report.stats.attempts.to_string()]);
    table.add_row(vec!["Tentatives / grille".to_string(), format!("{:.2}", report.mean_attempts())]);
    table.add_row(vec![
        "Acceptation par tentative".to_string(),
        format!("{:.2} %", report.acceptance_rate() * 100.0),
    ]);
    table.add_row(vec!["Rejets somme".to_string(), report.stats.rejected_sum.to_string()]);
    table.add_row(vec!["Rejets parité".to_string(), report.stats.rejected_parity.to_string()]);
    table.add_row(vec!["Rejets suites".to_string(), report.stats.rejected_run.to_string()]);
    table.add_row(vec!["Violations".to_string(), report.violations.to_string()]);
    println!("{table}");

    println!("\n── Répartition pairs/impairs ──");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Pairs", "Grilles", "Part"]);
    let accepted = report.accepted().max(1) as f64;
    for (even, &count) in report.even_histogram.iter().enumerate() {
        let bar = "█".repeat((count as f64 / accepted * 40.0).round() as usize);
        table.add_row(vec![
            format!("{}/{}", even, DRAW_SIZE),
            count.to_string(),
            bar,
        ]);
    }
    println!("{table}");

    display_sum_chart(report);
}

fn display_sum_chart(report: &SimulationReport) {
    println!("\n── Distribution des sommes ──\n");

    let (Some((&min, _)), Some((&max, _))) = (
        report.sum_histogram.first_key_value(),
        report.sum_histogram.last_key_value(),
    ) else {
        println!("  (Pas de données à afficher)");
        return;
    };

    let points: Vec<(f32, f32)> = report
        .sum_histogram
        .iter()
        .map(|(&sum, &count)| (sum as f32, count as f32))
        .collect();

    let shape = Shape::Bars(&points);
    let mut chart = Chart::new(120, 40, min as f32 - 1.0, max as f32 + 1.0);
    println!("{}", chart.lineplot(&shape));
}
