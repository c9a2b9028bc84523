use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use szybkie_db::rusqlite::Connection;

use szybkie_db::db::insert_draw;
use szybkie_db::models::{validate_draw, Draw, DRAW_SIZE};

const DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Date au format ISO (AAAA-MM-JJ), quelle que soit la notation d'origine.
pub fn parse_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    bail!("Format de date invalide: '{}'", raw)
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(0)?;
    let date = parse_date(&get(1)?)?;

    let mut numbers = [0u8; DRAW_SIZE];
    for (i, slot) in numbers.iter_mut().enumerate() {
        *slot = get_u8(2 + i)?;
    }
    validate_draw(&numbers)?;

    Ok(Draw {
        draw_id,
        date,
        numbers,
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// CSV `;` : identifiant;date;n1;n2;n3;n4;n5;n6, avec ligne d'en-tête.
pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_records(conn, reader)
}

fn import_records<R: std::io::Read>(conn: &Connection, mut reader: csv::Reader<R>) -> Result<ImportResult> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => {
                match parse_record(&record) {
                    Ok(draw) => {
                        match insert_draw(&tx, &draw) {
                            Ok(true) => result.inserted += 1,
                            Ok(false) => result.skipped += 1,
                            Err(e) => {
                                log::warn!("Erreur insertion tirage {}: {:#}", result.total_records, e);
                                result.errors += 1;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Erreur parsing ligne {}: {:#}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
