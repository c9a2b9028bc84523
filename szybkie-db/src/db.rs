use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, DRAW_SIZE};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_id  TEXT PRIMARY KEY,
    date     TEXT NOT NULL,
    n1       INTEGER NOT NULL,
    n2       INTEGER NOT NULL,
    n3       INTEGER NOT NULL,
    n4       INTEGER NOT NULL,
    n5       INTEGER NOT NULL,
    n6       INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("szybkie600.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_id, date, n1, n2, n3, n4, n5, n6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.draw_id,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn numbers_from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<[u8; DRAW_SIZE]> {
    let mut numbers = [0u8; DRAW_SIZE];
    for (i, slot) in numbers.iter_mut().enumerate() {
        *slot = row.get::<_, u8>(offset + i)?;
    }
    Ok(numbers)
}

/// Derniers tirages, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT draw_id, date, n1, n2, n3, n4, n5, n6
         FROM draws ORDER BY date DESC, CAST(draw_id AS INTEGER) DESC, draw_id DESC LIMIT ?1"
    )?;
    let draws = stmt.query_map([limit], |row| {
        Ok(Draw {
            draw_id: row.get(0)?,
            date: row.get(1)?,
            numbers: numbers_from_row(row, 2)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_last_draws_numbers(conn: &Connection, limit: u32) -> Result<Vec<[u8; DRAW_SIZE]>> {
    let mut stmt = conn.prepare(
        "SELECT n1, n2, n3, n4, n5, n6
         FROM draws ORDER BY date DESC, CAST(draw_id AS INTEGER) DESC, draw_id DESC LIMIT ?1"
    )?;
    let rows = stmt
        .query_map([limit], |row| numbers_from_row(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(id: &str, date: &str) -> Draw {
        Draw {
            draw_id: id.to_string(),
            date: date.to_string(),
            numbers: [3, 8, 14, 19, 25, 31],
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("001", "2024-01-01")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw("001", "2024-01-01")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("001", "2024-01-01")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("001", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("002", "2024-01-05")).unwrap();
        insert_draw(&conn, &test_draw("003", "2024-01-03")).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].date, "2024-01-05");
        assert_eq!(draws[1].date, "2024-01-03");
        assert_eq!(draws[2].date, "2024-01-01");
    }

    #[test]
    fn test_same_day_ordered_by_id() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("1001", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("1003", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("1002", "2024-01-01")).unwrap();

        let draws = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].draw_id, "1003");
        assert_eq!(draws[1].draw_id, "1002");
    }

    #[test]
    fn test_same_day_ids_compared_as_numbers() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("998", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("1000", "2024-01-01")).unwrap();
        insert_draw(&conn, &test_draw("999", "2024-01-01")).unwrap();

        // En texte, "999" passerait devant "1000".
        let draws = fetch_last_draws(&conn, 3).unwrap();
        let ids: Vec<&str> = draws.iter().map(|d| d.draw_id.as_str()).collect();
        assert_eq!(ids, vec!["1000", "999", "998"]);
    }

    #[test]
    fn test_fetch_numbers_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("001", "2024-01-01")).unwrap();
        let numbers = fetch_last_draws_numbers(&conn, 5).unwrap();
        assert_eq!(numbers, vec![[3, 8, 14, 19, 25, 31]]);
    }
}
