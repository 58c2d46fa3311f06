use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::parser::{Item, ParsedDocument};

pub const DEFAULT_DB_PATH: &str = "data/catalog.sqlite";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            filename         TEXT PRIMARY KEY,
            title            TEXT NOT NULL,
            total_items      INTEGER NOT NULL,
            starred_items    INTEGER NOT NULL,
            index_items      INTEGER NOT NULL,
            cross_references INTEGER NOT NULL,
            processed_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS sections (
            id        INTEGER PRIMARY KEY,
            filename  TEXT NOT NULL REFERENCES documents(filename) ON DELETE CASCADE,
            parent_id INTEGER REFERENCES sections(id) ON DELETE CASCADE,
            level     INTEGER NOT NULL CHECK(level IN (1, 2)),
            position  INTEGER NOT NULL,
            title     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sections_filename ON sections(filename);

        CREATE TABLE IF NOT EXISTS items (
            id                 INTEGER PRIMARY KEY,
            section_id         INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            position           INTEGER NOT NULL,
            name               TEXT NOT NULL,
            description        TEXT NOT NULL,
            is_starred         BOOLEAN NOT NULL,
            is_index           BOOLEAN NOT NULL,
            is_cross_reference BOOLEAN NOT NULL,
            raw_content        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_items_section ON items(section_id);

        CREATE TABLE IF NOT EXISTS links (
            id        INTEGER PRIMARY KEY,
            item_id   INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            position  INTEGER NOT NULL,
            url       TEXT NOT NULL,
            text      TEXT NOT NULL,
            link_type TEXT NOT NULL CHECK(link_type IN ('primary','secondary','github','discord','other'))
        );
        CREATE INDEX IF NOT EXISTS idx_links_item ON links(item_id);
        ",
    )?;
    Ok(())
}

// ── Saving ──

/// Save a batch in one transaction, replacing earlier rows for the same files.
pub fn save_documents(conn: &Connection, docs: &[ParsedDocument]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut del_stmt = tx.prepare("DELETE FROM documents WHERE filename = ?1")?;
        let mut d_stmt = tx.prepare(
            "INSERT INTO documents
             (filename, title, total_items, starred_items, index_items, cross_references)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        let mut s_stmt = tx.prepare(
            "INSERT INTO sections (filename, parent_id, level, position, title)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let mut i_stmt = tx.prepare(
            "INSERT INTO items
             (section_id, position, name, description, is_starred, is_index, is_cross_reference, raw_content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        let mut l_stmt = tx.prepare(
            "INSERT INTO links (item_id, position, url, text, link_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        let mut insert_items = |section_id: i64, items: &[Item]| -> Result<()> {
            for (pos, item) in items.iter().enumerate() {
                i_stmt.execute(rusqlite::params![
                    section_id, pos as i64, item.name, item.description, item.is_starred,
                    item.is_index, item.is_cross_reference, item.raw_content,
                ])?;
                let item_id = tx.last_insert_rowid();
                for (lpos, link) in item.links.iter().enumerate() {
                    l_stmt.execute(rusqlite::params![
                        item_id, lpos as i64, link.url, link.text, link.link_type.as_str(),
                    ])?;
                }
            }
            Ok(())
        };

        for doc in docs {
            del_stmt.execute([&doc.filename])?;
            let m = &doc.metadata;
            d_stmt.execute(rusqlite::params![
                doc.filename, doc.title, m.total_items as i64, m.starred_items as i64,
                m.index_items as i64, m.cross_references as i64,
            ])?;

            for (pos, section) in doc.sections.iter().enumerate() {
                s_stmt.execute(rusqlite::params![
                    doc.filename, None::<i64>, section.level(), pos as i64, section.title,
                ])?;
                let section_id = tx.last_insert_rowid();
                insert_items(section_id, &section.items)?;

                for (spos, sub) in section.subsections.iter().enumerate() {
                    s_stmt.execute(rusqlite::params![
                        doc.filename, section_id, sub.level(), spos as i64, sub.title,
                    ])?;
                    let sub_id = tx.last_insert_rowid();
                    insert_items(sub_id, &sub.items)?;
                }
            }
            debug!("Saved {} ({} items)", doc.filename, m.total_items);
        }
    }
    tx.commit()?;
    Ok(())
}

// ── Overview ──

pub struct OverviewRow {
    pub filename: String,
    pub title: String,
    pub sections: usize,
    pub subsections: usize,
    pub total_items: usize,
    pub starred_items: usize,
    pub index_items: usize,
    pub cross_references: usize,
}

pub fn fetch_overview(
    conn: &Connection,
    filter: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut stmt = conn.prepare(
        "SELECT d.filename, d.title,
                (SELECT COUNT(*) FROM sections s WHERE s.filename = d.filename AND s.level = 1),
                (SELECT COUNT(*) FROM sections s WHERE s.filename = d.filename AND s.level = 2),
                d.total_items, d.starred_items, d.index_items, d.cross_references
         FROM documents d
         WHERE ?1 IS NULL OR d.filename LIKE '%' || ?1 || '%' OR d.title LIKE '%' || ?1 || '%'
         ORDER BY d.filename
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![filter, limit as i64], |row| {
            Ok(OverviewRow {
                filename: row.get(0)?,
                title: row.get(1)?,
                sections: row.get(2)?,
                subsections: row.get(3)?,
                total_items: row.get(4)?,
                starred_items: row.get(5)?,
                index_items: row.get(6)?,
                cross_references: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub documents: usize,
    pub sections: usize,
    pub subsections: usize,
    pub items: usize,
    pub starred: usize,
    pub index: usize,
    pub cross_references: usize,
    /// (link_type, count), most frequent first.
    pub links_by_type: Vec<(String, usize)>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let documents: usize = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
    let sections: usize =
        conn.query_row("SELECT COUNT(*) FROM sections WHERE level = 1", [], |r| r.get(0))?;
    let subsections: usize =
        conn.query_row("SELECT COUNT(*) FROM sections WHERE level = 2", [], |r| r.get(0))?;
    let (items, starred, index, cross_references): (usize, usize, usize, usize) = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(is_starred), 0),
                COALESCE(SUM(is_index), 0),
                COALESCE(SUM(is_cross_reference), 0)
         FROM items",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )?;

    let mut stmt = conn.prepare(
        "SELECT link_type, COUNT(*) AS n FROM links GROUP BY link_type ORDER BY n DESC, link_type",
    )?;
    let links_by_type = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Stats {
        documents,
        sections,
        subsections,
        items,
        starred,
        index,
        cross_references,
        links_by_type,
    })
}
