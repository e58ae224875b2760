//! Registry operations on the `images` table
//!
//! Column names follow the archived schema: `Img` (source path),
//! `encryptedImg`, `keyImg` (hex key), `decryptedImg`.

use std::path::PathBuf;

use rusqlite::{params, OptionalExtension, Row};

use crate::db::image_db_conn::SqliteRegistry;
use crate::db::registry::{ImageRecord, NewImageRecord, RecordRegistry};
use crate::CoreResult as Result;

const SELECT_COLUMNS: &str =
    "SELECT imageID, Img, encryptedImg, keyImg, decryptedImg, createdAt FROM images";

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        id: row.get(0)?,
        source_path: PathBuf::from(row.get::<_, String>(1)?),
        encrypted_path: PathBuf::from(row.get::<_, String>(2)?),
        key_hex: row.get(3)?,
        decrypted_path: PathBuf::from(row.get::<_, String>(4)?),
        created_at: row.get(5)?,
    })
}

impl RecordRegistry for SqliteRegistry {
    fn insert(&self, record: &NewImageRecord) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO images (Img, encryptedImg, keyImg, decryptedImg, createdAt) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.source_path.to_string_lossy(),
                record.encrypted_path.to_string_lossy(),
                &record.key_hex,
                record.decrypted_path.to_string_lossy(),
                &record.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn lookup(&self, id: i64) -> Result<Option<ImageRecord>> {
        let record = self
            .conn()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE imageID = ?1"),
                [id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ImageRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY imageID"))?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}
