//! Database operations for photo records.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    photo::{Category, NewPhoto, Photo, PhotoId},
};

/// Insert a photo record and return it with the ID generated by the database.
pub fn insert_photo(photo: NewPhoto, connection: &Connection) -> Result<Photo, Error> {
    let id: String = connection.query_row(
        "INSERT INTO photo (id, url, thumbnail_url, category)
         VALUES (lower(hex(randomblob(16))), ?1, ?2, ?3)
         RETURNING id;",
        (
            &photo.url,
            photo.thumbnail_url.as_deref(),
            photo.category.as_str(),
        ),
        |row| row.get(0),
    )?;

    Ok(photo.with_id(PhotoId::new(&id)))
}

/// Retrieve every photo in the order they were uploaded.
pub fn get_all_photos(connection: &Connection) -> Result<Vec<Photo>, Error> {
    connection
        .prepare("SELECT id, url, thumbnail_url, category FROM photo ORDER BY rowid ASC;")?
        .query_map([], map_row)?
        .map(|maybe_photo| maybe_photo.map_err(|error| error.into()))
        .collect()
}

/// Delete a photo record by ID. Returns an error if the record doesn't exist.
pub fn delete_photo_record(photo_id: &PhotoId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM photo WHERE id = ?1", [photo_id.as_str()])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPhoto);
    }

    Ok(())
}

/// Initialize the photo table.
pub fn create_photo_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS photo (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            thumbnail_url TEXT,
            category TEXT
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Photo, rusqlite::Error> {
    let raw_id: String = row.get(0)?;
    let url = row.get(1)?;
    let thumbnail_url = row.get(2)?;
    let raw_category: Option<String> = row.get(3)?;

    Ok(Photo {
        id: PhotoId::new(&raw_id),
        url,
        thumbnail_url,
        category: Category::from_stored_label(raw_category.as_deref()),
    })
}
