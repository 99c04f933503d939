use std::{
    error::Error,
    io::Cursor,
    path::{Path, PathBuf},
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use image::{ImageFormat, Rgb, RgbImage};
use rusqlite::Connection;
use time::OffsetDateTime;

use wedding_gallery::{
    Category, GalleryConfig, LocalObjectStorage, PasswordHash, PhotoStore, SqlitePhotoStore,
    UploadFile, ValidatedPassword, initialize_db, process_upload, upsert_user,
};

/// A utility for creating a test database for the wedding gallery server.
///
/// The database has the password "test" and a few generated photos in every category.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The folder to write the sample photos to.
    #[arg(long, default_value = "media")]
    media_dir: PathBuf,
}

const PHOTOS_PER_CATEGORY: u32 = 3;

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Setting the password to \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    upsert_user(password_hash, &conn)?;

    println!("Creating sample photos in {:#?}...", args.media_dir);

    let storage = LocalObjectStorage::new(&args.media_dir)?;
    let photos = SqlitePhotoStore::new(Arc::new(Mutex::new(conn)));
    let config = GalleryConfig::default();
    let start_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let mut count = 0;

    for (category_index, category) in Category::ALL.into_iter().enumerate() {
        for i in 0..PHOTOS_PER_CATEGORY {
            let file = UploadFile {
                file_name: format!("{}_{}.png", category.as_str().to_lowercase(), i + 1),
                content_type: Some("image/png".to_owned()),
                bytes: sample_image(category_index as u32, i)?,
            };

            let new_photo =
                process_upload(&file, category, start_ms + count, &config, &storage)?;
            photos.create(new_photo)?;
            count += 1;
        }
    }

    println!("Created {count} photos. Success!");

    Ok(())
}

/// A landscape or portrait gradient, tinted differently for each category.
fn sample_image(category_index: u32, photo_index: u32) -> Result<Vec<u8>, image::ImageError> {
    let (width, height) = if photo_index % 2 == 0 {
        (1600, 1067)
    } else {
        (1067, 1600)
    };
    let tint = (category_index * 50 % 256) as u8;

    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            tint.wrapping_add((photo_index * 40) as u8),
        ])
    });

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(bytes)
}
