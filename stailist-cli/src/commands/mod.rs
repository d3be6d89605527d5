// File: src/commands/mod.rs

pub mod stylist;
pub mod wardrobe;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use stailist_common::models::{ClothingCategory, Fit, GraphicSize, InlineImage};
use stailist_core::{Error, Persisted, WardrobeStore};

use crate::config::AppConfig;

/// Longest side of a stored profile photo, in pixels.
const MAX_PHOTO_DIM: u32 = 800;
const PHOTO_JPEG_QUALITY: u8 = 80;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show every item in the wardrobe
    List,

    /// Add an item; missing fields can be filled in by AI autofill
    Add(wardrobe::AddArgs),

    /// Remove an item by id
    Remove { id: String },

    /// Show or replace the personal profile
    #[command(subcommand)]
    Profile(wardrobe::ProfileCommand),

    /// Write wardrobe and profile to a JSON file
    Export { path: PathBuf },

    /// Replace wardrobe and profile with a previously exported file
    Import { path: PathBuf },

    /// Wardrobe counts, completeness and quick tips
    Stats,

    /// Ask the stylist for an outfit matching a vibe
    Recommend {
        /// e.g. "rainy tuesday", "first date", "gym"
        vibe: String,

        /// Also render the profile photo wearing the outfit, saved here
        #[arg(long)]
        try_on: Option<PathBuf>,
    },

    /// Guess item details from a description or a photo
    #[command(subcommand)]
    Autofill(stylist::AutofillCommand),

    /// Ask what to buy next
    Suggest,
}

/// Run one command against the session store and return what to print.
pub async fn dispatch(command: Command, config: &AppConfig, store: &mut WardrobeStore) -> Result<String, Error> {
    match command {
        Command::List => Ok(wardrobe::list(store)),
        Command::Add(args) => wardrobe::add(args, config, store).await,
        Command::Remove { id } => Ok(wardrobe::remove(&id, store).await),
        Command::Profile(cmd) => wardrobe::profile(cmd, store).await,
        Command::Export { path } => wardrobe::export(&path, store).await,
        Command::Import { path } => wardrobe::import(&path, store).await,
        Command::Stats => Ok(wardrobe::stats(store)),
        Command::Recommend { vibe, try_on } => {
            stylist::recommend(&vibe, try_on.as_deref(), config, store).await
        }
        Command::Autofill(cmd) => stylist::autofill(cmd, config).await,
        Command::Suggest => stylist::suggest(config, store).await,
    }
}

/// Append the persistence notice, if any, to a command's output.
pub fn with_notice<T>(message: String, persisted: &Persisted<T>) -> String {
    match &persisted.notice {
        Some(notice) => format!("{}\nWarning: {}", message, notice),
        None => message,
    }
}

pub fn parse_category(raw: &str) -> Result<ClothingCategory, String> {
    ClothingCategory::parse_loose(raw).ok_or_else(|| {
        let known: Vec<&str> = ClothingCategory::ALL.iter().map(|c| c.label()).collect();
        format!("unknown type '{}', expected one of: {}", raw, known.join(", "))
    })
}

pub fn parse_fit(raw: &str) -> Result<Fit, String> {
    Fit::parse_loose(raw).ok_or_else(|| format!("unknown fit '{}', expected Baggy, Regular or Tight", raw))
}

pub fn parse_design(raw: &str) -> Result<GraphicSize, String> {
    GraphicSize::parse_loose(raw)
        .ok_or_else(|| format!("unknown design '{}', expected None, Subtle or Large", raw))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

async fn read_image_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::InvalidInput(format!("could not read image {} ({})", path.display(), e)))?;
    if bytes.is_empty() {
        return Err(Error::InvalidInput(format!("{} is empty", path.display())));
    }
    Ok(bytes)
}

pub async fn load_image(path: &Path) -> Result<InlineImage, Error> {
    let bytes = read_image_bytes(path).await?;
    Ok(InlineImage::from_bytes(mime_for(path), &bytes))
}

/// Scale a photo to fit within `MAX_PHOTO_DIM` and re-encode it as JPEG.
fn shrink_photo(bytes: &[u8]) -> Result<InlineImage, Error> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| Error::InvalidInput(format!("not a readable image ({})", e)))?;
    let img = if img.width() > MAX_PHOTO_DIM || img.height() > MAX_PHOTO_DIM {
        img.resize(MAX_PHOTO_DIM, MAX_PHOTO_DIM, FilterType::Triangle)
    } else {
        img
    };

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, PHOTO_JPEG_QUALITY)
        .encode_image(&img.to_rgb8())
        .map_err(|e| Error::InvalidInput(format!("could not encode photo ({})", e)))?;
    debug!("Photo stored as {}x{} JPEG, {} bytes", img.width(), img.height(), out.len());
    Ok(InlineImage::from_bytes("image/jpeg", &out))
}

/// Profile photos are kept in the wardrobe document and sent with every
/// try-on, so they are stored scaled down.
pub async fn load_profile_photo(path: &Path) -> Result<InlineImage, Error> {
    let bytes = read_image_bytes(path).await?;
    shrink_photo(&bytes)
}

pub async fn save_image(path: &Path, image: &InlineImage) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, image.decode()?).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_category("tee"), Ok(ClothingCategory::TShirt));
        assert!(parse_category("cape").unwrap_err().contains("T-Shirt"));
        assert_eq!(parse_fit("SLIM"), Ok(Fit::Tight));
        assert_eq!(parse_design("large graphic"), Ok(GraphicSize::Large));
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for(Path::new("me.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("me")), "image/jpeg");
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbImage::from_pixel(width, height, image::Rgb([180, 40, 40]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_large_photo_is_scaled_down_to_jpeg() -> Result<(), Error> {
        let photo = shrink_photo(&png(1600, 900))?;
        assert_eq!(photo.mime_type, "image/jpeg");
        let stored = image::load_from_memory(&photo.decode()?).unwrap();
        assert_eq!((stored.width(), stored.height()), (800, 450));

        let small = shrink_photo(&png(300, 200))?;
        let stored = image::load_from_memory(&small.decode()?).unwrap();
        assert_eq!((stored.width(), stored.height()), (300, 200));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_photo_is_invalid_input() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("me.jpg");
        tokio::fs::write(&path, b"not an image").await?;
        assert!(matches!(load_profile_photo(&path).await, Err(Error::InvalidInput(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_image_round_trip_through_disk() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out").join("look.png");
        let image = InlineImage::from_bytes("image/png", b"not really a png");
        save_image(&path, &image).await?;
        assert_eq!(load_image(&path).await?, image);
        Ok(())
    }
}
