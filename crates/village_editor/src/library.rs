//! Uploaded images and placeholder textures for the asset library

use bevy::asset::RenderAssetUsages;
use bevy::image::Image;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Edge length of generated placeholder images
pub const PLACEHOLDER_SIZE: u32 = 32;

const BORDER_COLOR: [u8; 4] = [24, 24, 27, 255];

#[derive(Debug, Error)]
pub enum AssetUploadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Embedded image is not a base64 data URL")]
    NotDataUrl,
    #[error("Embedded image data is corrupt: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Could not decode embedded image: {0}")]
    Embedded(#[source] image::ImageError),
}

/// A picked image file, ready to become a custom asset
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    /// The file contents as a `data:` URL, so exported maps carry the image
    pub source: String,
    /// File name, used as the asset name
    pub name: String,
    pub width: u32,
    pub height: u32,
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, AssetUploadError> {
    std::fs::read(path).map_err(|source| AssetUploadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Native pixel size of an image file
pub fn read_image_size(path: &Path) -> Result<(u32, u32), AssetUploadError> {
    let bytes = read_bytes(path)?;
    image_size(&bytes).map_err(|source| AssetUploadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn image_size(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Encode raw file contents as a base64 `data:` URL
pub fn to_data_url(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

/// Raw bytes behind a base64 `data:` URL
pub fn decode_data_url(source: &str) -> Result<Vec<u8>, AssetUploadError> {
    let rest = source
        .strip_prefix("data:")
        .ok_or(AssetUploadError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(AssetUploadError::NotDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(AssetUploadError::NotDataUrl);
    }
    Ok(BASE64_STANDARD.decode(payload.trim())?)
}

/// Decode an embedded asset source into a texture
pub fn embedded_image(source: &str) -> Result<Image, AssetUploadError> {
    let bytes = decode_data_url(source)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(AssetUploadError::Embedded)?
        .to_rgba8();
    let (width, height) = decoded.dimensions();

    Ok(Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        decoded.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    ))
}

/// Read an image file for upload, embedding its contents in the asset source
pub fn upload_from_path(path: &Path) -> Result<UploadedImage, AssetUploadError> {
    let bytes = read_bytes(path)?;
    let (width, height) = image_size(&bytes).map_err(|source| AssetUploadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(UploadedImage {
        source: to_data_url(&bytes),
        name: file_name(path),
        width,
        height,
    })
}

/// The same upload when the file exists but can't be decoded, sized like a placeholder
pub fn placeholder_upload(path: &Path) -> UploadedImage {
    let bytes = std::fs::read(path).unwrap_or_default();
    UploadedImage {
        source: to_data_url(&bytes),
        name: file_name(path),
        width: PLACEHOLDER_SIZE,
        height: PLACEHOLDER_SIZE,
    }
}

/// Fill color for a placeholder, picked from the asset name
pub fn placeholder_color(name: &str) -> [u8; 4] {
    let name = name.to_lowercase();
    if name.contains("grass") {
        [74, 222, 128, 255]
    } else if name.contains("water") {
        [56, 189, 248, 255]
    } else if name.contains("tree") {
        [22, 101, 52, 255]
    } else if name.contains("rock") {
        [120, 113, 108, 255]
    } else {
        [113, 113, 122, 255]
    }
}

/// Solid square with a one pixel dark border
pub fn placeholder_image(name: &str) -> Image {
    let fill = placeholder_color(name);
    let size = PLACEHOLDER_SIZE;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let edge = x == 0 || y == 0 || x == size - 1 || y == size - 1;
            data.extend_from_slice(if edge { &BORDER_COLOR } else { &fill });
        }
    }

    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}
