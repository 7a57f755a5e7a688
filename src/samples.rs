//! Seeding the catalog and photo directories with sample images.
//!
//! Two sources are supported: a fixed list of downloadable images, and a
//! local directory holding the bundled sample set. Both fill
//! `catalog/clothing`, `catalog/accessories` and `uploads/user_images`.

use image::{DynamicImage, ImageFormat};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::state::data::Category;

/// A downloadable sample, saved as `<name>.<ext>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteSample {
    pub name: &'static str,
    pub url: &'static str,
}

const fn remote(name: &'static str, url: &'static str) -> RemoteSample {
    RemoteSample { name, url }
}

pub const CLOTHING_SAMPLES: [RemoteSample; 5] = [
    remote("blue_tshirt", "https://i.imgur.com/7UEi8WL.png"),
    remote("red_dress", "https://i.imgur.com/JA5H93L.png"),
    remote("black_jacket", "https://i.imgur.com/hD1cF92.png"),
    remote("floral_blouse", "https://i.imgur.com/L7J8SsH.png"),
    remote("striped_sweater", "https://i.imgur.com/2YVc7FZ.png"),
];

pub const ACCESSORY_SAMPLES: [RemoteSample; 5] = [
    remote("gold_necklace", "https://i.imgur.com/Rj8GQXk.png"),
    remote("leather_bag", "https://i.imgur.com/K5SIReY.png"),
    remote("sunglasses", "https://i.imgur.com/xpe82X7.png"),
    remote("silver_bracelet", "https://i.imgur.com/VQBSgrj.png"),
    remote("wristwatch", "https://i.imgur.com/g98wNzM.png"),
];

pub const SAMPLE_PERSON: RemoteSample =
    remote("sample_person", "https://i.imgur.com/ZqMN3bB.jpg");

/// Bundled sample files, by the directory they are copied into
pub const BUNDLED_CLOTHING: [&str; 2] = ["woman-shirt.png", "woman-jeans.png"];
pub const BUNDLED_ACCESSORIES: [&str; 1] = ["woman-shoes.png"];
pub const BUNDLED_USER_PHOTOS: [&str; 1] = ["priya_1.png"];

/// One file to fetch and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: &'static str,
    pub path: PathBuf,
}

/// Every download with its destination: the person photo first, then
/// clothing, then accessories
pub fn download_targets(config: &AppConfig) -> Vec<DownloadTarget> {
    let person = DownloadTarget {
        url: SAMPLE_PERSON.url,
        path: config
            .user_images_dir()
            .join(format!("{}.jpg", SAMPLE_PERSON.name)),
    };

    let catalog = [
        (Category::Clothing, &CLOTHING_SAMPLES),
        (Category::Accessory, &ACCESSORY_SAMPLES),
    ]
    .into_iter()
    .flat_map(|(category, samples)| {
        let dir = config.catalog_dir(category);
        samples.iter().map(move |sample| DownloadTarget {
            url: sample.url,
            path: dir.join(format!("{}.png", sample.name)),
        })
    });

    std::iter::once(person).chain(catalog).collect()
}

/// `(from, to)` pairs for copying the bundled set out of `source_dir`
pub fn copy_targets(source_dir: &Path, config: &AppConfig) -> Vec<(PathBuf, PathBuf)> {
    let groups: [(&[&str], PathBuf); 3] = [
        (&BUNDLED_CLOTHING, config.catalog_dir(Category::Clothing)),
        (&BUNDLED_ACCESSORIES, config.catalog_dir(Category::Accessory)),
        (&BUNDLED_USER_PHOTOS, config.user_images_dir()),
    ];

    groups
        .iter()
        .flat_map(|(names, dir)| {
            names
                .iter()
                .map(move |name| (source_dir.join(name), dir.join(name)))
        })
        .collect()
}

/// Copy the bundled sample set; missing sources are logged and skipped.
/// Returns the number of files copied.
pub fn copy_samples(source_dir: &Path, config: &AppConfig) -> usize {
    let mut copied = 0;

    for (from, to) in copy_targets(source_dir, config) {
        if !from.is_file() {
            warn!("⚠️  Sample not found: {}", from.display());
            continue;
        }
        let result = to
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::copy(&from, &to));
        match result {
            Ok(_) => {
                info!("📋 Copied {} to {}", from.display(), to.display());
                copied += 1;
            }
            Err(e) => warn!("⚠️  Could not copy {}: {}", from.display(), e),
        }
    }

    copied
}

/// Download every sample; failures are logged and skipped.
/// Returns the number of files saved.
pub async fn download_samples(config: &AppConfig) -> usize {
    let client = reqwest::Client::new();
    let mut saved = 0;

    for target in download_targets(config) {
        match download_sample(&client, &target).await {
            Ok(()) => {
                info!("⬇️  Downloaded {}", target.path.display());
                saved += 1;
            }
            Err(e) => warn!("⚠️  Error downloading {}: {}", target.url, e),
        }
    }

    info!("Sample download completed ({} files)", saved);
    saved
}

async fn download_sample(client: &reqwest::Client, target: &DownloadTarget) -> AppResult<()> {
    let bytes = client
        .get(target.url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let path = target.path.clone();
    tokio::task::spawn_blocking(move || save_sample(&bytes, &path))
        .await
        .map_err(|e| AppError::Join(e.to_string()))?
}

/// Decode downloaded bytes and save them in the format the file name asks for
pub fn save_sample(bytes: &[u8], path: &Path) -> AppResult<()> {
    let img = image::load_from_memory(bytes)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }

    match ImageFormat::from_path(path)? {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()).save(path)?,
        format => img.save_with_format(path, format)?,
    }
    Ok(())
}
