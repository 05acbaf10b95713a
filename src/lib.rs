//! Resource pack creator library
//!
//! Exposes a small API to assemble a Minecraft resource pack from a texture file,
//! an item model file and a custom model data value, and zip the staged pack into
//! a distributable archive.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use walkdir::WalkDir;
use zip::ZipWriter;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PackError>;

/// Default staging directory, relative to the current directory.
pub const DEFAULT_PACK_ROOT: &str = "resources/generated_pack";
/// Default output archive, relative to the current directory.
pub const DEFAULT_ARCHIVE_PATH: &str = "resource_pack.zip";

/// Parent model every override document points at.
pub const OVERRIDE_PARENT: &str = "item/generated";
/// Texture shown when no override predicate matches.
pub const FALLBACK_TEXTURE: &str = "item/diamond_sword";
/// Pack format version written into `pack.mcmeta`.
pub const PACK_FORMAT: u32 = 6;
/// Description written into `pack.mcmeta`.
pub const PACK_DESCRIPTION: &str = "Custom Texture Pack";

const TEXTURES_SUBDIR: &str = "assets/minecraft/textures/item";
const MODELS_SUBDIR: &str = "assets/minecraft/models/item";

/// The four raw user inputs for one generation run.
///
/// `custom_model_data` stays a string here: the numeric parse is part of
/// [`PackRequest::validate`], so a front-end can pass whatever the user typed
/// and get a uniform error back.
#[derive(Debug, Clone)]
pub struct PackRequest {
    pub texture_path: PathBuf,
    pub model_path: PathBuf,
    /// Used verbatim as the override document's file name (path separators are
    /// rejected, anything else goes through untouched).
    pub item_name: String,
    pub custom_model_data: String,
}

impl PackRequest {
    /// Check all four fields are filled out and parse `custom_model_data`.
    /// Runs before any filesystem mutation; a failing request writes nothing.
    pub fn validate(&self) -> Result<i64> {
        if self.texture_path.as_os_str().is_empty()
            || self.model_path.as_os_str().is_empty()
            || self.item_name.is_empty()
            || self.custom_model_data.is_empty()
        {
            return Err(PackError::InvalidInput(
                "all fields must be filled out".to_string(),
            ));
        }
        if self.item_name.contains('/') || self.item_name.contains('\\') {
            return Err(PackError::InvalidInput(format!(
                "item name must not contain path separators: {:?}",
                self.item_name
            )));
        }
        self.custom_model_data.parse::<i64>().map_err(|_| {
            PackError::InvalidInput(format!(
                "custom model data must be a number, got {:?}",
                self.custom_model_data
            ))
        })
    }
}

/// Where the pack is staged and where the archive lands.
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Staging directory. Deleted in full and recreated on every run.
    pub pack_root: PathBuf,
    /// Output zip. Overwritten on every run.
    pub archive_path: PathBuf,
}

impl Default for PackOptions {
    fn default() -> Self {
        PackOptions {
            pack_root: PathBuf::from(DEFAULT_PACK_ROOT),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
        }
    }
}

/// Item override document: maps one custom model data predicate to the
/// supplied model, with a fallback texture for unmatched item instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOverrideDoc {
    pub parent: String,
    pub textures: TextureLayers,
    pub overrides: Vec<ModelOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureLayers {
    pub layer0: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOverride {
    pub predicate: OverridePredicate,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverridePredicate {
    pub custom_model_data: i64,
}

impl ItemOverrideDoc {
    fn for_model(model_base: &str, custom_model_data: i64) -> Self {
        ItemOverrideDoc {
            parent: OVERRIDE_PARENT.to_string(),
            textures: TextureLayers {
                layer0: FALLBACK_TEXTURE.to_string(),
            },
            overrides: vec![ModelOverride {
                predicate: OverridePredicate { custom_model_data },
                model: format!("item/{}", model_base),
            }],
        }
    }
}

/// `pack.mcmeta` contents; constant for every generated pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackMeta {
    pub pack: PackMetaSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackMetaSection {
    pub pack_format: u32,
    pub description: String,
}

impl PackMeta {
    fn current() -> Self {
        PackMeta {
            pack: PackMetaSection {
                pack_format: PACK_FORMAT,
                description: PACK_DESCRIPTION.to_string(),
            },
        }
    }
}

/// Generate a resource pack with the default staging and output paths.
pub fn generate_pack(request: &PackRequest) -> Result<PathBuf> {
    generate_pack_with_options(request, &PackOptions::default())
}

/// Generate a resource pack: validate, reset the staging directory, copy the
/// inputs in, patch the model, write the override document and pack metadata,
/// then zip the whole tree to `opts.archive_path`.
///
/// The pipeline is linear and stops at the first failing step. Files written
/// before a mid-run failure are left on disk; the next run's reset removes
/// them. Concurrent calls sharing one `pack_root` are unsupported.
pub fn generate_pack_with_options(request: &PackRequest, opts: &PackOptions) -> Result<PathBuf> {
    let custom_model_data = request.validate()?;

    reset_pack_root(&opts.pack_root)?;
    let textures_dir = opts.pack_root.join(TEXTURES_SUBDIR);
    let models_dir = opts.pack_root.join(MODELS_SUBDIR);

    let texture_name = file_name_of(&request.texture_path)?;
    let model_name = file_name_of(&request.model_path)?;

    std::fs::copy(&request.texture_path, textures_dir.join(&texture_name))?;
    let copied_model = models_dir.join(&model_name);
    std::fs::copy(&request.model_path, &copied_model)?;

    patch_model_textures(&copied_model, base_name(&texture_name))?;

    let override_doc = ItemOverrideDoc::for_model(base_name(&model_name), custom_model_data);
    let override_path = models_dir.join(format!("{}.json", request.item_name));
    std::fs::write(&override_path, serde_json::to_string_pretty(&override_doc)?)?;

    std::fs::write(
        opts.pack_root.join("pack.mcmeta"),
        serde_json::to_string_pretty(&PackMeta::current())?,
    )?;

    zip_dir_to_file(&opts.pack_root, &opts.archive_path)?;
    Ok(opts.archive_path.clone())
}

/// Delete the staging directory if present and recreate the required subtree.
fn reset_pack_root(pack_root: &Path) -> Result<()> {
    if pack_root.exists() {
        std::fs::remove_dir_all(pack_root)?;
    }
    std::fs::create_dir_all(pack_root.join(TEXTURES_SUBDIR))?;
    std::fs::create_dir_all(pack_root.join(MODELS_SUBDIR))?;
    Ok(())
}

/// Set `textures.layer0` in the copied model file to `item/<texture_base>`,
/// creating the `textures` object if the model has none. Every other field of
/// the document passes through unchanged; the file is rewritten pretty-printed.
fn patch_model_textures(model_path: &Path, texture_base: &str) -> Result<()> {
    let raw = std::fs::read_to_string(model_path)?;
    let mut doc: Value = serde_json::from_str(&raw)?;
    let obj = doc.as_object_mut().ok_or_else(|| {
        PackError::InvalidInput(format!(
            "model file {} is not a json object",
            model_path.display()
        ))
    })?;
    let textures = obj
        .entry("textures")
        .or_insert_with(|| Value::Object(Map::new()));
    match textures.as_object_mut() {
        Some(layers) => {
            layers.insert(
                "layer0".to_string(),
                Value::String(format!("item/{}", texture_base)),
            );
        }
        None => {
            return Err(PackError::InvalidInput(format!(
                "model file {} has a non-object textures field",
                model_path.display()
            )));
        }
    }
    std::fs::write(model_path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PackError::InvalidInput(format!("{} has no file name", path.display())))
}

/// Name before the first `.`: `sword.png` references as `sword`, and a
/// multi-dot name like `my.item.json` truncates to `my`.
pub fn base_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Zip a directory tree into an in-memory archive (returned as `Vec<u8>`).
///
/// The tree's contents sit at the top level of the archive. Entry paths use
/// forward slashes and are sorted, so identical trees zip identically.
pub fn zip_dir_to_bytes(dir: &Path) -> Result<Vec<u8>> {
    if !dir.is_dir() {
        return Err(PackError::InvalidInput(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files: HashMap<String, Vec<u8>> = HashMap::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_file() {
            let rel = path.strip_prefix(dir).unwrap();
            // Use forward slashes as zip paths
            let key = rel
                .iter()
                .map(|p| p.to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let mut f = File::open(path)?;
            let mut buf = Vec::new();
            f.read_to_end(&mut buf)?;
            files.insert(key, buf);
        }
    }

    let buffer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(buffer);
    let options: zip::write::FileOptions<'_, zip::write::ExtendedFileOptions> =
        zip::write::FileOptions::default().unix_permissions(0o644);

    // Ensure deterministic order by sorting keys
    let mut keys: Vec<&String> = files.keys().collect();
    keys.sort();

    for key in keys {
        zip.start_file(key, options.clone())?;
        zip.write_all(&files[key])?;
    }

    let writer = zip.finish()?;
    Ok(writer.into_inner())
}

/// Zip a directory tree and write the archive to `out`, overwriting it.
pub fn zip_dir_to_file(dir: &Path, out: &Path) -> Result<()> {
    let bytes = zip_dir_to_bytes(dir)?;
    std::fs::write(out, bytes)?;
    Ok(())
}
