//! Dock tile records.

use std::path::Path;

use plist::Value;
use serde::{Deserialize, Serialize};
use url::Url;

/// `file-type` value the Dock uses for application bundles.
pub const APPLICATION_FILE_TYPE: i64 = 41;
/// `_CFURLStringType` value for an absolute URL string.
pub const ABSOLUTE_URL_STRING_TYPE: i64 = 15;
/// `tile-type` of application and document tiles.
pub const FILE_TILE: &str = "file-tile";

/// A pinned application tile built from an application bundle path.
///
/// Entries are constructed once from a path and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DockEntry {
    path: String,
    label: String,
    url: String,
}

impl DockEntry {
    /// Builds the tile for the application bundle at `path`.
    ///
    /// The bundle is not required to exist. The label is the bundle name without its extension
    /// and the URL is the percent-encoded directory URL of the bundle.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` is empty or not absolute.
    pub fn for_app(path: &str) -> Result<Self, String> {
        if path.trim().is_empty() {
            return Err("application path is empty".to_string());
        }
        let bundle = Path::new(path);
        if !bundle.is_absolute() {
            return Err(format!("application path `{path}` is not absolute"));
        }
        let label = bundle
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| format!("application path `{path}` has no bundle name"))?;
        let url = Url::from_directory_path(bundle)
            .map_err(|()| format!("application path `{path}` cannot be expressed as a file URL"))?;

        Ok(Self {
            path: path.to_string(),
            label,
            url: url.to_string(),
        })
    }

    /// Source path the entry was built from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Display name shown under the tile.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// `file://` URL the Dock launches and takes the icon from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Converts the entry into the dictionary layout stored under `persistent-apps`.
    ///
    /// # Errors
    ///
    /// Returns an error when plist serialization fails.
    pub fn to_value(&self) -> Result<Value, String> {
        let record = TileRecord {
            tile_data: TileData {
                file_data: Some(FileData {
                    url: self.url.clone(),
                    url_type: ABSOLUTE_URL_STRING_TYPE,
                }),
                file_label: Some(self.label.clone()),
                file_type: Some(APPLICATION_FILE_TYPE),
            },
            tile_type: FILE_TILE.to_string(),
        };
        plist::to_value(&record).map_err(|e| e.to_string())
    }
}

/// Read-only view of a tile already present in a `persistent-apps` list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DockTile {
    /// An application or document tile.
    File { label: String, url: Option<String> },
    /// Spacers and any other tile kind, identified by its `tile-type`.
    Other { tile_type: String },
}

impl DockTile {
    /// Interprets one element of a `persistent-apps` array.
    ///
    /// Unknown keys such as `GUID` or `dock-extra` are ignored. Values that are not tile
    /// dictionaries yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record: TileRecord = plist::from_value(value).ok()?;
        if record.tile_type != FILE_TILE {
            return Some(Self::Other {
                tile_type: record.tile_type,
            });
        }
        Some(Self::File {
            label: record.tile_data.file_label.unwrap_or_default(),
            url: record.tile_data.file_data.map(|data| data.url),
        })
    }

    /// Label for display, falling back to the tile type for non-file tiles.
    pub fn display_name(&self) -> &str {
        match self {
            Self::File { label, .. } => label,
            Self::Other { tile_type } => tile_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "tile-data", default)]
    tile_data: TileData,
    #[serde(rename = "tile-type")]
    tile_type: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TileData {
    #[serde(rename = "file-data", default, skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
    #[serde(rename = "file-label", default, skip_serializing_if = "Option::is_none")]
    file_label: Option<String>,
    #[serde(rename = "file-type", default, skip_serializing_if = "Option::is_none")]
    file_type: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileData {
    #[serde(rename = "_CFURLString")]
    url: String,
    #[serde(rename = "_CFURLStringType")]
    url_type: i64,
}
