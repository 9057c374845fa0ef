//! Reading and writing per-language resource files.
//!
//! Files live at `<root>/<language>/<resource name>`. A missing file reads as
//! an empty map. Writes are all-or-nothing: the new content goes to a
//! temporary file in the destination directory which is then renamed over
//! the old file.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{error::Error, strings, types::ResourceMap};

/// Resource files of one name under one root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStore {
    root: PathBuf,
    resource_name: String,
}

impl ResourceStore {
    pub fn new(root: impl Into<PathBuf>, resource_name: impl Into<String>) -> Self {
        ResourceStore {
            root: root.into(),
            resource_name: resource_name.into(),
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Path of the resource file for `language`.
    pub fn path_for(&self, language: &str) -> PathBuf {
        self.root.join(language).join(&self.resource_name)
    }

    pub fn load(&self, language: &str) -> Result<ResourceMap, Error> {
        read_resource(self.path_for(language))
    }

    pub fn save(&self, language: &str, map: &ResourceMap) -> Result<(), Error> {
        write_resource(self.path_for(language), map)
    }
}

/// Loads the resource file at `path`.
///
/// Returns an empty map when the file does not exist. UTF-16 files with a
/// byte order mark are decoded transparently.
pub fn read_resource<P: AsRef<Path>>(path: P) -> Result<ResourceMap, Error> {
    let path = path.as_ref();
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            return Ok(ResourceMap::new());
        }
        Err(source) => {
            return Err(Error::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);
    let mut content = String::new();
    if let Err(source) = decoder.read_to_string(&mut content) {
        return Err(match source.kind() {
            io::ErrorKind::InvalidData => Error::malformed(path, 0, "file is not valid UTF-8"),
            _ => Error::ReadFailed {
                path: path.to_path_buf(),
                source,
            },
        });
    }
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    strings::parse(content).map_err(|e| Error::malformed(path, e.line, e.reason))
}

/// Replaces the resource file at `path` with the rendered `map`.
///
/// The parent directory is created when missing. If the directory cannot be
/// created or written to, [`Error::PathUnavailable`] is returned; if the new
/// content cannot be written or moved into place, [`Error::WriteFailed`].
/// In both cases any previous file at `path` is left as it was.
///
/// A replaced file keeps its permissions; a new one is created as `0644` on
/// Unix.
pub fn write_resource<P: AsRef<Path>>(path: P, map: &ResourceMap) -> Result<(), Error> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let unavailable = |source: io::Error| Error::PathUnavailable {
        path: dir.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(unavailable)?;
    if !dir.is_dir() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    let mut temp = NamedTempFile::new_in(dir).map_err(unavailable)?;

    let write_failed = |source: io::Error| Error::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    temp.write_all(strings::render(map).as_bytes())
        .map_err(write_failed)?;
    temp.as_file().sync_all().map_err(write_failed)?;
    let permissions = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Some(metadata.permissions()),
        _ => default_permissions(),
    };
    if let Some(permissions) = permissions {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(write_failed)?;
    }
    temp.persist(path).map_err(|e| write_failed(e.error))?;

    log::debug!("wrote {} entries to {}", map.len(), path.display());
    Ok(())
}

// Temporary files start out as 0600.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
