use std::fs;
use std::path::{Path, PathBuf};

use hideset_core::hide_set::{ElementKind, ElementRef, HideSet};
use hideset_core::scene::Scene;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// 导出文件的格式版本。
pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid document {path:?}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 导出文件中的一条成员记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub object: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub pid: i64,
    pub hidden: bool,
}

impl From<&ElementRef> for ElementRecord {
    fn from(element: &ElementRef) -> Self {
        Self {
            object: element.object_name.clone(),
            kind: element.kind,
            pid: element.pid,
            hidden: element.saved_hidden,
        }
    }
}

/// 隐藏集合的导出文档。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideSetDocument {
    pub version: u32,
    pub name: String,
    pub mode: ElementKind,
    pub elements: Vec<ElementRecord>,
}

impl From<&HideSet> for HideSetDocument {
    fn from(set: &HideSet) -> Self {
        Self {
            version: EXPORT_VERSION,
            name: set.name().to_string(),
            mode: set.mode(),
            elements: set.elements().iter().map(ElementRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// 是否输出带缩进的 JSON。
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> Result<String, IoError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn write_text(path: &Path, text: &str) -> Result<(), IoError> {
    fs::write(path, text).map_err(|source| IoError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// 把隐藏集合写成导出文档，错误原样返回。
pub fn write_hide_set(path: &Path, set: &HideSet, options: ExportOptions) -> Result<(), IoError> {
    let document = HideSetDocument::from(set);
    write_text(path, &encode(&document, options.pretty)?)
}

/// 导出隐藏集合。失败时记录日志并返回 `false`，不向外传播错误。
pub fn export_hide_set(path: &Path, set: &HideSet) -> bool {
    export_hide_set_with(path, set, ExportOptions::default())
}

pub fn export_hide_set_with(path: &Path, set: &HideSet, options: ExportOptions) -> bool {
    match write_hide_set(path, set, options) {
        Ok(()) => {
            debug!(set = set.name(), path = %path.display(), members = set.len(), "已导出隐藏集合");
            true
        }
        Err(err) => {
            error!(set = set.name(), error = %err, "导出隐藏集合失败");
            false
        }
    }
}

pub trait SceneLoader {
    fn load(&self, path: &Path) -> Result<Scene, IoError>;
}

pub trait SceneSaver {
    fn save(&self, scene: &Scene, path: &Path) -> Result<(), IoError>;
}

/// 以 JSON 保存整个场景，包括持久 ID 层、隐藏集合与 ID 计数器。
#[derive(Debug, Clone, Copy)]
pub struct JsonFacade {
    pretty: bool,
}

impl JsonFacade {
    pub fn new() -> Self {
        Self::with_pretty(true)
    }

    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLoader for JsonFacade {
    fn load(&self, path: &Path) -> Result<Scene, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| IoError::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SceneSaver for JsonFacade {
    fn save(&self, scene: &Scene, path: &Path) -> Result<(), IoError> {
        write_text(path, &encode(scene, self.pretty)?)?;
        debug!(path = %path.display(), objects = scene.objects().len(), "场景已保存");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hideset_core::mesh::MeshKind;

    use super::*;

    #[test]
    fn document_mirrors_the_hide_set() {
        let mut set = HideSet::new("Legs", ElementKind::Edge);
        set.add_unique(ElementRef::mesh("Table", MeshKind::Edge, 7, true))
            .unwrap();
        set.add_unique(ElementRef::mesh("Chair", MeshKind::Edge, 2, false))
            .unwrap();

        let document = HideSetDocument::from(&set);
        assert_eq!(document.version, EXPORT_VERSION);
        assert_eq!(document.mode, ElementKind::Edge);
        assert_eq!(
            document.elements[1],
            ElementRecord {
                object: "Chair".to_string(),
                kind: ElementKind::Edge,
                pid: 2,
                hidden: false,
            }
        );
    }

    #[test]
    fn compact_encoding_has_no_newlines() {
        let set = HideSet::new("Empty", ElementKind::Object);
        let text = encode(&HideSetDocument::from(&set), false).unwrap();
        assert_eq!(
            text,
            r#"{"version":1,"name":"Empty","mode":"OBJECT","elements":[]}"#
        );
    }
}
