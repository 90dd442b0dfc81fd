//! 持久 ID：属性层管理、ID 分配与 ID → 元素句柄的解析表。

use std::collections::HashMap;

use hideset_core::hide_set::{ElementKind, PidCounter};
use hideset_core::mesh::{ElementHandle, LayerId, Mesh, MeshError, MeshKind};
use tracing::{debug, error, warn};

pub const VERT_LAYER: &str = "hm_vid";
pub const EDGE_LAYER: &str = "hm_eid";
pub const FACE_LAYER: &str = "hm_fid";

#[inline]
pub fn layer_name(kind: MeshKind) -> &'static str {
    match kind {
        MeshKind::Vert => VERT_LAYER,
        MeshKind::Edge => EDGE_LAYER,
        MeshKind::Face => FACE_LAYER,
    }
}

/// 三类元素的持久 ID 层。任一为 `None` 时，该类元素的 ID 均不可读写。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdLayers {
    pub vert: Option<LayerId>,
    pub edge: Option<LayerId>,
    pub face: Option<LayerId>,
}

impl IdLayers {
    #[inline]
    pub fn get(&self, kind: MeshKind) -> Option<LayerId> {
        match kind {
            MeshKind::Vert => self.vert,
            MeshKind::Edge => self.edge,
            MeshKind::Face => self.face,
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.vert.is_some() && self.edge.is_some() && self.face.is_some()
    }
}

/// 查找已存在的持久 ID 层，不创建。
pub fn find_layers(mesh: &Mesh) -> IdLayers {
    IdLayers {
        vert: mesh.int_layer(MeshKind::Vert, VERT_LAYER),
        edge: mesh.int_layer(MeshKind::Edge, EDGE_LAYER),
        face: mesh.int_layer(MeshKind::Face, FACE_LAYER),
    }
}

/// 获取或创建三类持久 ID 层。新层对已有元素取值为 0。
///
/// 宿主拒绝创建时记录错误并返回全空，调用方应视为没有任何元素可解析。
pub fn ensure_layers(mesh: &mut Mesh) -> IdLayers {
    match try_ensure_layers(mesh) {
        Ok(layers) => layers,
        Err(err) => {
            error!(error = %err, "无法创建持久 ID 层");
            IdLayers::default()
        }
    }
}

fn try_ensure_layers(mesh: &mut Mesh) -> Result<IdLayers, MeshError> {
    let mut ensure = |kind: MeshKind| -> Result<LayerId, MeshError> {
        let name = layer_name(kind);
        match mesh.int_layer(kind, name) {
            Some(layer) => Ok(layer),
            None => {
                debug!(layer = name, "创建持久 ID 层");
                mesh.add_int_layer(kind, name)
            }
        }
    };
    Ok(IdLayers {
        vert: Some(ensure(MeshKind::Vert)?),
        edge: Some(ensure(MeshKind::Edge)?),
        face: Some(ensure(MeshKind::Face)?),
    })
}

/// 读取元素的持久 ID；未分配（≤ 0）或层不可用时返回 `None`。
pub fn read_pid(mesh: &Mesh, layers: &IdLayers, handle: ElementHandle) -> Option<i64> {
    let layer = layers.get(handle.kind())?;
    mesh.layer_value(handle, layer).filter(|pid| *pid > 0)
}

/// 若元素尚无持久 ID 则从计数器分配一个并写入。
///
/// 已有 ID 原样返回且不推进计数器。层不可用、计数器耗尽或写入失败时返回 `None`。
/// 只应对用户正在登记的元素调用。
pub fn assign_if_missing(
    mesh: &mut Mesh,
    layers: &IdLayers,
    handle: ElementHandle,
    counter: &mut PidCounter,
) -> Option<i64> {
    let layer = layers.get(handle.kind())?;
    let current = mesh.layer_value(handle, layer)?;
    if current > 0 {
        return Some(current);
    }
    let Some(pid) = counter.available() else {
        warn!(?handle, "持久 ID 计数器已耗尽");
        return None;
    };
    match mesh.set_layer_value(handle, layer, pid) {
        Ok(()) => counter.issue(),
        Err(err) => {
            warn!(?handle, error = %err, "写入持久 ID 失败");
            None
        }
    }
}

/// 某一网格在当前拓扑下的 ID → 句柄解析表。
#[derive(Debug, Clone, Default)]
pub struct PidMaps {
    verts: HashMap<i64, ElementHandle>,
    edges: HashMap<i64, ElementHandle>,
    faces: HashMap<i64, ElementHandle>,
}

impl PidMaps {
    /// 扫描全部元素构建解析表。未分配 ID 的元素不入表；ID 冲突时后扫描到的元素胜出。
    pub fn build(mesh: &Mesh) -> Self {
        let layers = find_layers(mesh);
        let mut maps = Self::default();
        for kind in MeshKind::ALL {
            let Some(layer) = layers.get(kind) else {
                continue;
            };
            let table = maps.table_mut(kind);
            for handle in mesh.handles(kind) {
                if let Some(pid) = mesh.layer_value(handle, layer).filter(|pid| *pid > 0) {
                    table.insert(pid, handle);
                }
            }
        }
        maps
    }

    /// 对象类别或未知 ID 返回 `None`。
    #[inline]
    pub fn resolve(&self, kind: ElementKind, pid: i64) -> Option<ElementHandle> {
        let kind = kind.mesh_kind()?;
        self.table(kind).get(&pid).copied()
    }

    #[inline]
    pub fn len(&self, kind: MeshKind) -> usize {
        self.table(kind).len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        MeshKind::ALL.into_iter().all(|kind| self.len(kind) == 0)
    }

    fn table(&self, kind: MeshKind) -> &HashMap<i64, ElementHandle> {
        match kind {
            MeshKind::Vert => &self.verts,
            MeshKind::Edge => &self.edges,
            MeshKind::Face => &self.faces,
        }
    }

    fn table_mut(&mut self, kind: MeshKind) -> &mut HashMap<i64, ElementHandle> {
        match kind {
            MeshKind::Vert => &mut self.verts,
            MeshKind::Edge => &mut self.edges,
            MeshKind::Face => &mut self.faces,
        }
    }
}

#[inline]
pub fn build_maps(mesh: &Mesh) -> PidMaps {
    PidMaps::build(mesh)
}
