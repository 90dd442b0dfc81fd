//! 网格编辑会话。
//!
//! 对象已处于编辑模式时直接借用宿主的实时编辑网格；否则从持久化网格复制一份临时副本，
//! 提交时写回对象。临时副本在任何退出路径上都会随会话一起释放。

use std::panic::Location;

use hideset_core::mesh::Mesh;
use hideset_core::scene::Object;
use tracing::{debug, error, trace};

use crate::errors::EngineError;

enum Target<'a> {
    Live(&'a mut Mesh),
    Temporary { object: &'a mut Object, copy: Mesh },
}

pub struct MeshSession<'a> {
    object_name: String,
    target: Target<'a>,
    committed: bool,
}

impl<'a> MeshSession<'a> {
    pub fn open(object: &'a mut Object) -> Result<Self, EngineError> {
        let object_name = object.name().to_string();
        if !object.is_in_edit_mode() {
            let copy = object
                .mesh()
                .cloned()
                .ok_or_else(|| EngineError::NotAMesh(object_name.clone()))?;
            trace!(object = %object_name, "创建临时编辑网格");
            return Ok(Self {
                object_name,
                target: Target::Temporary { object, copy },
                committed: false,
            });
        }
        let mesh = object
            .edit_mesh_mut()
            .ok_or_else(|| EngineError::NotAMesh(object_name.clone()))?;
        Ok(Self {
            object_name,
            target: Target::Live(mesh),
            committed: false,
        })
    }

    #[inline]
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self.target, Target::Live(_))
    }

    pub fn mesh(&self) -> &Mesh {
        match &self.target {
            Target::Live(mesh) => mesh,
            Target::Temporary { copy, .. } => copy,
        }
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        match &mut self.target {
            Target::Live(mesh) => mesh,
            Target::Temporary { copy, .. } => copy,
        }
    }

    /// 提交修改：实时网格只需通知更新，临时副本写回对象的持久化网格。
    pub fn commit(mut self) {
        match &mut self.target {
            Target::Live(_) => {
                debug!(object = %self.object_name, "编辑网格已更新");
            }
            Target::Temporary { object, copy } => {
                object.set_mesh(std::mem::take(copy));
                debug!(object = %self.object_name, "临时网格已写回");
            }
        }
        self.committed = true;
    }
}

impl Drop for MeshSession<'_> {
    fn drop(&mut self) {
        if let Target::Temporary { .. } = self.target {
            if self.committed {
                trace!(object = %self.object_name, "释放临时编辑网格");
            } else {
                debug!(object = %self.object_name, "未提交，丢弃临时编辑网格");
            }
        }
    }
}

/// 在编辑会话中执行 `f`，成功时提交，失败时记录调用位置并放弃临时副本。
///
/// 实时会话成功后还会把编辑网格同步到持久化网格，保存场景时即可带上新写入的 ID。
#[track_caller]
pub fn process_mesh<R>(
    object: &mut Object,
    f: impl FnOnce(&mut Mesh) -> Result<R, EngineError>,
) -> Result<R, EngineError> {
    let site = Location::caller();
    let mut session = match MeshSession::open(object) {
        Ok(session) => session,
        Err(err) => {
            error!(%site, error = %err, "无法打开编辑网格");
            return Err(err);
        }
    };
    match f(session.mesh_mut()) {
        Ok(value) => {
            let live = session.is_live();
            session.commit();
            if live {
                object.update_from_edit_mode();
            }
            Ok(value)
        }
        Err(err) => {
            error!(%site, object = session.object_name(), error = %err, "网格处理失败");
            Err(err)
        }
    }
}
