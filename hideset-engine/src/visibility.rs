//! 统一读写对象与网格元素的隐藏状态。
//!
//! 不同元素暴露隐藏状态的方式不同：对象有视图层上的成对访问器和视口标志，
//! 网格元素只有普通布尔标志。[`get_hidden`] / [`set_hidden`] 按固定优先级探测
//! 元素支持的方式，并使用第一个可用的方式。

use std::panic::Location;

use hideset_core::mesh::{Edge, ElementHandle, Face, Mesh, Vertex};
use hideset_core::scene::{Object, VisibilityError};
use tracing::{debug, warn};

/// 读写隐藏状态的具体方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideStrategy {
    /// 成对的 getter/setter，例如对象在当前视图层中的隐藏状态。
    Accessor,
    /// 视口可见性标志。
    Viewport,
    /// 普通布尔标志。
    Flag,
}

impl HideStrategy {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            HideStrategy::Accessor => "accessor",
            HideStrategy::Viewport => "viewport",
            HideStrategy::Flag => "flag",
        }
    }
}

/// 探测顺序。
pub const PROBE_ORDER: [HideStrategy; 3] = [
    HideStrategy::Accessor,
    HideStrategy::Viewport,
    HideStrategy::Flag,
];

/// 具有隐藏状态的元素。实现者声明自己支持哪些方式，并实现对应的读写。
pub trait Hideable {
    fn supports(&self, strategy: HideStrategy) -> bool;
    fn read_hidden(&self, strategy: HideStrategy) -> Result<bool, VisibilityError>;
    fn write_hidden(&mut self, strategy: HideStrategy, hidden: bool)
    -> Result<(), VisibilityError>;

    /// 第一个受支持的方式。
    fn strategy(&self) -> Option<HideStrategy> {
        PROBE_ORDER.into_iter().find(|s| self.supports(*s))
    }
}

/// 读取隐藏状态。读取失败或没有可用方式时视为可见。
#[track_caller]
pub fn get_hidden(element: &dyn Hideable) -> bool {
    let Some(strategy) = element.strategy() else {
        return false;
    };
    match element.read_hidden(strategy) {
        Ok(hidden) => hidden,
        Err(err) => {
            debug!(site = %Location::caller(), error = %err, "读取隐藏状态失败，按可见处理");
            false
        }
    }
}

/// 写入隐藏状态。失败时只记录日志，不中断批量操作；返回是否写入成功。
#[track_caller]
pub fn set_hidden(element: &mut dyn Hideable, hidden: bool) -> bool {
    let Some(strategy) = element.strategy() else {
        warn!(site = %Location::caller(), "元素没有可写的隐藏状态");
        return false;
    };
    match element.write_hidden(strategy, hidden) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                site = %Location::caller(),
                strategy = strategy.as_str(),
                error = %err,
                "写入隐藏状态失败"
            );
            false
        }
    }
}

/// 对象总是先命中视图层访问器；未链接到视图层时访问器报错，不会退回视口标志。
impl Hideable for Object {
    fn supports(&self, strategy: HideStrategy) -> bool {
        matches!(strategy, HideStrategy::Accessor | HideStrategy::Viewport)
    }

    fn read_hidden(&self, strategy: HideStrategy) -> Result<bool, VisibilityError> {
        match strategy {
            HideStrategy::Accessor => self.hide_get(),
            HideStrategy::Viewport => Ok(self.hide_viewport),
            HideStrategy::Flag => Err(VisibilityError::Unsupported(strategy.as_str())),
        }
    }

    fn write_hidden(
        &mut self,
        strategy: HideStrategy,
        hidden: bool,
    ) -> Result<(), VisibilityError> {
        match strategy {
            HideStrategy::Accessor => self.hide_set(hidden),
            HideStrategy::Viewport => {
                self.hide_viewport = hidden;
                Ok(())
            }
            HideStrategy::Flag => Err(VisibilityError::Unsupported(strategy.as_str())),
        }
    }
}

macro_rules! flag_hideable {
    ($ty:ty) => {
        impl Hideable for $ty {
            fn supports(&self, strategy: HideStrategy) -> bool {
                strategy == HideStrategy::Flag
            }

            fn read_hidden(&self, strategy: HideStrategy) -> Result<bool, VisibilityError> {
                match strategy {
                    HideStrategy::Flag => Ok(self.hide),
                    other => Err(VisibilityError::Unsupported(other.as_str())),
                }
            }

            fn write_hidden(
                &mut self,
                strategy: HideStrategy,
                hidden: bool,
            ) -> Result<(), VisibilityError> {
                match strategy {
                    HideStrategy::Flag => {
                        self.hide = hidden;
                        Ok(())
                    }
                    other => Err(VisibilityError::Unsupported(other.as_str())),
                }
            }
        }
    };
}

flag_hideable!(Vertex);
flag_hideable!(Edge);
flag_hideable!(Face);

pub fn element(mesh: &Mesh, handle: ElementHandle) -> Option<&dyn Hideable> {
    match handle {
        ElementHandle::Vert(id) => mesh.vert(id).map(|v| v as &dyn Hideable),
        ElementHandle::Edge(id) => mesh.edge(id).map(|e| e as &dyn Hideable),
        ElementHandle::Face(id) => mesh.face(id).map(|f| f as &dyn Hideable),
    }
}

pub fn element_mut(mesh: &mut Mesh, handle: ElementHandle) -> Option<&mut dyn Hideable> {
    match handle {
        ElementHandle::Vert(id) => mesh.vert_mut(id).map(|v| v as &mut dyn Hideable),
        ElementHandle::Edge(id) => mesh.edge_mut(id).map(|e| e as &mut dyn Hideable),
        ElementHandle::Face(id) => mesh.face_mut(id).map(|f| f as &mut dyn Hideable),
    }
}

/// 句柄失效时视为可见。
#[track_caller]
pub fn element_hidden(mesh: &Mesh, handle: ElementHandle) -> bool {
    element(mesh, handle).is_some_and(get_hidden)
}

#[track_caller]
pub fn set_element_hidden(mesh: &mut Mesh, handle: ElementHandle, hidden: bool) -> bool {
    match element_mut(mesh, handle) {
        Some(target) => set_hidden(target, hidden),
        None => {
            warn!(site = %Location::caller(), ?handle, "网格元素不存在，跳过隐藏状态写入");
            false
        }
    }
}
