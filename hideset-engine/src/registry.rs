//! 隐藏集合的登记、定位、改名与删除，以及成员状态观察。

use hideset_core::hide_set::{ElementKind, ElementRef, HideSet, HideSetStore, ListKind};
use hideset_core::scene::{InteractionMode, ObjectCollection, Scene};
use tracing::{info, warn};

use crate::errors::EngineError;
use crate::pid::{assign_if_missing, build_maps, ensure_layers};
use crate::session::process_mesh;
use crate::visibility::{element_hidden, get_hidden};

/// 登记结果：集合所在列表、下标以及成员数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub list: ListKind,
    pub index: usize,
    pub added: usize,
}

/// 当前处于编辑上下文的对象：优先使用多对象编辑列表，否则退回当前选择。
pub fn objects_in_edit_context(scene: &Scene) -> Vec<String> {
    if !scene.objects_in_mode().is_empty() {
        return scene.objects_in_mode().to_vec();
    }
    scene.selected_object_names()
}

/// 操作某一列表中的集合所需的交互模式。
#[inline]
pub fn required_mode(list: ListKind) -> InteractionMode {
    match list {
        ListKind::Edit => InteractionMode::EditMesh,
        ListKind::Object => InteractionMode::Object,
    }
}

pub fn require_mode(scene: &Scene, expected: InteractionMode) -> Result<(), EngineError> {
    if scene.mode() == expected {
        Ok(())
    } else {
        Err(EngineError::WrongMode { expected })
    }
}

/// 逐个成员读取其当前隐藏状态，与成员顺序一一对应；无法解析的成员为 `None`。
///
/// 只读：网格成员直接读取对象当前生效的网格，不开启编辑会话。
pub fn observe_members(objects: &ObjectCollection, set: &HideSet) -> Vec<Option<bool>> {
    let elements = set.elements();
    let mut states = vec![None; elements.len()];
    if set.mode() == ElementKind::Object {
        for (state, element) in states.iter_mut().zip(elements) {
            *state = objects.get(&element.object_name).map(|object| get_hidden(object));
        }
        return states;
    }

    for (name, indices) in set.group_indices_by_object() {
        let Some(mesh) = objects.get(&name).and_then(|object| object.current_mesh()) else {
            continue;
        };
        let maps = build_maps(mesh);
        for index in indices {
            let element = &elements[index];
            states[index] = maps
                .resolve(element.kind, element.pid)
                .map(|handle| element_hidden(mesh, handle));
        }
    }
    states
}

/// 全部可解析成员均已隐藏，且至少有一个成员可解析。
pub fn is_completely_hidden(objects: &ObjectCollection, set: &HideSet) -> bool {
    let mut resolved = observe_members(objects, set).into_iter().flatten().peekable();
    resolved.peek().is_some() && resolved.all(|hidden| hidden)
}

/// 用当前选择创建一个新的隐藏集合。
///
/// 对象模式下收集选中的对象；网格模式下收集编辑上下文中各对象被选中的该类元素，
/// 并为尚无持久 ID 的元素分配 ID。没有收集到任何成员时不保存集合。
pub fn register_hide_set(
    scene: &mut Scene,
    name: &str,
    mode: ElementKind,
) -> Result<Registration, EngineError> {
    let mut set = HideSet::new(name, mode);

    match mode.mesh_kind() {
        None => {
            require_mode(scene, InteractionMode::Object)?;
            for object in scene.objects().iter().filter(|object| object.select) {
                set.add_unique(ElementRef::object(object.name(), get_hidden(object)))?;
            }
        }
        Some(kind) => {
            require_mode(scene, InteractionMode::EditMesh)?;
            let targets = objects_in_edit_context(scene);
            if targets.is_empty() {
                return Err(EngineError::NoEditObjects);
            }
            let (objects, store) = scene.parts_mut();
            for target in &targets {
                let Some(object) = objects.get_mut(target) else {
                    warn!(object = %target, "编辑上下文中的对象不存在");
                    continue;
                };
                if !object.is_mesh() {
                    warn!(object = %target, "跳过非网格对象");
                    continue;
                }
                let counter = store.counter_mut();
                let collected = process_mesh(object, |mesh| {
                    let layers = ensure_layers(mesh);
                    if !layers.is_available() {
                        return Err(EngineError::LayersUnavailable(target.clone()));
                    }
                    let mut added = 0;
                    for handle in mesh.selected(kind) {
                        let Some(pid) = assign_if_missing(mesh, &layers, handle, counter) else {
                            continue;
                        };
                        let hidden = element_hidden(mesh, handle);
                        if set.add_unique(ElementRef::mesh(target.as_str(), kind, pid, hidden))? {
                            added += 1;
                        }
                    }
                    Ok(added)
                });
                if let Err(err) = collected {
                    warn!(object = %target, error = %err, "对象未能登记到隐藏集合");
                }
            }
        }
    }

    if set.is_empty() {
        return Err(EngineError::EmptySelection);
    }
    let added = set.len();
    let (list, index) = scene.hide_sets_mut().push(set);
    info!(set = name, mode = %mode, added, "已登记隐藏集合");
    Ok(Registration { list, index, added })
}

pub fn locate(store: &HideSetStore, list: ListKind, index: usize) -> Result<&HideSet, EngineError> {
    store.get(list, index).ok_or(EngineError::IndexOutOfRange {
        list,
        index,
        len: store.len(list),
    })
}

pub fn locate_mut(
    store: &mut HideSetStore,
    list: ListKind,
    index: usize,
) -> Result<&mut HideSet, EngineError> {
    let len = store.len(list);
    store
        .get_mut(list, index)
        .ok_or(EngineError::IndexOutOfRange { list, index, len })
}

pub fn rename_hide_set(
    store: &mut HideSetStore,
    list: ListKind,
    index: usize,
    name: &str,
) -> Result<(), EngineError> {
    if name.trim().is_empty() {
        return Err(EngineError::InvalidArgument("隐藏集合名称不能为空".to_string()));
    }
    locate_mut(store, list, index)?.set_name(name);
    Ok(())
}

pub fn delete_hide_set(
    store: &mut HideSetStore,
    list: ListKind,
    index: usize,
) -> Result<HideSet, EngineError> {
    let len = store.len(list);
    let removed = store
        .remove(list, index)
        .ok_or(EngineError::IndexOutOfRange { list, index, len })?;
    info!(set = removed.name(), "已删除隐藏集合");
    Ok(removed)
}
