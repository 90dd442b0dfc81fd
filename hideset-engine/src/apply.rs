//! 把隐藏集合应用到场景：隐藏、显示与切换。

use hideset_core::hide_set::{ElementKind, ElementRef, HideSet};
use hideset_core::mesh::{ElementHandle, FaceId, Mesh};
use hideset_core::scene::ObjectCollection;
use tracing::{debug, info};

use crate::errors::EngineError;
use crate::pid::build_maps;
use crate::registry::observe_members;
use crate::session::process_mesh;
use crate::visibility::{set_element_hidden, set_hidden};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// 成功写入的成员数。
    pub applied: usize,
    /// 无法解析而跳过的成员数。
    pub skipped: usize,
    /// 写入失败的成员数。
    pub failed: usize,
}

impl ApplyReport {
    fn merge(&mut self, other: ApplyReport) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// 存在可见成员，全部隐藏。
    HideAll,
    /// 没有可见成员，逐个恢复为登记时的状态。
    RestoreSaved,
}

/// 与元素相连、需要随其一起隐藏或显示的面。面本身不影响顶点和边。
pub fn linked_faces(mesh: &Mesh, handle: ElementHandle) -> Vec<FaceId> {
    match handle {
        ElementHandle::Vert(v) => mesh.vert_link_faces(v),
        ElementHandle::Edge(e) => mesh.edge_link_faces(e),
        ElementHandle::Face(_) => Vec::new(),
    }
}

/// 隐藏或显示全部成员。无法解析的成员被跳过，不会从集合中移除。
pub fn apply_hide_set(objects: &mut ObjectCollection, set: &HideSet, hide: bool) -> ApplyReport {
    let report = apply_with(objects, set, |_| hide);
    info!(set = set.name(), hide, ?report, "已应用隐藏集合");
    report
}

/// 按 `target` 给出的状态写入每个成员。
///
/// 网格成员按对象分组处理；同一对象中先执行显示再执行隐藏，
/// 共享面的顶点或边中只要有一个被隐藏，该面最终保持隐藏。
pub fn apply_with<F>(objects: &mut ObjectCollection, set: &HideSet, target: F) -> ApplyReport
where
    F: Fn(&ElementRef) -> bool,
{
    let mut report = ApplyReport::default();

    if set.mode() == ElementKind::Object {
        for element in set.elements() {
            let Some(object) = objects.get_mut(&element.object_name) else {
                report.skipped += 1;
                continue;
            };
            if set_hidden(object, target(element)) {
                report.applied += 1;
            } else {
                report.failed += 1;
            }
        }
        return report;
    }

    let elements = set.elements();
    for (name, indices) in set.group_indices_by_object() {
        let Some(object) = objects.get_mut(&name).filter(|object| object.is_mesh()) else {
            debug!(object = %name, members = indices.len(), "对象不存在或不是网格，跳过");
            report.skipped += indices.len();
            continue;
        };
        let result = process_mesh(object, |mesh| {
            let maps = build_maps(mesh);
            let mut partial = ApplyReport::default();
            let mut plan = Vec::with_capacity(indices.len());
            for &index in &indices {
                let element = &elements[index];
                match maps.resolve(element.kind, element.pid) {
                    Some(handle) => plan.push((handle, target(element))),
                    None => partial.skipped += 1,
                }
            }
            plan.sort_by_key(|(_, hidden)| *hidden);

            for (handle, hidden) in plan {
                if !set_element_hidden(mesh, handle, hidden) {
                    partial.failed += 1;
                    continue;
                }
                partial.applied += 1;
                for face in linked_faces(mesh, handle) {
                    set_element_hidden(mesh, ElementHandle::Face(face), hidden);
                }
            }
            Ok(partial)
        });
        match result {
            Ok(partial) => report.merge(partial),
            Err(_) => report.failed += indices.len(),
        }
    }
    report
}

/// 切换：只要有一个可解析成员可见就全部隐藏，否则逐个恢复登记时的状态。
pub fn toggle_hide_set(
    objects: &mut ObjectCollection,
    set: &HideSet,
) -> Result<(ToggleAction, ApplyReport), EngineError> {
    if set.is_empty() {
        return Err(EngineError::EmptyHideSet);
    }
    let states = observe_members(objects, set);
    let mut resolved = states.into_iter().flatten().peekable();
    if resolved.peek().is_none() {
        return Err(EngineError::NothingResolved);
    }
    let action = if resolved.any(|hidden| !hidden) {
        ToggleAction::HideAll
    } else {
        ToggleAction::RestoreSaved
    };
    let report = match action {
        ToggleAction::HideAll => apply_with(objects, set, |_| true),
        ToggleAction::RestoreSaved => apply_with(objects, set, |element| element.saved_hidden),
    };
    info!(set = set.name(), ?action, ?report, "已切换隐藏集合");
    Ok((action, report))
}
