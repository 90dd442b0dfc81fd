//! 比较隐藏集合的登记状态与场景的实时状态，并据此同步。

use hideset_core::hide_set::HideSet;
use hideset_core::scene::ObjectCollection;
use tracing::{debug, info};

use crate::registry::observe_members;

/// 一次比较的统计结果。`added` 恒为 0：新建的几何体只能通过显式登记加入集合。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HideSetDiff {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

impl HideSetDiff {
    #[inline]
    pub fn has_changes(&self) -> bool {
        self.added + self.removed + self.updated > 0
    }
}

#[derive(Debug, Default)]
struct Detection {
    diff: HideSetDiff,
    removals: Vec<usize>,
    updates: Vec<(usize, bool)>,
}

fn detect(objects: &ObjectCollection, set: &HideSet) -> Detection {
    let mut detection = Detection::default();
    let states = observe_members(objects, set);
    for (index, (element, state)) in set.elements().iter().zip(states).enumerate() {
        match state {
            None => detection.removals.push(index),
            Some(live) if live != element.saved_hidden => detection.updates.push((index, live)),
            Some(_) => {}
        }
    }
    detection.diff.removed = detection.removals.len();
    detection.diff.updated = detection.updates.len();
    detection
}

/// 只读预览：与 [`sync_hide_set`] 使用相同的检测逻辑，但不修改集合。
pub fn preview_hide_set_diff(objects: &ObjectCollection, set: &HideSet) -> HideSetDiff {
    let diff = detect(objects, set).diff;
    debug!(set = set.name(), ?diff, "预览隐藏集合差异");
    diff
}

/// 同步：把状态已变化的成员的登记状态更新为实时状态，并移除所有无法解析的成员。
///
/// 对象模式与网格模式采用相同策略；某个对象缺失时其全部成员计为移除，其余对象照常检查。
pub fn sync_hide_set(objects: &ObjectCollection, set: &mut HideSet) -> HideSetDiff {
    let Detection {
        diff,
        removals,
        updates,
    } = detect(objects, set);
    let elements = set.elements_mut();
    for (index, live) in updates {
        elements[index].saved_hidden = live;
    }
    set.remove_indices(removals);
    info!(set = set.name(), ?diff, remaining = set.len(), "已同步隐藏集合");
    diff
}
