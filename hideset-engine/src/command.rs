use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use hideset_core::hide_set::{ElementKind, ListKind};
use hideset_core::mesh::{MeshError, MeshKind};
use hideset_core::scene::{InteractionMode, Scene};
use hideset_io::{ExportOptions, export_hide_set_with};

use crate::apply::{ToggleAction, apply_hide_set, toggle_hide_set};
use crate::diff::{preview_hide_set_diff, sync_hide_set};
use crate::errors::EngineError;
use crate::registry::{
    delete_hide_set, is_completely_hidden, locate, locate_mut, register_hide_set,
    rename_hide_set, require_mode, required_mode,
};

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 按空白切分一行命令文本，空行返回 `None`。
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        Some(Self::new(name, parts))
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl From<EngineError> for CommandResponse {
    fn from(err: EngineError) -> Self {
        CommandResponse::err(format!("操作已取消: {err}"))
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

/// 命令执行时可用的外部设置。
#[derive(Debug, Clone)]
pub struct CommandSettings {
    pub default_export_path: PathBuf,
    pub pretty_export: bool,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            default_export_path: PathBuf::from("hide_set.json"),
            pretty_export: true,
        }
    }
}

pub struct CommandContext<'a> {
    pub scene: &'a mut Scene,
    pub settings: &'a CommandSettings,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(RegisterCommand);
        bus.register(ApplyCommand);
        bus.register(ToggleCommand);
        bus.register(RenameCommand);
        bus.register(DeleteCommand);
        bus.register(SyncCommand);
        bus.register(PreviewCommand);
        bus.register(ExportCommand);
        bus.register(ListSetsCommand);
        bus.register(ObjectModeCommand);
        bus.register(EditModeCommand);
        bus.register(SelectObjectsCommand);
        bus.register(SelectElementsCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    pub fn available_commands(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }
}

fn arg<'r>(request: &'r CommandRequest, index: usize, what: &str) -> Result<&'r str, EngineError> {
    request
        .args
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| EngineError::InvalidArgument(format!("缺少参数: {what}")))
}

/// 解析 `<edit|object> <index>` 形式的集合定位参数。
fn target(request: &CommandRequest) -> Result<(ListKind, usize), EngineError> {
    let list = arg(request, 0, "列表")?;
    let list = list
        .parse::<ListKind>()
        .map_err(|err| EngineError::InvalidArgument(err.to_string()))?;
    let index = arg(request, 1, "下标")?;
    let index = index
        .parse::<usize>()
        .map_err(|_| EngineError::InvalidArgument(format!("无效下标: {index}")))?;
    Ok((list, index))
}

fn rest(request: &CommandRequest, from: usize) -> Option<String> {
    let joined = request.args.get(from..)?.join(" ");
    (!joined.is_empty()).then_some(joined)
}

fn respond(result: Result<String, EngineError>) -> CommandResponse {
    match result {
        Ok(message) => CommandResponse::ok(message),
        Err(err) => err.into(),
    }
}

struct RegisterCommand;

impl RegisterCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let mode = arg(request, 0, "模式")?;
        let mode = mode
            .parse::<ElementKind>()
            .map_err(|err| EngineError::InvalidArgument(err.to_string()))?;
        let name = rest(request, 1).unwrap_or_else(|| "Hide Set".to_string());
        let registration = register_hide_set(context.scene, &name, mode)?;
        Ok(format!(
            "已登记隐藏集合 \"{name}\"（{}，{} 个成员，位置 {} {}）",
            mode.label(),
            registration.added,
            registration.list.as_str(),
            registration.index
        ))
    }
}

impl CommandHandler for RegisterCommand {
    fn name(&self) -> &'static str {
        "register_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct ApplyCommand;

impl ApplyCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        let hide = match arg(request, 2, "动作")? {
            "hide" => true,
            "show" => false,
            other => {
                return Err(EngineError::InvalidArgument(format!("未知动作: {other}")));
            }
        };
        let (objects, store) = context.scene.parts_mut();
        let set = locate(store, list, index)?;
        let report = apply_hide_set(objects, set, hide);
        Ok(format!(
            "{}\"{}\"：{} 个成员已处理，{} 个无法解析，{} 个失败",
            if hide { "已隐藏" } else { "已显示" },
            set.name(),
            report.applied,
            report.skipped,
            report.failed
        ))
    }
}

impl CommandHandler for ApplyCommand {
    fn name(&self) -> &'static str {
        "apply_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct ToggleCommand;

impl ToggleCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        let (objects, store) = context.scene.parts_mut();
        let set = locate(store, list, index)?;
        let (action, report) = toggle_hide_set(objects, set)?;
        let verb = match action {
            ToggleAction::HideAll => "已全部隐藏",
            ToggleAction::RestoreSaved => "已恢复登记状态",
        };
        Ok(format!("{verb}\"{}\"（{} 个成员）", set.name(), report.applied))
    }
}

impl CommandHandler for ToggleCommand {
    fn name(&self) -> &'static str {
        "toggle_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct RenameCommand;

impl RenameCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        let name = rest(request, 2)
            .ok_or_else(|| EngineError::InvalidArgument("缺少参数: 名称".to_string()))?;
        rename_hide_set(context.scene.hide_sets_mut(), list, index, &name)?;
        Ok(format!("隐藏集合已重命名为 \"{name}\""))
    }
}

impl CommandHandler for RenameCommand {
    fn name(&self) -> &'static str {
        "rename_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct DeleteCommand;

impl DeleteCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        let removed = delete_hide_set(context.scene.hide_sets_mut(), list, index)?;
        Ok(format!("已删除隐藏集合 \"{}\"", removed.name()))
    }
}

impl CommandHandler for DeleteCommand {
    fn name(&self) -> &'static str {
        "delete_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct SyncCommand;

impl SyncCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        require_mode(context.scene, required_mode(list))?;
        let (objects, store) = context.scene.parts_mut();
        let set = locate_mut(store, list, index)?;
        let diff = sync_hide_set(objects, set);
        if !diff.has_changes() {
            return Ok(format!("\"{}\" 已是最新", set.name()));
        }
        Ok(format!(
            "已同步 \"{}\"：新增 {}，移除 {}，更新 {}",
            set.name(),
            diff.added,
            diff.removed,
            diff.updated
        ))
    }
}

impl CommandHandler for SyncCommand {
    fn name(&self) -> &'static str {
        "sync_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct PreviewCommand;

impl PreviewCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        let set = locate(context.scene.hide_sets(), list, index)?;
        let diff = preview_hide_set_diff(context.scene.objects(), set);
        Ok(format!(
            "\"{}\"：{}（移除 {}，更新 {}）",
            set.name(),
            if diff.has_changes() { "需要同步" } else { "已同步" },
            diff.removed,
            diff.updated
        ))
    }
}

impl CommandHandler for PreviewCommand {
    fn name(&self) -> &'static str {
        "preview_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct ExportCommand;

impl ExportCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let (list, index) = target(request)?;
        let path = rest(request, 2)
            .map(PathBuf::from)
            .unwrap_or_else(|| context.settings.default_export_path.clone());
        let set = locate(context.scene.hide_sets(), list, index)?;
        let options = ExportOptions {
            pretty: context.settings.pretty_export,
        };
        if !export_hide_set_with(&path, set, options) {
            return Err(EngineError::ExportFailed { path });
        }
        Ok(format!("已导出 \"{}\" 到 {}", set.name(), path.display()))
    }
}

impl CommandHandler for ExportCommand {
    fn name(&self) -> &'static str {
        "export_hide_set"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

struct ListSetsCommand;

impl CommandHandler for ListSetsCommand {
    fn name(&self) -> &'static str {
        "list_sets"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        CommandResponse::ok(describe_hide_sets(context.scene))
    }
}

/// 面板式的集合列表：下标、名称、模式、是否完全隐藏、是否需要同步。
pub fn describe_hide_sets(scene: &Scene) -> String {
    let mut out = String::new();
    for (list, title) in [(ListKind::Edit, "编辑模式集合"), (ListKind::Object, "对象模式集合")] {
        let sets = scene.hide_sets().list(list);
        let _ = writeln!(out, "{title}（{}）", sets.len());
        for (index, set) in sets.iter().enumerate() {
            let hidden = is_completely_hidden(scene.objects(), set);
            let diff = preview_hide_set_diff(scene.objects(), set);
            let _ = writeln!(
                out,
                "  {index}. {} [{}] {} 个成员{}{}",
                set.name(),
                set.mode().label(),
                set.len(),
                if hidden { " · 已隐藏" } else { "" },
                if diff.has_changes() { " · 需要同步" } else { "" }
            );
        }
    }
    out
}

struct ObjectModeCommand;

impl CommandHandler for ObjectModeCommand {
    fn name(&self) -> &'static str {
        "object_mode"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.exit_edit_mode();
        CommandResponse::ok("已切换到对象模式")
    }
}

struct EditModeCommand;

impl CommandHandler for EditModeCommand {
    fn name(&self) -> &'static str {
        "edit_mode"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let names = if request.args.is_empty() {
            context.scene.selected_object_names()
        } else {
            request.args.clone()
        };
        if context.scene.mode() == InteractionMode::EditMesh {
            context.scene.exit_edit_mode();
        }
        match context.scene.enter_edit_mode(&names) {
            0 => respond(Err(EngineError::NoEditObjects)),
            entered => CommandResponse::ok(format!("{entered} 个对象进入编辑模式")),
        }
    }
}

struct SelectObjectsCommand;

impl CommandHandler for SelectObjectsCommand {
    fn name(&self) -> &'static str {
        "select_objects"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.scene.deselect_all();
        let missing: Vec<&str> = request
            .args
            .iter()
            .filter(|name| !context.scene.set_selected(name, true))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return respond(Err(EngineError::ObjectNotFound(missing.join(", "))));
        }
        CommandResponse::ok(format!("已选中 {} 个对象", request.args.len()))
    }
}

struct SelectElementsCommand;

impl SelectElementsCommand {
    fn run(
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> Result<String, EngineError> {
        let object_name = arg(request, 0, "对象")?;
        let kind = arg(request, 1, "元素类别")?;
        let kind: MeshKind = kind
            .parse::<ElementKind>()
            .ok()
            .and_then(ElementKind::mesh_kind)
            .ok_or_else(|| EngineError::InvalidArgument(format!("无效元素类别: {kind}")))?;
        let object = context
            .scene
            .objects_mut()
            .get_mut(object_name)
            .ok_or_else(|| EngineError::ObjectNotFound(object_name.to_string()))?;
        let mesh = object
            .current_mesh_mut()
            .ok_or_else(|| EngineError::NotAMesh(object_name.to_string()))?;
        let mut handles = Vec::with_capacity(request.args.len().saturating_sub(2));
        for raw in request.args.iter().skip(2) {
            let index = raw
                .parse::<usize>()
                .map_err(|_| EngineError::InvalidArgument(format!("无效下标: {raw}")))?;
            let handle = kind
                .try_handle(index)
                .filter(|handle| mesh.contains(*handle))
                .ok_or(MeshError::StaleHandle { kind, index })?;
            handles.push(handle);
        }
        mesh.deselect_all();
        for handle in &handles {
            mesh.set_selected(*handle, true)?;
        }
        Ok(format!("已在 {object_name} 中选中 {} 个元素", handles.len()))
    }
}

impl CommandHandler for SelectElementsCommand {
    fn name(&self) -> &'static str {
        "select_elements"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        respond(Self::run(request, context))
    }
}

#[cfg(test)]
mod tests {
    use hideset_core::mesh::{ElementHandle, Mesh, VertId};
    use hideset_core::scene::Object;
    use tempfile::tempdir;

    use super::*;

    fn demo_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_object(Object::new_mesh("Cube", Mesh::cube(2.0)));
        scene.add_object(Object::new_empty("Lamp"));
        scene.add_object(Object::new_empty("Camera"));
        scene
    }

    fn run(bus: &CommandBus, context: &mut CommandContext<'_>, line: &str) -> CommandResponse {
        let request = CommandRequest::parse_line(line).unwrap();
        bus.dispatch(&request, context)
    }

    #[test]
    fn vertex_workflow_through_the_bus() {
        let mut scene = demo_scene();
        let settings = CommandSettings::default();
        let bus = CommandBus::new();
        let mut context = CommandContext {
            scene: &mut scene,
            settings: &settings,
        };

        assert!(run(&bus, &mut context, "edit_mode Cube").success);
        assert!(run(&bus, &mut context, "select_elements Cube vert 0 6").success);
        let registered = run(&bus, &mut context, "register_hide_set vert Two corners");
        assert!(registered.success, "{:?}", registered.message);
        assert_eq!(
            context.scene.hide_sets().get(ListKind::Edit, 0).unwrap().name(),
            "Two corners"
        );

        assert!(run(&bus, &mut context, "apply_hide_set edit 0 hide").success);
        let mesh = context.scene.objects().get("Cube").unwrap().edit_mesh().unwrap();
        assert_eq!(mesh.hide_flag(ElementHandle::Vert(VertId::new(6))), Some(true));
        assert_eq!(mesh.faces().filter(|(_, face)| face.hide).count(), 6);

        let listing = run(&bus, &mut context, "list_sets").message.unwrap();
        assert!(listing.contains("Two corners"));
        assert!(listing.contains("已隐藏"));
        assert!(listing.contains("需要同步"));

        let synced = run(&bus, &mut context, "sync_hide_set edit 0");
        assert!(synced.success);
        assert!(synced.message.unwrap().contains("更新 2"));
    }

    #[test]
    fn invalid_input_is_reported_without_changes() {
        let mut scene = demo_scene();
        let settings = CommandSettings::default();
        let bus = CommandBus::new();
        let mut context = CommandContext {
            scene: &mut scene,
            settings: &settings,
        };

        assert!(!run(&bus, &mut context, "toggle_hide_set edit 0").success);
        assert!(!run(&bus, &mut context, "toggle_hide_set sideways 0").success);
        assert!(!run(&bus, &mut context, "apply_hide_set object x hide").success);
        assert!(!run(&bus, &mut context, "register_hide_set corner Bad").success);
        assert!(!run(&bus, &mut context, "register_hide_set object Empty").success);
        assert!(!run(&bus, &mut context, "select_objects Lamp Nobody").success);
        assert!(!run(&bus, &mut context, "focus_selection").success);
        assert_eq!(context.scene.hide_sets().len(ListKind::Object), 0);
    }

    #[test]
    fn out_of_range_element_indices_keep_the_selection() {
        let mut scene = demo_scene();
        let settings = CommandSettings::default();
        let bus = CommandBus::new();
        let mut context = CommandContext {
            scene: &mut scene,
            settings: &settings,
        };
        assert!(run(&bus, &mut context, "select_elements Cube vert 2").success);

        for line in [
            "select_elements Cube vert 4294967296",
            "select_elements Cube vert 0 4294967297",
            "select_elements Cube vert 8",
            "select_elements Cube face 6",
        ] {
            let response = run(&bus, &mut context, line);
            assert!(!response.success, "{line}");
        }

        let mesh = context.scene.objects().get("Cube").unwrap().mesh().unwrap();
        assert_eq!(
            mesh.selected(MeshKind::Vert),
            vec![ElementHandle::Vert(VertId::new(2))]
        );
        assert!(mesh.selected(MeshKind::Face).is_empty());
    }

    #[test]
    fn sync_requires_the_matching_mode() {
        let mut scene = demo_scene();
        let settings = CommandSettings::default();
        let bus = CommandBus::new();
        let mut context = CommandContext {
            scene: &mut scene,
            settings: &settings,
        };

        assert!(run(&bus, &mut context, "select_objects Lamp Camera").success);
        assert!(run(&bus, &mut context, "register_hide_set object Props").success);
        assert!(run(&bus, &mut context, "edit_mode Cube").success);
        let response = run(&bus, &mut context, "sync_hide_set object 0");
        assert!(!response.success);
        assert!(run(&bus, &mut context, "object_mode").success);
        assert!(run(&bus, &mut context, "sync_hide_set object 0").success);
    }

    #[test]
    fn object_set_lifecycle() {
        let dir = tempdir().unwrap();
        let mut scene = demo_scene();
        let settings = CommandSettings {
            default_export_path: dir.path().join("default.json"),
            pretty_export: false,
        };
        let bus = CommandBus::new();
        let mut context = CommandContext {
            scene: &mut scene,
            settings: &settings,
        };

        run(&bus, &mut context, "select_objects Lamp Camera");
        assert!(run(&bus, &mut context, "register_hide_set object Props").success);
        let toggled = run(&bus, &mut context, "toggle_hide_set object 0");
        assert!(toggled.message.unwrap().contains("已全部隐藏"));
        assert!(
            context
                .scene
                .objects()
                .get("Lamp")
                .unwrap()
                .hide_get()
                .unwrap()
        );

        assert!(run(&bus, &mut context, "rename_hide_set object 0 Studio props").success);
        assert!(run(&bus, &mut context, "export_hide_set object 0").success);
        assert!(settings.default_export_path.exists());
        let missing = dir.path().join("no").join("such").join("dir.json");
        let line = format!("export_hide_set object 0 {}", missing.display());
        assert!(!run(&bus, &mut context, &line).success);

        assert!(run(&bus, &mut context, "delete_hide_set object 0").success);
        assert!(!run(&bus, &mut context, "delete_hide_set object 0").success);
    }
}
