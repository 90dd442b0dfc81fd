use std::fs;
use std::path::Path;

use hideset_core::mesh::MeshKind;
use hideset_core::scene::Scene;
use hideset_engine::command::{
    CommandBus, CommandContext, CommandRequest, CommandSettings, describe_hide_sets,
};
use tracing::{debug, info, warn};

use crate::errors::FrontendError;
use crate::loader::{LoadedScene, SceneSource};

/// 演示场景上执行的命令序列。
const DEMO_SCRIPT: &str = "\
# 对象模式：把两个道具登记为一组并切换
select_objects Lamp Camera
register_hide_set object 道具
toggle_hide_set object 0
# 编辑模式：登记立方体的两个对角顶点
edit_mode Cube
select_elements Cube vert 0 6
register_hide_set vert 对角顶点
apply_hide_set edit 0 hide
list_sets
sync_hide_set edit 0
toggle_hide_set edit 0
object_mode
toggle_hide_set object 0
";

/// 简易 CLI 演示：打印场景概览；演示场景上额外跑一遍内置命令序列。
pub fn run_demo(loaded: &mut LoadedScene, settings: &CommandSettings) {
    let bus = CommandBus::new();
    let mut commands: Vec<&str> = bus.available_commands().copied().collect();
    commands.sort_unstable();
    println!("支持的命令: {}", commands.join(", "));

    match &loaded.source {
        SceneSource::File(path) => println!("已从文件加载场景：{}", path.display()),
        SceneSource::Demo => println!("使用内置演示场景"),
    }
    print_scene_summary(&loaded.scene);

    if loaded.source == SceneSource::Demo {
        let mut context = CommandContext {
            scene: &mut loaded.scene,
            settings,
        };
        if let Err(err) = run_script_text(&bus, DEMO_SCRIPT, &mut context) {
            warn!(error = %err, "演示命令序列中断");
        }
    }

    println!("{}", describe_hide_sets(&loaded.scene));
}

/// 执行脚本文件，任何一行失败都会中止并报告行号。
pub fn run_script_file(
    path: &Path,
    scene: &mut Scene,
    settings: &CommandSettings,
) -> Result<usize, FrontendError> {
    let text = fs::read_to_string(path).map_err(|source| FrontendError::ScriptRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "执行命令脚本");
    let bus = CommandBus::new();
    let mut context = CommandContext { scene, settings };
    run_script_text(&bus, &text, &mut context)
}

/// 逐行执行命令：空白分隔参数，`#` 开头为注释。返回执行的命令数。
pub fn run_script_text(
    bus: &CommandBus,
    text: &str,
    context: &mut CommandContext<'_>,
) -> Result<usize, FrontendError> {
    let mut executed = 0;
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some(request) = CommandRequest::parse_line(line) else {
            continue;
        };
        dispatch_cli_command(bus, &request, context).map_err(|message| FrontendError::Command {
            line: number + 1,
            command: request.name.clone(),
            message,
        })?;
        executed += 1;
    }
    debug!(executed, "脚本执行完毕");
    Ok(executed)
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: &CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<(), String> {
    let response = bus.dispatch(request, context);
    if response.success {
        if let Some(message) = response.message {
            println!("[命令] {message}");
        }
        Ok(())
    } else {
        Err(response.message.unwrap_or_else(|| "未知错误".to_string()))
    }
}

fn print_scene_summary(scene: &Scene) {
    println!("场景对象（{} 个）：", scene.objects().len());
    for object in scene.objects().iter() {
        match object.current_mesh() {
            Some(mesh) => println!(
                "  - {} 网格：{} 顶点 / {} 边 / {} 面",
                object.name(),
                mesh.count(MeshKind::Vert),
                mesh.count(MeshKind::Edge),
                mesh.count(MeshKind::Face)
            ),
            None => println!("  - {}", object.name()),
        }
    }
}
