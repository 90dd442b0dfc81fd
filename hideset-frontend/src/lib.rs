pub mod cli;
pub mod errors;
pub mod loader;

use std::path::{Path, PathBuf};

use errors::FrontendError;
use hideset_config::AppConfig;
use hideset_core::scene::Scene;
use hideset_engine::command::{CommandSettings, describe_hide_sets};
use hideset_io::{JsonFacade, SceneSaver};
use tracing::info;

/// 前端运行参数，由配置文件与命令行共同决定。
#[derive(Debug, Clone, Default)]
pub struct FrontendOptions {
    pub scene: Option<PathBuf>,
    pub save_on_exit: Option<PathBuf>,
    pub settings: CommandSettings,
}

impl FrontendOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scene: config.scene.path.clone(),
            save_on_exit: config.scene.save_on_exit.clone(),
            settings: CommandSettings {
                default_export_path: config.export.default_path.clone(),
                pretty_export: config.export.pretty,
            },
        }
    }
}

/// 启动 CLI 演示或返回错误。
pub fn run_cli_demo(options: &FrontendOptions) -> Result<(), FrontendError> {
    info!("启动 CLI 演示前端");
    let mut loaded = loader::load_scene(options.scene.as_deref());
    cli::run_demo(&mut loaded, &options.settings);
    save_if_requested(&loaded.scene, options)
}

/// 在加载的场景上执行命令脚本，成功后打印集合列表。
pub fn run_cli_script(options: &FrontendOptions, script: &Path) -> Result<(), FrontendError> {
    info!(script = %script.display(), "启动脚本模式");
    let mut loaded = loader::load_scene(options.scene.as_deref());
    let executed = cli::run_script_file(script, &mut loaded.scene, &options.settings)?;
    println!("已执行 {executed} 条命令");
    println!("{}", describe_hide_sets(&loaded.scene));
    save_if_requested(&loaded.scene, options)
}

fn save_if_requested(scene: &Scene, options: &FrontendOptions) -> Result<(), FrontendError> {
    let Some(path) = options.save_on_exit.as_deref() else {
        return Ok(());
    };
    JsonFacade::with_pretty(options.settings.pretty_export)
        .save(scene, path)
        .map_err(FrontendError::SceneSave)?;
    println!("场景已保存到 {}", path.display());
    Ok(())
}
