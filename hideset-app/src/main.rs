use std::path::PathBuf;

use hideset_config::{AppConfig, ConfigError, FrontendMode};
use hideset_frontend::FrontendOptions;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut override_mode: Option<FrontendMode> = None;
    let mut config_override: Option<PathBuf> = None;
    let mut scene_override: Option<PathBuf> = None;
    let mut script_override: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => override_mode = Some(FrontendMode::Demo),
            "--script" => {
                let Some(path) = args.next() else {
                    eprintln!("`--script` 需要提供脚本路径");
                    std::process::exit(1);
                };
                override_mode = Some(FrontendMode::Script);
                script_override = Some(PathBuf::from(path));
            }
            "--scene" => {
                let Some(path) = args.next() else {
                    eprintln!("`--scene` 需要提供场景文件路径");
                    std::process::exit(1);
                };
                scene_override = Some(PathBuf::from(path));
            }
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("`--config` 需要提供配置文件路径");
                    std::process::exit(1);
                };
                config_override = Some(PathBuf::from(path));
            }
            other => {
                eprintln!("未知参数：{other}");
                std::process::exit(1);
            }
        }
    }

    let config = load_configuration(config_override);
    init_logging(&config);
    info!("启动隐藏集合管理器");

    let mut options = FrontendOptions::from_config(&config);
    if scene_override.is_some() {
        options.scene = scene_override;
    }

    let mode = override_mode.unwrap_or(config.frontend.default_mode);
    match mode {
        FrontendMode::Demo => {
            info!("以演示模式启动");
            if let Err(err) = hideset_frontend::run_cli_demo(&options) {
                error!(error = %err, "执行 CLI 演示失败");
                std::process::exit(1);
            }
        }
        FrontendMode::Script => {
            let Some(script) = script_override.or_else(|| config.frontend.script.clone()) else {
                error!("脚本模式需要 `--script <path>` 或配置项 frontend.script");
                std::process::exit(1);
            };
            if let Err(err) = hideset_frontend::run_cli_script(&options, &script) {
                error!(error = %err, "执行命令脚本失败");
                std::process::exit(1);
            }
        }
    }
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
