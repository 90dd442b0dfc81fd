use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 配置文件路径的环境变量。
pub const CONFIG_ENV: &str = "HIDESET_CONFIG";

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 自动发现配置文件：优先读取环境变量 `HIDESET_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontendMode {
    /// 在内置或指定场景上运行演示流程。
    #[default]
    Demo,
    /// 逐行执行命令脚本。
    Script,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontendConfig {
    #[serde(default)]
    pub default_mode: FrontendMode,
    #[serde(default)]
    pub script: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneConfig {
    /// 启动时加载的场景文件；缺省时使用内置演示场景。
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// 退出前把场景保存到该路径。
    #[serde(default)]
    pub save_on_exit: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "ExportConfig::default_path")]
    pub default_path: PathBuf,
    #[serde(default = "ExportConfig::default_pretty")]
    pub pretty: bool,
}

impl ExportConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("hide_set.json")
    }

    fn default_pretty() -> bool {
        true
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_path: Self::default_path(),
            pretty: Self::default_pretty(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_section() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.frontend.default_mode, FrontendMode::Demo);
        assert!(cfg.frontend.script.is_none());
        assert!(cfg.scene.path.is_none());
        assert!(cfg.scene.save_on_exit.is_none());
        assert_eq!(cfg.export.default_path, PathBuf::from("hide_set.json"));
        assert!(cfg.export.pretty);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let cfg = AppConfig::from_toml_str("[export]\npretty = false\n").unwrap();
        assert!(!cfg.export.pretty);
        assert_eq!(cfg.export.default_path, PathBuf::from("hide_set.json"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [frontend]
            default_mode = "script"
            script = "scripts/demo.txt"

            [scene]
            path = "scenes/studio.json"
            save_on_exit = "scenes/out.json"

            [export]
            default_path = "exports/set.json"
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.frontend.default_mode, FrontendMode::Script);
        assert_eq!(
            cfg.frontend.script.as_deref(),
            Some(Path::new("scripts/demo.txt"))
        );
        assert_eq!(
            cfg.scene.path.as_deref(),
            Some(Path::new("scenes/studio.json"))
        );
        assert!(cfg.scene.save_on_exit.is_some());
        assert_eq!(cfg.export.default_path, PathBuf::from("exports/set.json"));
        assert!(cfg.export.pretty);
    }

    #[test]
    fn invalid_files_report_the_path() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[frontend]\ndefault_mode = \"gui\"").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let missing = AppConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
