use std::path::PathBuf;

use hideset_io::IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("读取脚本 {path:?} 失败: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("脚本第 {line} 行 `{command}` 执行失败: {message}")]
    Command {
        line: usize,
        command: String,
        message: String,
    },
    #[error("保存场景失败: {0}")]
    SceneSave(#[source] IoError),
}
