pub mod apply;
pub mod command;
pub mod diff;
pub mod pid;
pub mod registry;
pub mod session;
pub mod visibility;

pub mod errors {
    use std::path::PathBuf;

    use hideset_core::hide_set::{HideSetError, ListKind};
    use hideset_core::mesh::MeshError;
    use hideset_core::scene::InteractionMode;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("{list:?} hide set index {index} is out of range ({len} sets)")]
        IndexOutOfRange {
            list: ListKind,
            index: usize,
            len: usize,
        },
        #[error("this action requires {expected:?} mode")]
        WrongMode { expected: InteractionMode },
        #[error("nothing eligible is selected")]
        EmptySelection,
        #[error("no objects are available for editing")]
        NoEditObjects,
        #[error("object {0:?} not found")]
        ObjectNotFound(String),
        #[error("object {0:?} has no mesh data")]
        NotAMesh(String),
        #[error("persistent id layers are unavailable on {0:?}")]
        LayersUnavailable(String),
        #[error("hide set has no members")]
        EmptyHideSet,
        #[error("no member of the hide set could be resolved")]
        NothingResolved,
        #[error("invalid argument: {0}")]
        InvalidArgument(String),
        #[error("failed to export hide set to {path:?}")]
        ExportFailed { path: PathBuf },
        #[error(transparent)]
        Mesh(#[from] MeshError),
        #[error(transparent)]
        HideSet(#[from] HideSetError),
    }
}
