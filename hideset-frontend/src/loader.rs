use std::env;
use std::path::{Path, PathBuf};

use hideset_core::mesh::Mesh;
use hideset_core::scene::{Object, Scene};
use hideset_io::{JsonFacade, SceneLoader};
use tracing::{info, warn};

/// 场景文件路径的环境变量。
pub const SCENE_ENV: &str = "HIDESET_SCENE";

/// 场景来源，便于前端呈现加载信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSource {
    File(PathBuf),
    Demo,
}

/// 统一封装加载后的场景与元信息。
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub source: SceneSource,
}

/// 内置演示场景：一个立方体网格对象和两个普通对象。
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_object(Object::new_mesh("Cube", Mesh::cube(2.0)));
    scene.add_object(Object::new_empty("Lamp"));
    scene.add_object(Object::new_empty("Camera"));
    scene
}

/// 依次尝试显式路径与环境变量 `HIDESET_SCENE`，均不可用时回退到内置演示场景。
pub fn load_scene(explicit: Option<&Path>) -> LoadedScene {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(SCENE_ENV).map(PathBuf::from));
    if let Some(path) = path {
        match JsonFacade::new().load(&path) {
            Ok(scene) => {
                info!(path = %path.display(), objects = scene.objects().len(), "从文件加载场景成功");
                return LoadedScene {
                    scene,
                    source: SceneSource::File(path),
                };
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载场景失败，回退到内置示例");
            }
        }
    }

    LoadedScene {
        scene: demo_scene(),
        source: SceneSource::Demo,
    }
}

#[cfg(test)]
mod tests {
    use hideset_io::SceneSaver;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn explicit_scene_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut scene = Scene::new();
        scene.add_object(Object::new_empty("Only"));
        JsonFacade::new().save(&scene, &path).unwrap();

        let loaded = load_scene(Some(&path));
        assert_eq!(loaded.source, SceneSource::File(path));
        assert!(loaded.scene.objects().contains("Only"));
    }

    #[test]
    fn unreadable_scene_falls_back_to_demo() {
        let dir = tempdir().unwrap();
        let loaded = load_scene(Some(&dir.path().join("missing.json")));
        assert_eq!(loaded.source, SceneSource::Demo);
        assert_eq!(loaded.scene.objects().len(), 3);
        assert!(loaded.scene.objects().get("Cube").unwrap().is_mesh());
    }
}
