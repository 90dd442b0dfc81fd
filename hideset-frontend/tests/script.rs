use std::fs;

use hideset_core::hide_set::ListKind;
use hideset_core::mesh::MeshKind;
use hideset_engine::pid::build_maps;
use hideset_frontend::{FrontendOptions, run_cli_script};
use hideset_io::{JsonFacade, SceneLoader};
use tempfile::tempdir;

#[test]
fn ids_and_sets_survive_a_save_and_reload() {
    let dir = tempdir().expect("创建临时目录失败");
    let saved = dir.path().join("scene.json");
    let first = dir.path().join("first.txt");
    fs::write(
        &first,
        "edit_mode Cube\n\
         select_elements Cube face 1 2\n\
         register_hide_set face 侧面\n\
         object_mode\n",
    )
    .unwrap();

    let options = FrontendOptions {
        save_on_exit: Some(saved.clone()),
        ..FrontendOptions::default()
    };
    run_cli_script(&options, &first).expect("第一次脚本失败");

    // 第二次运行：从保存的场景继续，同步后隐藏。
    let second = dir.path().join("second.txt");
    fs::write(
        &second,
        "edit_mode Cube\n\
         sync_hide_set edit 0\n\
         apply_hide_set edit 0 hide\n\
         object_mode\n",
    )
    .unwrap();
    let options = FrontendOptions {
        scene: Some(saved.clone()),
        save_on_exit: Some(saved.clone()),
        ..FrontendOptions::default()
    };
    run_cli_script(&options, &second).expect("第二次脚本失败");

    let scene = JsonFacade::new().load(&saved).unwrap();
    let set = scene.hide_sets().get(ListKind::Edit, 0).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.elements().iter().all(|it| !it.saved_hidden));
    assert_eq!(scene.hide_sets().counter().peek(), 3);

    let mesh = scene.objects().get("Cube").unwrap().mesh().unwrap();
    let maps = build_maps(mesh);
    assert_eq!(maps.len(MeshKind::Face), 2);
    let hidden = mesh.faces().filter(|(_, face)| face.hide).count();
    assert_eq!(hidden, 2);
}
