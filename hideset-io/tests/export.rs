use std::fs;

use glam::DVec3;
use serde_json::{Value, json};
use tempfile::tempdir;

use hideset_core::hide_set::{ElementKind, ElementRef, HideSet, ListKind, PidCounter};
use hideset_core::mesh::{ElementHandle, Mesh, MeshKind, VertId};
use hideset_core::scene::{Object, Scene};
use hideset_io::{
    ExportOptions, HideSetDocument, JsonFacade, SceneLoader, SceneSaver, export_hide_set,
    export_hide_set_with,
};

#[test]
fn exported_document_has_the_expected_shape() {
    let dir = tempdir().expect("创建临时目录失败");
    let path = dir.path().join("corners.json");
    let mut set = HideSet::new("Corners", ElementKind::Vert);
    set.add_unique(ElementRef::mesh("Cube", MeshKind::Vert, 3, true))
        .unwrap();

    assert!(export_hide_set(&path, &set));

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["version"], json!(1));
    assert_eq!(value["name"], json!("Corners"));
    assert_eq!(value["mode"], json!("VERT"));
    assert_eq!(
        value["elements"][0],
        json!({"object": "Cube", "type": "VERT", "pid": 3, "hidden": true})
    );
}

#[test]
fn object_sets_export_the_sentinel_pid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("props.json");
    let mut set = HideSet::new("Props", ElementKind::Object);
    set.add_unique(ElementRef::object("Lamp", false)).unwrap();

    assert!(export_hide_set_with(
        &path,
        &set,
        ExportOptions { pretty: false }
    ));
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains('\n'));
    let document: HideSetDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(document.elements[0].pid, -1);
    assert_eq!(document.elements[0].kind, ElementKind::Object);
}

#[test]
fn export_to_an_unwritable_path_reports_false() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("set.json");
    let set = HideSet::new("Nowhere", ElementKind::Face);
    assert!(!export_hide_set(&path, &set));
    assert!(!path.exists());
}

#[test]
fn scene_round_trip_keeps_ids_sets_and_counter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.json");

    let mut mesh = Mesh::cube(2.0);
    let layer = mesh.add_int_layer(MeshKind::Vert, "hm_vid").unwrap();
    let handle = ElementHandle::Vert(VertId::new(5));
    mesh.set_layer_value(handle, layer, 42).unwrap();
    mesh.set_hide_flag(handle, true).unwrap();
    mesh.add_vert(DVec3::new(3.0, 0.0, 0.0));

    let mut scene = Scene::new();
    scene.add_object(Object::new_mesh("Cube", mesh));
    let mut lamp = Object::new_empty("Lamp");
    lamp.hide_set(true).unwrap();
    scene.add_object(lamp);
    let mut set = HideSet::new("Corner", ElementKind::Vert);
    set.add_unique(ElementRef::mesh("Cube", MeshKind::Vert, 42, true))
        .unwrap();
    scene.hide_sets_mut().push(set);
    *scene.hide_sets_mut().counter_mut() = PidCounter::new(43);

    let facade = JsonFacade::new();
    facade.save(&scene, &path).expect("保存场景失败");
    let loaded = facade.load(&path).expect("读取场景失败");

    let cube = loaded.objects().get("Cube").unwrap().mesh().unwrap();
    assert_eq!(cube.count(MeshKind::Vert), 9);
    let layer = cube.int_layer(MeshKind::Vert, "hm_vid").unwrap();
    assert_eq!(cube.layer_value(handle, layer), Some(42));
    assert_eq!(cube.hide_flag(handle), Some(true));
    assert!(loaded.objects().get("Lamp").unwrap().hide_get().unwrap());
    assert_eq!(loaded.hide_sets(), scene.hide_sets());
    assert_eq!(loaded.hide_sets().counter().peek(), 43);
    assert_eq!(loaded.hide_sets().len(ListKind::Edit), 1);
}

#[test]
fn loading_garbage_reports_the_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let err = JsonFacade::new().load(&path).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
    assert!(JsonFacade::new().load(&dir.path().join("absent.json")).is_err());
}

#[test]
fn compact_scene_files_are_a_single_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.json");
    let mut scene = Scene::new();
    scene.add_object(Object::new_mesh("Cube", Mesh::cube(1.0)));
    JsonFacade::with_pretty(false).save(&scene, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.trim_end().lines().count(), 1);
    assert_eq!(JsonFacade::new().load(&path).unwrap().objects().len(), 1);
}
