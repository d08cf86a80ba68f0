use std::path::PathBuf;

use super::*;
use crate::foundation::core::ClipId;

const DOC: &str = r#"{
  "project": {
    "tracks": [
      {
        "id": "v1",
        "kind": "video",
        "clips": [
          { "id": "a", "durationSeconds": 2.0, "trackId": "v1", "startTime": 0.0 },
          { "id": "b", "durationSeconds": 3.0, "trackId": "v1", "startTime": 2.0 }
        ]
      }
    ]
  },
  "currentTime": 1.5
}"#;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("json_file_store");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn parses_host_document() {
    let doc = ProjectDocument::from_reader(DOC.as_bytes()).unwrap();
    let project = doc.project.unwrap();
    assert_eq!(doc.current_time, Some(1.5));
    assert_eq!(project.tracks[0].clips.len(), 2);
    assert!(project.transitions.is_none());
    assert_eq!(project.clip(&ClipId::from("b")).unwrap().duration_secs, 3.0);
}

#[test]
fn missing_project_is_not_an_error() {
    let doc = ProjectDocument::from_reader("{}".as_bytes()).unwrap();
    assert!(doc.project.is_none());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = ProjectDocument::from_reader("{\"project\": [".as_bytes()).unwrap_err();
    assert!(matches!(err, SegueError::Serde(_)));
}

#[test]
fn duplicate_clip_ids_are_rejected() {
    let dup = DOC.replace("\"id\": \"b\"", "\"id\": \"a\"");
    let err = ProjectDocument::from_reader(dup.as_bytes()).unwrap_err();
    assert!(matches!(err, SegueError::Validation(_)));
}

#[test]
fn save_now_rewrites_the_file() {
    let path = scratch("save_now.json");
    std::fs::write(&path, DOC).unwrap();

    let mut store = JsonFileStore::open(&path).unwrap();
    let track = store.add_track(TrackKind::Audio).unwrap();
    assert_eq!(track.as_str(), "a1");
    assert_eq!(store.save_now(), HookOutcome::Ran);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.document(), store.document());
    assert_eq!(reopened.current_time(), Some(1.5));
}

#[test]
fn add_clip_to_unknown_track_fails() {
    let doc = ProjectDocument::from_reader(DOC.as_bytes()).unwrap();
    let mut store = JsonFileStore::with_document(scratch("unused.json"), doc);
    let clip = Clip {
        id: ClipId::from("c"),
        duration_secs: 1.0,
        track_id: TrackId::from("v9"),
        start_time_secs: 5.0,
    };
    assert!(matches!(
        store.add_clip(&TrackId::from("v9"), clip),
        HookOutcome::Failed(_)
    ));
}

#[test]
fn open_missing_file_fails() {
    assert!(JsonFileStore::open(scratch("does_not_exist.json")).is_err());
}
