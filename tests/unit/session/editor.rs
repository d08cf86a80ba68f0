use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::foundation::core::TrackId;
use crate::foundation::error::SegueError;
use crate::store::locate::{Discovery, StoreLocator, StoreSlot};
use crate::store::model::{Clip, Project, Track, TrackKind};
use crate::store::project_store::MemoryStore;

fn project(clips: &[(&str, f64)]) -> Project {
    let mut start = 0.0;
    let clips = clips
        .iter()
        .map(|(id, dur)| {
            let c = Clip {
                id: ClipId::from(*id),
                duration_secs: *dur,
                track_id: TrackId::from("v1"),
                start_time_secs: start,
            };
            start += dur;
            c
        })
        .collect();
    Project {
        tracks: vec![Track {
            id: TrackId::from("v1"),
            kind: TrackKind::Video,
            clips,
        }],
        transitions: None,
    }
}

fn id(s: &str) -> ClipId {
    ClipId::from(s)
}

fn connected(clips: &[(&str, f64)]) -> (Rc<RefCell<MemoryStore>>, TransitionEditor) {
    let store = Rc::new(RefCell::new(MemoryStore::new(project(clips))));
    let editor = TransitionEditor::for_store(store.clone());
    (store, editor)
}

#[test]
fn request_with_store_writes_through() {
    let (store, mut editor) = connected(&[("a", 4.0), ("b", 1.0)]);
    let out = editor
        .request_transition(
            TransitionRequest::new("a", "b", "fade")
                .with_options(TransitionOptions::with_duration(3.0)),
        )
        .unwrap();
    assert!(out.is_applied());
    assert_eq!(out.instance().duration_secs, 0.5);
    assert_eq!(editor.transition_for(&id("b")).unwrap().type_id, "fade");
    assert_eq!(store.borrow().saves(), 1);
}

#[test]
fn unknown_type_is_rejected_up_front() {
    let mut editor = TransitionEditor::new(StoreBridge::default(), SegueConfig::default());
    let err = editor
        .request_transition(TransitionRequest::new("a", "b", "warp"))
        .unwrap_err();
    assert!(matches!(err, SegueError::UnknownType(_)));
    assert_eq!(editor.engine().pending_len(), 0);
}

#[test]
fn disconnected_requests_queue_and_replay() {
    let slot = StoreSlot::new();
    let bridge = StoreBridge::new(StoreLocator::new().with(Discovery::Handle(slot.clone())));
    let mut editor = TransitionEditor::new(bridge, SegueConfig::default());

    let out = editor
        .request_transition(TransitionRequest::new("a", "b", "slideUp"))
        .unwrap();
    assert!(!out.is_applied());
    assert_eq!(editor.transition_for(&id("a")).unwrap().type_id, "slideUp");
    assert_eq!(editor.engine().pending_len(), 1);

    slot.set(Rc::new(RefCell::new(MemoryStore::new(project(&[
        ("a", 2.0),
        ("b", 2.0),
    ])))));
    let report = editor.tick();
    assert_eq!(report.applied, 1);
    assert_eq!(
        editor
            .transition_between(&id("a"), &id("b"))
            .unwrap()
            .type_id,
        "slideUp"
    );
}

#[test]
fn store_withdrawn_then_restored_reconciles_rejected_request() {
    let slot = StoreSlot::new();
    let bridge = StoreBridge::new(StoreLocator::new().with(Discovery::Handle(slot.clone())));
    let mut editor = TransitionEditor::new(bridge, SegueConfig::default());
    let store: SharedStore = Rc::new(RefCell::new(MemoryStore::new(project(&[
        ("a", 2.0),
        ("b", 2.0),
        ("c", 2.0),
    ]))));
    slot.set(store.clone());
    editor.tick();
    assert!(
        editor
            .request_transition(TransitionRequest::new("b", "c", "fade"))
            .unwrap()
            .is_applied()
    );

    slot.clear();
    let out = editor
        .request_transition(TransitionRequest::new("a", "c", "wipeLeft"))
        .unwrap();
    assert!(!out.is_applied());
    assert!(editor.transition_between(&id("b"), &id("c")).is_none());

    slot.set(store);
    let report = editor.tick();
    assert_eq!((report.applied, report.dropped), (0, 1));
    assert!(editor.transition_between(&id("a"), &id("c")).is_none());
    assert_eq!(
        editor
            .transition_between(&id("b"), &id("c"))
            .unwrap()
            .type_id,
        "fade"
    );
    assert_eq!(editor.graph().export_all(), editor.bridge().read_transitions());
}

#[test]
fn removal_without_transition_reports_false() {
    let (_store, mut editor) = connected(&[("a", 2.0), ("b", 2.0)]);
    editor
        .request_transition(TransitionRequest::new("a", "b", "fade"))
        .unwrap();
    assert!(!editor.request_removal(&id("zzz")).unwrap());
    assert_eq!(editor.bridge().read_transitions().len(), 1);
    assert!(editor.request_removal(&id("a")).unwrap());
    assert!(editor.transition_for(&id("a")).is_none());
}

#[test]
fn transition_after_uses_successor() {
    let (_store, mut editor) = connected(&[("a", 2.0), ("b", 2.0)]);
    let out = editor
        .request_transition_after(&id("a"), "mirror", TransitionOptions::default())
        .unwrap();
    assert_eq!(out.instance().to_clip_id, id("b"));
    assert!(matches!(
        editor.request_transition_after(&id("b"), "mirror", TransitionOptions::default()),
        Err(SegueError::NoSuccessor(_))
    ));
}

#[test]
fn preset_picks_a_member() {
    let (_store, mut editor) = connected(&[("a", 2.0), ("b", 2.0)]);
    let mut rng = StdRng::seed_from_u64(3);
    let out = editor
        .apply_preset(&id("a"), &id("b"), "cinematic", &mut rng)
        .unwrap();
    let members = editor.catalog().preset("cinematic").unwrap().members;
    assert!(members.contains(&out.instance().type_id.as_str()));
    assert!(matches!(
        editor.apply_preset(&id("a"), &id("b"), "loud", &mut rng),
        Err(SegueError::UnknownPreset(_))
    ));
}

#[test]
fn filter_graphs_offset_by_from_clip() {
    let (_store, mut editor) = connected(&[("a", 5.0), ("b", 5.0)]);
    editor
        .request_transition(TransitionRequest::new("a", "b", "wipeDown"))
        .unwrap();
    let graphs = editor.filter_graphs(false).unwrap();
    assert_eq!(graphs.len(), 1);
    assert_eq!(
        graphs[0].1,
        "[0:v][1:v]xfade=transition=wipedown:duration=0.800:offset=4.200[v]"
    );
}

#[test]
fn clip_preview_requires_a_transition() {
    let (_store, mut editor) = connected(&[("a", 2.0), ("b", 2.0)]);
    let mut surface = editor.preview_surface();
    assert!(!editor.render_clip_preview(&id("a"), 0.5, &mut surface));
    editor
        .request_transition(TransitionRequest::new("a", "b", "blur"))
        .unwrap();
    assert!(editor.render_clip_preview(&id("a"), 0.5, &mut surface));
    assert_eq!(surface.width(), 160);
}
