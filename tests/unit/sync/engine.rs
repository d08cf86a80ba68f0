use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::foundation::core::{ClipId, TrackId};
use crate::graph::instance::{TransitionOptions, TransitionRequest};
use crate::store::locate::{Discovery, StoreLocator, StoreSlot};
use crate::store::model::{Clip, Project, Track, TrackKind};
use crate::store::project_store::{MemoryStore, ProjectStore};

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

struct Rig {
    slot: StoreSlot,
    bridge: StoreBridge,
    graph: TransitionGraph,
    engine: SyncEngine,
    events: Rc<RefCell<Vec<SyncEvent>>>,
}

impl Rig {
    fn new() -> Self {
        let slot = StoreSlot::new();
        let bridge = StoreBridge::new(StoreLocator::new().with(Discovery::Handle(slot.clone())));
        let mut engine = SyncEngine::default();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        Self {
            slot,
            bridge,
            graph: TransitionGraph::new(),
            engine,
            events,
        }
    }

    fn connect(&self, project: Project) -> Rc<RefCell<MemoryStore>> {
        let store = Rc::new(RefCell::new(MemoryStore::new(project)));
        self.slot.set(store.clone());
        store
    }

    fn tick(&mut self) -> TickReport {
        self.engine.poll_tick(&self.bridge, &mut self.graph)
    }

    fn take_events(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

fn add(from: &str, to: &str, ty: &str) -> PendingOperation {
    PendingOperation::Add(TransitionRequest::new(from, to, ty))
}

#[test]
fn disconnected_tick_is_a_no_op() {
    let mut rig = Rig::new();
    rig.engine.enqueue(add("a", "b", "fade"));
    let report = rig.tick();
    assert_eq!(report, TickReport::default());
    assert_eq!(rig.engine.state(), ConnectionState::Disconnected);
    assert_eq!(rig.engine.pending_len(), 1);
    assert!(rig.take_events().is_empty());
}

#[test]
fn repeated_ticks_without_change_signal_once() {
    let mut rig = Rig::new();
    rig.connect(project(&[("a", 2.0), ("b", 2.0)]));

    let first = rig.tick();
    assert!(first.connected && first.topology_changed);
    let snap = rig.engine.last_topology();
    let events = rig.take_events();
    assert_eq!(events[0], SyncEvent::StoreConnected);
    assert!(matches!(events[1], SyncEvent::TopologyChanged(_)));

    let second = rig.tick();
    assert!(second.connected);
    assert!(!second.topology_changed);
    assert_eq!(rig.engine.last_topology(), snap);
    assert!(rig.take_events().is_empty());
}

#[test]
fn queued_adds_replay_in_order_after_connect() {
    let mut rig = Rig::new();
    rig.engine.enqueue(add("a", "b", "fade"));
    rig.engine.enqueue(add("b", "c", "wipeLeft"));
    rig.tick();

    let store = rig.connect(project(&[("a", 4.0), ("b", 4.0), ("c", 4.0)]));
    let report = rig.tick();
    assert_eq!(report.applied, 2);
    assert_eq!(report.dropped, 0);
    assert_eq!(rig.engine.pending_len(), 0);

    let stored: Vec<(String, String, String)> = rig
        .bridge
        .read_transitions()
        .into_iter()
        .map(|t| (t.from_clip_id.0, t.to_clip_id.0, t.type_id))
        .collect();
    assert_eq!(
        stored,
        vec![
            ("a".into(), "b".into(), "fade".into()),
            ("b".into(), "c".into(), "wipeLeft".into()),
        ]
    );
    assert_eq!(rig.graph.get(&id("b")).unwrap().type_id, "wipeLeft");
    assert_eq!(store.borrow().saves(), 2);
}

#[test]
fn replay_clamps_against_live_durations() {
    let mut rig = Rig::new();
    let req = TransitionRequest::new("a", "b", "fade")
        .with_options(TransitionOptions::with_duration(3.0));
    rig.engine.enqueue(PendingOperation::Add(req));
    rig.connect(project(&[("a", 4.0), ("b", 1.0)]));
    rig.tick();
    assert_eq!(rig.bridge.read_transitions()[0].duration_secs, 0.5);
}

#[test]
fn failing_operations_are_dropped_and_reported() {
    let mut rig = Rig::new();
    rig.engine.enqueue(add("a", "b", "warp"));
    rig.engine.enqueue(add("a", "c", "fade"));
    rig.engine.enqueue(add("b", "c", "fade"));
    rig.connect(project(&[("a", 2.0), ("b", 2.0), ("c", 2.0)]));

    let report = rig.tick();
    assert_eq!(report.applied, 1);
    assert_eq!(report.dropped, 2);

    let dropped: Vec<String> = rig
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            SyncEvent::OperationDropped { reason, .. } => Some(reason),
            _ => None,
        })
        .collect();
    assert_eq!(dropped.len(), 2);
    assert!(dropped[0].contains("warp"));
    assert!(dropped[1].contains("not adjacent"));
    assert_eq!(rig.bridge.read_transitions().len(), 1);
}

#[test]
fn queued_removal_applies_to_stored_record() {
    let mut rig = Rig::new();
    let mut p = project(&[("a", 2.0), ("b", 2.0)]);
    let stored = TransitionGraph::new()
        .build(&TransitionRequest::new("a", "b", "blur"), &crate::NoClips)
        .unwrap();
    p.transitions = Some(vec![stored]);
    rig.engine.enqueue(PendingOperation::Remove { clip_id: id("b") });
    rig.connect(p);

    let report = rig.tick();
    assert_eq!(report.applied, 1);
    assert!(rig.bridge.read_transitions().is_empty());
    assert!(rig.graph.is_empty());
}

#[test]
fn connect_rehydrates_graph_from_store() {
    let mut rig = Rig::new();
    let mut p = project(&[("a", 2.0), ("b", 2.0)]);
    let stored = TransitionGraph::new()
        .build(&TransitionRequest::new("a", "b", "mirror"), &crate::NoClips)
        .unwrap();
    p.transitions = Some(vec![stored.clone()]);
    rig.connect(p);
    rig.tick();
    assert_eq!(rig.graph.get_between(&id("a"), &id("b")), Some(&stored));

    rig.tick();
    let connects = rig
        .take_events()
        .iter()
        .filter(|e| **e == SyncEvent::StoreConnected)
        .count();
    assert_eq!(connects, 1);
}

#[test]
fn deleting_a_clip_cascades_and_trimming_reclamps() {
    let mut rig = Rig::new();
    let store = rig.connect(project(&[("a", 4.0), ("b", 4.0), ("c", 4.0)]));
    rig.engine.enqueue(add("a", "b", "fade"));
    rig.engine.enqueue(add("b", "c", "fade"));
    rig.tick();
    assert_eq!(rig.bridge.read_transitions().len(), 2);
    rig.take_events();

    store.borrow_mut().project_mut().unwrap().tracks[0]
        .clips
        .retain(|c| c.id != id("c"));
    let report = rig.tick();
    assert!(report.topology_changed);
    let left = rig.bridge.read_transitions();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].to_clip_id, id("b"));
    assert!(rig.graph.get(&id("c")).is_none());

    store.borrow_mut().project_mut().unwrap().tracks[0].clips[1].duration_secs = 1.0;
    assert!(rig.tick().topology_changed);
    assert_eq!(rig.bridge.read_transitions()[0].duration_secs, 0.5);
    assert_eq!(
        rig.take_events()
            .iter()
            .filter(|e| matches!(e, SyncEvent::TopologyChanged(_)))
            .count(),
        2
    );
}

#[test]
fn advance_follows_interval_and_stop_is_idempotent() {
    let mut rig = Rig::new();
    rig.connect(project(&[("a", 2.0)]));
    let t0 = Instant::now();
    assert!(rig.engine.advance(t0, &rig.bridge, &mut rig.graph).is_some());
    assert!(
        rig.engine
            .advance(t0 + Duration::from_millis(100), &rig.bridge, &mut rig.graph)
            .is_none()
    );
    assert!(
        rig.engine
            .advance(t0 + Duration::from_millis(500), &rig.bridge, &mut rig.graph)
            .is_some()
    );

    rig.engine.stop();
    rig.engine.stop();
    assert!(rig.engine.is_stopped());
    assert!(
        rig.engine
            .advance(t0 + Duration::from_secs(5), &rig.bridge, &mut rig.graph)
            .is_none()
    );
    assert!(rig.tick().connected);
}

#[test]
fn store_busy_mid_tick_keeps_queue() {
    let mut rig = Rig::new();
    let store = rig.connect(project(&[("a", 2.0), ("b", 2.0)]));
    rig.engine.enqueue(add("a", "b", "fade"));
    let guard = store.borrow_mut();
    assert!(!rig.tick().connected);
    drop(guard);
    assert_eq!(rig.engine.pending_len(), 1);
    assert_eq!(rig.tick().applied, 1);
}

fn edges(list: Vec<crate::graph::instance::TransitionInstance>) -> Vec<(String, String, String)> {
    list.into_iter()
        .map(|t| (t.from_clip_id.0, t.to_clip_id.0, t.type_id))
        .collect()
}

#[test]
fn dropped_replay_after_reconnect_restores_mirror_from_store() {
    let mut rig = Rig::new();
    let store = rig.connect(project(&[("a", 2.0), ("b", 2.0), ("c", 2.0)]));
    rig.engine.enqueue(add("b", "c", "fade"));
    rig.tick();
    assert!(rig.engine.is_connected());

    rig.slot.clear();
    let req = TransitionRequest::new("a", "c", "wipeLeft");
    rig.graph.add(&req, &crate::NoClips).unwrap();
    rig.engine.enqueue(PendingOperation::Add(req));
    assert!(rig.graph.get(&id("b")).is_none());
    assert!(!rig.tick().connected);

    rig.slot.set(store);
    let report = rig.tick();
    assert_eq!((report.applied, report.dropped), (0, 1));
    let stored = edges(rig.bridge.read_transitions());
    assert_eq!(stored, vec![("b".into(), "c".into(), "fade".into())]);
    assert_eq!(edges(rig.graph.export_all()), stored);
}

#[test]
fn successful_replay_after_reconnect_keeps_store_and_mirror_in_step() {
    let mut rig = Rig::new();
    let store = rig.connect(project(&[("a", 2.0), ("b", 2.0), ("c", 2.0)]));
    rig.tick();

    rig.slot.clear();
    let req = TransitionRequest::new("a", "b", "dissolve");
    rig.graph.add(&req, &crate::NoClips).unwrap();
    rig.engine.enqueue(PendingOperation::Add(req));
    rig.tick();
    assert_eq!(rig.engine.pending_len(), 1);

    rig.slot.set(store);
    let report = rig.tick();
    assert_eq!((report.applied, report.dropped), (1, 0));
    assert_eq!(rig.engine.pending_len(), 0);
    let stored = edges(rig.bridge.read_transitions());
    assert_eq!(stored, vec![("a".into(), "b".into(), "dissolve".into())]);
    assert_eq!(edges(rig.graph.export_all()), stored);
    assert_eq!(rig.graph.get(&id("a")).unwrap().duration_secs, 1.0);
}

#[test]
fn reclamp_keeps_stored_record_order() {
    let mut rig = Rig::new();
    let store = rig.connect(project(&[("a", 4.0), ("b", 4.0), ("c", 4.0)]));
    rig.engine.enqueue(add("a", "b", "fade"));
    rig.engine.enqueue(add("b", "c", "wipeLeft"));
    rig.tick();

    store.borrow_mut().project_mut().unwrap().tracks[0].clips[0].duration_secs = 1.0;
    assert!(rig.tick().topology_changed);
    let stored = rig.bridge.read_transitions();
    assert_eq!(
        edges(stored.clone()),
        vec![
            ("a".into(), "b".into(), "fade".into()),
            ("b".into(), "c".into(), "wipeLeft".into()),
        ]
    );
    assert_eq!(stored[0].duration_secs, 0.5);
    assert_eq!(stored[1].duration_secs, 0.8);
}
