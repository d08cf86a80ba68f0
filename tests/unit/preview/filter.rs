use super::*;
use crate::catalog::registry::TransitionCatalog;
use crate::foundation::core::NoClips;
use crate::graph::graph::TransitionGraph;
use crate::graph::instance::{TransitionOptions, TransitionRequest};

#[test]
fn every_catalog_type_has_an_xfade_name() {
    for ty in TransitionCatalog::builtin().list(None) {
        assert!(!xfade_transition_name(ty.id).is_empty(), "{}", ty.id);
    }
    assert_eq!(xfade_transition_name("warp"), DEFAULT_XFADE);
    assert_eq!(xfade_transition_name("wipeLeft"), "wipeleft");
}

#[test]
fn filter_graph_formats_duration_and_offset() {
    let t = TransitionGraph::new()
        .build(
            &TransitionRequest::new("a", "b", "circleOpen")
                .with_options(TransitionOptions::with_duration(0.75)),
            &NoClips,
        )
        .unwrap();
    assert_eq!(
        xfade_filter_graph(&t, 4.25, false),
        "[0:v][1:v]xfade=transition=circleopen:duration=0.750:offset=4.250[v]"
    );
    assert_eq!(
        xfade_filter_graph(&t, -1.0, true),
        "[0:v][1:v]xfade=transition=circleopen:duration=0.750:offset=0.000[v];\
         [0:a][1:a]acrossfade=d=0.750[a]"
    );
}

#[test]
fn offset_ends_transition_with_first_clip() {
    assert_eq!(xfade_offset_secs(5.0, 1.0), 4.0);
    assert_eq!(xfade_offset_secs(0.5, 1.0), 0.0);
    assert_eq!(xfade_offset_secs(f64::NAN, 1.0), 0.0);
}
