use super::*;

fn params(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

#[test]
fn ease_endpoints_are_fixed() {
    for ease in [Ease::Linear, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut] {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        assert_eq!(ease.apply(-3.0), 0.0, "{ease:?}");
    }
    assert!(Ease::EaseIn.apply(0.5) < 0.5);
    assert!(Ease::EaseOut.apply(0.5) > 0.5);
}

#[test]
fn ease_parse_accepts_both_spellings() {
    assert_eq!(Ease::parse("easeIn"), Some(Ease::EaseIn));
    assert_eq!(Ease::parse("ease-out"), Some(Ease::EaseOut));
    assert_eq!(Ease::parse("ease"), Some(Ease::EaseInOut));
    assert_eq!(Ease::parse("bounce"), None);
}

#[test]
fn wipe_names_follow_reveal_direction() {
    let empty = BTreeMap::new();
    assert_eq!(
        TransitionKind::resolve("wipeLeft", &empty),
        TransitionKind::Wipe {
            dir: WipeDir::RightToLeft,
            soft_edge: 0.0
        }
    );
    assert_eq!(
        TransitionKind::resolve("wipeDown", &empty),
        TransitionKind::Wipe {
            dir: WipeDir::TopToBottom,
            soft_edge: 0.0
        }
    );
}

#[test]
fn unknown_type_falls_back_to_crossfade() {
    assert_eq!(
        TransitionKind::resolve("warp", &BTreeMap::new()),
        TransitionKind::Crossfade
    );
}

#[test]
fn parameters_are_read_and_clamped() {
    let p = params(&[
        ("softEdge", serde_json::json!(4.0)),
        ("originX", serde_json::json!(0.25)),
        ("maxBlock", serde_json::json!(0)),
    ]);
    assert_eq!(
        TransitionKind::resolve("circleOpen", &p),
        TransitionKind::Circle {
            open: true,
            origin: Vec2::new(0.25, 0.5),
            soft_edge: 1.0,
        }
    );
    assert_eq!(
        TransitionKind::resolve("pixelate", &p),
        TransitionKind::Pixelate { max_block: 1 }
    );
    assert_eq!(
        TransitionKind::resolve("dissolve", &params(&[("seed", serde_json::json!(9))])),
        TransitionKind::Dissolve { seed: 9 }
    );
}

#[test]
fn plan_fills_both_sources_then_composites() {
    let plan = PreviewPlan::for_type("fadeBlack", 0.25, 32, 18);
    assert_eq!((plan.width, plan.height), (32, 18));
    assert_eq!(plan.ops.len(), 3);
    assert!(matches!(
        plan.ops[0],
        PreviewOp::FillSource {
            source: Source::From,
            body: FROM_BODY,
            ..
        }
    ));
    assert!(matches!(
        plan.ops[1],
        PreviewOp::FillSource {
            source: Source::To,
            body: TO_BODY,
            ..
        }
    ));
    assert_eq!(
        plan.ops[2],
        PreviewOp::Composite {
            kind: TransitionKind::Dip { tint: Tint::Black },
            progress: 0.25,
        }
    );
}

#[test]
fn plan_applies_ease_and_sanitizes_progress() {
    let p = params(&[("ease", serde_json::json!("easeIn"))]);
    let plan = PreviewPlan::with_parameters("fade", &p, 0.5, 4, 4);
    assert_eq!(
        plan.ops[2],
        PreviewOp::Composite {
            kind: TransitionKind::Crossfade,
            progress: 0.25,
        }
    );

    let nan = PreviewPlan::for_type("fade", f32::NAN, 4, 4);
    assert!(matches!(
        nan.ops[2],
        PreviewOp::Composite { progress, .. } if progress == 0.0
    ));
}

#[test]
fn extreme_effect_parameters_are_clamped() {
    let p = params(&[
        ("maxBlock", serde_json::json!(u64::MAX)),
        ("maxRadius", serde_json::json!(1_000_000)),
    ]);
    assert_eq!(
        TransitionKind::resolve("pixelate", &p),
        TransitionKind::Pixelate {
            max_block: MAX_BLOCK_LIMIT
        }
    );
    assert_eq!(
        TransitionKind::resolve("blur", &p),
        TransitionKind::Blur {
            max_radius: MAX_RADIUS_LIMIT
        }
    );
}
