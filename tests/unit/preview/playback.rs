use super::*;
use crate::preview::plan::{FROM_BODY, TO_BODY};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn one_shot_runs_zero_to_one_then_stops() {
    let t0 = Instant::now();
    let p = PreviewPlayback::start("fade", t0, ms(1000));
    assert_eq!(p.progress_at(t0), Some(0.0));
    let mid = p.progress_at(t0 + ms(500)).unwrap();
    assert!((mid - 0.5).abs() < 1e-6);
    assert_eq!(p.progress_at(t0 + ms(1000)), Some(1.0));
    assert_eq!(p.progress_at(t0 + ms(1001)), None);
    assert!(!p.is_running(t0 + ms(2000)));
}

#[test]
fn looping_wraps_around() {
    let t0 = Instant::now();
    let p = PreviewPlayback::start("wipeLeft", t0, ms(1000)).looping();
    let wrapped = p.progress_at(t0 + ms(2250)).unwrap();
    assert!((wrapped - 0.25).abs() < 1e-6);
}

#[test]
fn cancel_is_immediate_and_idempotent() {
    let t0 = Instant::now();
    let mut p = PreviewPlayback::start("blur", t0, ms(1000)).looping();
    p.cancel();
    p.cancel();
    assert!(p.is_cancelled());
    let mut dst = Surface::new(4, 4);
    assert_eq!(p.frame(t0 + ms(10), &mut dst), None);
    assert_eq!(dst, Surface::new(4, 4));
}

#[test]
fn frames_draw_endpoints() {
    let t0 = Instant::now();
    let p = PreviewPlayback::start("circleOpen", t0, ms(400));
    let mut dst = Surface::new(10, 10);
    p.frame(t0, &mut dst).unwrap();
    assert_eq!(dst.pixel(5, 9), FROM_BODY);
    p.frame(t0 + ms(400), &mut dst).unwrap();
    assert_eq!(dst.pixel(5, 9), TO_BODY);
}
