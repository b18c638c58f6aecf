use super::*;

#[test]
fn fixed_step_is_monotonic_and_completes_once() {
    let mut d = FixedStepDriver::new(10);
    let ticks: Vec<FrameTick> = d.start(0.5).collect();
    assert_eq!(ticks.len(), 5);
    assert_eq!(ticks.last(), Some(&FrameTick::Complete));
    assert_eq!(
        ticks
            .iter()
            .filter(|t| matches!(t, FrameTick::Complete))
            .count(),
        1
    );

    let mut prev = 0.0;
    for t in &ticks[..4] {
        let FrameTick::Update(p) = *t else {
            panic!("expected update, got {t:?}");
        };
        assert!(p > prev && p < 1.0);
        prev = p;
    }
}

#[test]
fn zero_duration_only_completes() {
    let mut d = FixedStepDriver::new(60);
    let ticks: Vec<FrameTick> = d.start(0.0).collect();
    assert_eq!(ticks, vec![FrameTick::Complete]);
}

#[test]
fn instant_driver_only_completes() {
    let ticks: Vec<FrameTick> = InstantDriver.start(3.0).collect();
    assert_eq!(ticks, vec![FrameTick::Complete]);
}

#[test]
fn complete_is_fully_eased() {
    assert_eq!(FrameTick::Complete.eased(Ease::InQuad), 1.0);
    assert_eq!(FrameTick::Update(0.5).eased(Ease::InQuad), 0.25);
}
