use super::*;

#[test]
fn resolves_exactly_once_after_all_completions() {
    let mut p = PreloadProgress::new(4);
    let ticks: Vec<_> = [true, false, true, false]
        .into_iter()
        .map(|ok| p.record(ok))
        .collect();

    assert_eq!(
        ticks.iter().filter(|t| t.resolved).count(),
        1,
        "join must resolve once"
    );
    assert!(ticks.last().unwrap().resolved);
    assert_eq!(ticks.last().unwrap().percent, 100);
    assert_eq!(p.failed(), 2);
    assert!(p.is_resolved());
    assert!(!p.try_resolve());
}

#[test]
fn percent_rounds_to_nearest() {
    let mut p = PreloadProgress::new(3);
    assert_eq!(p.record(true).percent, 33);
    assert_eq!(p.record(true).percent, 67);
    assert_eq!(p.record(true).label(), "100%");

    let mut p = PreloadProgress::new(8);
    assert_eq!(p.record(true).percent, 13); // 12.5 rounds up
}

#[test]
fn extra_completions_do_not_overcount_or_reresolve() {
    let mut p = PreloadProgress::new(1);
    assert!(p.record(true).resolved);
    let extra = p.record(false);
    assert!(!extra.resolved);
    assert_eq!(extra.completed, 1);
    assert_eq!(p.failed(), 0);
}

#[test]
fn empty_join_resolves_immediately_once() {
    let mut p = PreloadProgress::new(0);
    assert_eq!(p.percent(), 100);
    assert!(p.try_resolve());
    assert!(!p.try_resolve());
}
