use super::*;

fn sample() -> Timeline {
    Timeline::build([("Welcome!", 2.0), ("Watch This", 3.0), ("Goodbye!", 1.5)]).unwrap()
}

#[test]
fn segments_are_contiguous_from_zero() {
    let tl = sample();
    let segs = tl.segments();
    assert_eq!(segs[0].start, 0.0);
    for pair in segs.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert_eq!(tl.total_duration(), 6.5);
    assert_eq!(
        segs.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
        ["Welcome!", "Watch This", "Goodbye!"]
    );
}

#[test]
fn lookup_is_half_open() {
    let tl = sample();
    assert_eq!(tl.active_at(0.0).unwrap().text, "Welcome!");
    assert_eq!(tl.active_at(1.999).unwrap().text, "Welcome!");
    assert_eq!(tl.active_at(2.0).unwrap().text, "Watch This");
    assert_eq!(tl.active_at(4.999).unwrap().text, "Watch This");
    assert_eq!(tl.active_at(5.0).unwrap().text, "Goodbye!");
    assert!(tl.active_at(6.5).is_none());
    assert!(tl.active_at(100.0).is_none());
    assert!(tl.active_at(-0.001).is_none());
    assert!(tl.active_at(f64::NAN).is_none());
}

#[test]
fn every_time_in_range_has_exactly_one_segment() {
    let tl = sample();
    let mut t = 0.0;
    while t < tl.total_duration() {
        let hits = tl.segments().iter().filter(|s| s.contains(t)).count();
        assert_eq!(hits, 1, "t = {t}");
        assert!(tl.active_at(t).is_some());
        t += 0.01;
    }
}

#[test]
fn zero_and_negative_durations_are_rejected() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = Timeline::build([("A", 1.0), ("B", bad)]).unwrap_err();
        assert!(
            matches!(err, CaptionError::InvalidDuration(_)),
            "duration {bad}: {err:?}"
        );
    }
}

#[test]
fn empty_caption_list_is_rejected() {
    let err = Timeline::build(Vec::<CaptionSpec>::new()).unwrap_err();
    assert!(matches!(err, CaptionError::Validation(_)));
}

#[test]
fn frame_count_floors_total_duration() {
    let tl = Timeline::build([("A", 1.0), ("B", 1.0)]).unwrap();
    assert_eq!(tl.frame_count(Fps::new(5, 1).unwrap()), 10);

    let tl = Timeline::build([("Hi", 2.0)]).unwrap();
    assert_eq!(tl.frame_count(Fps::new(3, 1).unwrap()), 6);

    let tl = Timeline::build([("x", 0.25)]).unwrap();
    assert_eq!(tl.frame_count(Fps::new(30, 1).unwrap()), 7);
}

#[test]
fn frame_lookup_matches_five_fps_scenario() {
    let fps = Fps::new(5, 1).unwrap();
    let tl = Timeline::build([("A", 1.0), ("B", 1.0)]).unwrap();
    for f in 0..5 {
        assert_eq!(tl.active_at_frame(FrameIndex(f), fps).unwrap().text, "A");
    }
    for f in 5..10 {
        assert_eq!(tl.active_at_frame(FrameIndex(f), fps).unwrap().text, "B");
    }
    assert!(tl.active_at_frame(FrameIndex(10), fps).is_none());
}

#[test]
fn equal_captions_get_equal_frame_spans() {
    let fps = Fps::new(30, 1).unwrap();
    let tl = Timeline::build([("a", 0.1), ("b", 0.1), ("c", 0.1), ("d", 0.1)]).unwrap();
    assert_eq!(tl.frame_count(fps), 12);

    let labels: Vec<_> = (0..12)
        .map(|f| tl.active_at_frame(FrameIndex(f), fps).unwrap().text.clone())
        .collect();
    assert_eq!(
        labels,
        ["a", "a", "a", "b", "b", "b", "c", "c", "c", "d", "d", "d"]
    );
    assert!(tl.active_at_frame(FrameIndex(12), fps).is_none());
}

#[test]
fn time_lookup_tolerates_summation_error() {
    let tl = Timeline::build([("a", 0.1), ("b", 0.1), ("c", 0.1), ("d", 0.1)]).unwrap();
    assert_eq!(tl.segments()[2].end, 0.30000000000000004);
    assert_eq!(tl.active_at(0.3).unwrap().text, "d");
    assert_eq!(tl.active_at(0.29).unwrap().text, "c");
}

#[test]
fn frame_spans_sum_to_frame_count() {
    let fps = Fps::new(30000, 1001).unwrap();
    let tl = Timeline::build([("a", 0.7), ("b", 1.3), ("c", 0.2), ("d", 2.9)]).unwrap();
    let total = tl.frame_count(fps);
    let mut last = 0;
    for f in 0..total {
        let idx = tl.active_index_at_frame(FrameIndex(f), fps).unwrap();
        assert!(idx >= last, "frame {f} went back to segment {idx}");
        last = idx;
    }
    assert_eq!(last, 3);
    assert!(tl.active_index_at_frame(FrameIndex(total), fps).is_none());
}
