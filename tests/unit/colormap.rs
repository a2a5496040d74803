use super::*;

fn close(a: Rgb, b: Rgb) -> bool {
    (a.r - b.r).abs() < 1e-9 && (a.g - b.g).abs() < 1e-9 && (a.b - b.b).abs() < 1e-9
}

#[test]
fn first_threshold_above_x_selects_the_segment() {
    let map = Colormap::new(
        vec![Breakpoint::new(0.5, 2.0, 0.0), Breakpoint::flat(1.0, 0.25)],
        vec![Breakpoint::flat(1.0, 0.5)],
        vec![Breakpoint::new(1.0, -1.0, 1.0)],
    )
    .unwrap();

    assert!(close(map.eval(0.2), Rgb::new(0.4, 0.5, 0.8)));
    // 0.5 is not below the first threshold, so the second segment applies.
    assert!(close(map.eval(0.5), Rgb::new(0.25, 0.5, 0.5)));
    // Past every threshold: last segment.
    assert!(close(map.eval(1.0), Rgb::new(0.25, 0.5, 0.0)));
}

#[test]
fn segment_output_is_clamped() {
    let map = Colormap::new(
        vec![Breakpoint::new(1.0, 4.0, -1.0)],
        vec![Breakpoint::flat(1.0, 2.0)],
        vec![Breakpoint::flat(1.0, -3.0)],
    )
    .unwrap();
    assert_eq!(map.eval(0.1), Rgb::new(0.0, 1.0, 0.0));
    assert_eq!(map.eval(0.9), Rgb::new(1.0, 1.0, 0.0));
}

#[test]
fn inputs_outside_unit_range_clamp_to_the_ends() {
    let map = Colormap::hot();
    for x in [-10.0, -0.5, -1e-9] {
        assert_eq!(map.eval(x), map.eval(0.0));
    }
    for x in [1.0 + 1e-9, 2.0, 1e6] {
        assert_eq!(map.eval(x), map.eval(1.0));
    }
}

#[test]
fn hot_goes_from_black_to_white() {
    let map = Colormap::hot();
    assert_eq!(map.eval(0.0), Rgb::BLACK);
    assert!(close(map.eval(1.0), Rgb::WHITE));
    let mid = map.eval(0.5);
    assert_eq!(mid.r, 1.0);
    assert!((mid.g - (0.5 - 0.365) / (0.746 - 0.365)).abs() < 1e-12);
    assert_eq!(mid.b, 0.0);
}

#[test]
fn hot_luminance_is_monotone() {
    let map = Colormap::hot();
    let mut prev = map.eval(0.0).luminance();
    for i in 1..=1000 {
        let lum = map.eval(f64::from(i) / 1000.0).luminance();
        assert!(lum + 1e-12 >= prev, "luminance dropped at {i}: {prev} -> {lum}");
        prev = lum;
    }
}

#[test]
fn gradient_interpolates_between_endpoints() {
    let a = Rgb::new(0.2, 0.4, 0.6);
    let b = Rgb::new(1.0, 0.0, 0.6);
    let map = Colormap::gradient(a, b);
    assert!(close(map.eval(0.0), a));
    assert!(close(map.eval(0.25), a.mix(b, 0.25)));
    assert!(close(map.eval(1.0), b));
}

#[test]
fn nan_propagates() {
    let c = Colormap::hot().eval(f64::NAN);
    assert!(c.r.is_nan() && c.g.is_nan() && c.b.is_nan());
}

#[test]
fn construction_rejects_bad_breakpoints() {
    let ok = vec![Breakpoint::flat(1.0, 0.0)];
    assert!(Colormap::new(vec![], ok.clone(), ok.clone()).is_err());
    assert!(
        Colormap::new(
            ok.clone(),
            vec![Breakpoint::flat(0.5, 0.0), Breakpoint::flat(0.5, 1.0)],
            ok.clone()
        )
        .is_err()
    );
    assert!(Colormap::new(ok.clone(), ok.clone(), vec![Breakpoint::flat(f64::NAN, 0.0)]).is_err());
}

#[test]
fn deserialization_validates() {
    let good = r#"{
        "red":   [{"threshold": 1.0, "slope": 1.0, "intercept": 0.0}],
        "green": [{"threshold": 1.0, "slope": 0.0, "intercept": 0.5}],
        "blue":  [{"threshold": 1.0, "slope": 0.0, "intercept": 0.0}]
    }"#;
    let map: Colormap = serde_json::from_str(good).unwrap();
    assert!(close(map.eval(0.3), Rgb::new(0.3, 0.5, 0.0)));

    let bad = r#"{"red": [], "green": [], "blue": []}"#;
    let err = serde_json::from_str::<Colormap>(bad).unwrap_err();
    assert!(err.to_string().contains("at least one breakpoint"));
}
