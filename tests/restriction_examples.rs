use tseq::prelude::*;

fn floats(pairs: &[(f64, Timestamp)]) -> Vec<Instant> {
    pairs.iter().map(|&(v, t)| Instant::new(v, t)).collect()
}

fn ramp() -> Sequence {
    Sequence::make(
        floats(&[(1.0, 0), (3.0, 10)]),
        true,
        true,
        Interpolation::Linear,
        true,
    )
    .expect("valid ramp")
}

#[test]
fn test_step_normalization_drops_held_value() {
    let seq = Sequence::make(
        vec![Instant::new(1, 1), Instant::new(1, 2), Instant::new(2, 3)],
        true,
        true,
        Interpolation::Step,
        true,
    )
    .unwrap();
    assert_eq!(seq.instants(), &[Instant::new(1, 1), Instant::new(2, 3)]);
}

#[test]
fn test_linear_normalization_drops_collinear_midpoint() {
    let seq = Sequence::make(
        floats(&[(1.0, 0), (2.0, 5), (3.0, 10)]),
        true,
        true,
        Interpolation::Linear,
        true,
    )
    .unwrap();
    assert_eq!(seq.instants(), &[Instant::new(1.0, 0), Instant::new(3.0, 10)]);
}

#[test]
fn test_at_value_on_linear_segment() {
    let at = ramp().at_value(&Value::Float(2.0));
    assert_eq!(at.len(), 1);
    assert_eq!(at.sequences()[0].instants(), &[Instant::new(2.0, 5)]);
}

#[test]
fn test_minus_value_on_linear_segment() {
    let minus = ramp().minus_value(&Value::Float(2.0));
    assert_eq!(minus.len(), 2);
    let (left, right) = (&minus.sequences()[0], &minus.sequences()[1]);
    assert_eq!(left.instants(), &[Instant::new(1.0, 0), Instant::new(2.0, 5)]);
    assert!(left.lower_inc() && !left.upper_inc());
    assert_eq!(right.instants(), &[Instant::new(2.0, 5), Instant::new(3.0, 10)]);
    assert!(!right.lower_inc() && right.upper_inc());
}

#[test]
fn test_synchronized_crossing() {
    let down = Sequence::make(
        floats(&[(3.0, 0), (1.0, 10)]),
        true,
        true,
        Interpolation::Linear,
        true,
    )
    .unwrap();
    let (s1, s2) = ramp().synchronize(&down, true).unwrap();
    assert_eq!(s1.instants()[1], Instant::new(2.0, 5));
    assert_eq!(s2.instants()[1], Instant::new(2.0, 5));
}

#[test]
fn test_restriction_pipeline() {
    // Temperature-like series over one hour, sampled every ten minutes
    const MINUTE: Interval = 60_000_000;
    let readings = [18.0, 21.0, 24.0, 22.0, 19.0, 19.0, 23.0];
    let seq = SequenceBuilder::new()
        .extend(
            readings
                .iter()
                .enumerate()
                .map(|(i, &v)| Instant::new(v, i as Timestamp * 10 * MINUTE)),
        )
        .build()
        .unwrap();

    let warm = FloatRange::new(20.0, 30.0, true, true).unwrap();
    let at = seq.at_range(&warm);
    let minus = seq.minus_range(&warm);
    assert_eq!(at.len(), 2);
    assert_eq!(
        at.get_time().duration() + minus.get_time().duration(),
        seq.duration()
    );
    // Piece ends sit on the truncated crossing timestamps
    for piece in at.iter() {
        assert!(piece.always_le(&Value::Float(30.0)));
        assert!(!piece.ever_lt(&Value::Float(20.0 - 1e-6)));
        let start = piece.start_instant();
        assert_eq!(seq.value_at(start.t), Some(start.value.clone()));
    }

    let morning = Period::new(0, 25 * MINUTE, true, false).unwrap();
    let restricted = seq.at_period(&morning);
    assert_eq!(restricted.len(), 1);
    assert_eq!(restricted.sequences()[0].end_timestamp(), 25 * MINUTE);
    assert_eq!(
        seq.value_at(25 * MINUTE),
        Some(restricted.sequences()[0].end_instant().value.clone())
    );

    assert_eq!(seq.at_max().sequences()[0].start_timestamp(), 20 * MINUTE);
    assert!(seq.twavg().unwrap() > 19.0);
}

#[test]
fn test_wire_and_serde_agree() {
    let seq = ramp();
    let decoded = Sequence::decode(&mut seq.encode(), ValueKind::Float, &Config::default()).unwrap();
    assert_eq!(decoded, seq);

    let json = serde_json::to_string(&seq).unwrap();
    let back: Sequence = serde_json::from_str(&json).unwrap();
    assert_eq!(back, seq);
    assert_eq!(back.hash_value(), seq.hash_value());
}

#[test]
fn test_point_sequence_restrictions() {
    let seq = SequenceBuilder::new()
        .push(Instant::new(GeoPoint::new(0.0, 0.0), 0))
        .push(Instant::new(GeoPoint::new(10.0, 0.0), 10))
        .build()
        .unwrap();
    let at = seq.at_value(&Value::from(GeoPoint::new(4.0, 0.0)));
    assert_eq!(at.sequences()[0].start_timestamp(), 4);
    assert!(seq.ever_eq(&Value::from(GeoPoint::new(10.0, 0.0))));
    assert!(!seq.ever_eq(&Value::from(GeoPoint::new(4.0, 1.0))));
    assert_eq!(seq.trajectory().unwrap().length(), 10.0);
}
