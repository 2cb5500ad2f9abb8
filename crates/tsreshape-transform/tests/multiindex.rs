//! Tests for long ⇄ multiindex conversion.

use polars::prelude::*;
use tsreshape_transform::{
    FEATURE_LEVEL, Label, LabeledFrame, LongFrame, ReshapeError, ReshapeOptions,
    long_to_multiindex, multiindex_to_long,
};

fn sensor_table() -> LongFrame {
    let data = DataFrame::new(vec![
        Series::new("group_id".into(), vec!["B", "B", "A", "A"]).into(),
        Series::new("time_id".into(), vec![1i64, 0, 1, 0]).into(),
        Series::new("load".into(), vec![1.0, 2.0, 3.0, 4.0]).into(),
        Series::new("temp".into(), vec![10i64, 20, 30, 40]).into(),
    ])
    .unwrap();
    LongFrame::new(data)
}

fn row(group: &str, channel: &str) -> Vec<Label> {
    vec![Label::from(group), Label::from(channel)]
}

#[test]
fn test_long_to_multiindex_shape_and_order() {
    let multi = long_to_multiindex(&sensor_table(), &ReshapeOptions::default()).unwrap();

    assert_eq!(multi.height(), 2 * 2);
    assert_eq!(multi.width(), 2);

    // groups and time ids keep first-appearance order
    let keys: Vec<Vec<Label>> = (0..multi.height())
        .map(|r| multi.row_key(r).unwrap())
        .collect();
    assert_eq!(
        keys,
        vec![
            row("B", "load"),
            row("B", "temp"),
            row("A", "load"),
            row("A", "temp"),
        ]
    );
    assert_eq!(multi.column_key(0).unwrap(), vec![Label::Int(1)]);
    assert_eq!(multi.column_key(1).unwrap(), vec![Label::Int(0)]);

    assert_eq!(multi.row_levels()[1].name().as_str(), FEATURE_LEVEL);
    assert_eq!(multi.column_levels()[0].name().as_str(), "time_id");
}

#[test]
fn test_long_to_multiindex_values_are_float() {
    let multi = long_to_multiindex(&sensor_table(), &ReshapeOptions::default()).unwrap();

    let a_temp = multi.find_row(&row("A", "temp")).unwrap();
    let t0 = multi.find_column(&[Label::Int(0)]).unwrap();
    assert_eq!(multi.get(a_temp, t0).unwrap(), AnyValue::Float64(40.0));

    let b_load = multi.find_row(&row("B", "load")).unwrap();
    let t1 = multi.find_column(&[Label::Int(1)]).unwrap();
    assert_eq!(multi.get(b_load, t1).unwrap(), AnyValue::Float64(1.0));

    assert!(multi.values().iter().all(|s| s.dtype() == &DataType::Float64));
}

#[test]
fn test_long_to_multiindex_leaves_gaps_null() {
    let data = DataFrame::new(vec![
        Series::new("group_id".into(), vec!["A", "A", "B"]).into(),
        Series::new("time_id".into(), vec![0i64, 1, 0]).into(),
        Series::new("x".into(), vec![1.0, 2.0, 3.0]).into(),
    ])
    .unwrap();
    let multi = long_to_multiindex(&LongFrame::new(data), &ReshapeOptions::default()).unwrap();

    let b_x = multi.find_row(&row("B", "x")).unwrap();
    let t1 = multi.find_column(&[Label::Int(1)]).unwrap();
    assert_eq!(multi.get(b_x, t1).unwrap(), AnyValue::Null);
}

#[test]
fn test_long_to_multiindex_keeps_integer_channels() {
    let data = DataFrame::new(vec![
        Series::new("group_id".into(), vec!["A", "A", "B"]).into(),
        Series::new("time_id".into(), vec![0i64, 1, 0]).into(),
        Series::new("count".into(), vec![1i64, 2, 3]).into(),
        Series::new("errors".into(), vec![0i32, 0, 1]).into(),
    ])
    .unwrap();
    let options = ReshapeOptions::default();
    let multi = long_to_multiindex(&LongFrame::new(data), &options).unwrap();

    assert!(multi.values().iter().all(|s| s.dtype() == &DataType::Int64));
    let b_errors = multi.find_row(&row("B", "errors")).unwrap();
    let t0 = multi.find_column(&[Label::Int(0)]).unwrap();
    assert_eq!(multi.get(b_errors, t0).unwrap(), AnyValue::Int64(1));

    let long = multiindex_to_long(&multi, &options).unwrap();
    assert_eq!(long.column("count").unwrap().dtype(), &DataType::Int64);
    assert_eq!(long.column("errors").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_long_to_multiindex_rejects_text_mixed_with_numbers() {
    let data = DataFrame::new(vec![
        Series::new("group_id".into(), vec!["A"]).into(),
        Series::new("time_id".into(), vec![0i64]).into(),
        Series::new("load".into(), vec![1.5]).into(),
        Series::new("note".into(), vec!["calibrated"]).into(),
    ])
    .unwrap();
    let err = long_to_multiindex(&LongFrame::new(data), &ReshapeOptions::default()).unwrap_err();
    assert!(matches!(err, ReshapeError::Polars { .. }));
}

#[test]
fn test_long_to_multiindex_requires_time_key() {
    let data = DataFrame::new(vec![
        Series::new("group_id".into(), vec!["A"]).into(),
        Series::new("x".into(), vec![1.0]).into(),
    ])
    .unwrap();
    let err = long_to_multiindex(&LongFrame::new(data), &ReshapeOptions::default()).unwrap_err();
    assert!(matches!(err, ReshapeError::MissingTimeKey { .. }));
}

#[test]
fn test_multiindex_to_long_round_trips() {
    let data = DataFrame::new(vec![
        Series::new("group_id".into(), vec!["B", "B", "A", "A"]).into(),
        Series::new("time_id".into(), vec![0i64, 1, 0, 1]).into(),
        Series::new("load".into(), vec![1.0, 2.0, 3.0, 4.0]).into(),
        Series::new("temp".into(), vec![5.0, 6.0, 7.0, 8.0]).into(),
    ])
    .unwrap();
    let options = ReshapeOptions::default();
    let multi = long_to_multiindex(&LongFrame::new(data.clone()), &options).unwrap();
    let long = multiindex_to_long(&multi, &options).unwrap();

    assert_eq!(long.get_column_names(), data.get_column_names());
    assert!(long.equals_missing(&data));
}

#[test]
fn test_multiindex_to_long_unions_channels() {
    let frame = LabeledFrame::new(
        vec![
            Series::new("site".into(), vec!["S1", "S2"]),
            Series::new(FEATURE_LEVEL.into(), vec!["load", "temp"]),
        ],
        vec![Series::new("slot".into(), vec![0i64, 1])],
        vec![
            Series::new("0".into(), vec![1.0, 3.0]),
            Series::new("1".into(), vec![2.0, 4.0]),
        ],
    )
    .unwrap();
    let options = ReshapeOptions::new()
        .with_group_id("site")
        .with_time_id("slot");
    let long = multiindex_to_long(&frame, &options).unwrap();

    assert_eq!(
        long.get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>(),
        vec!["site", "slot", "load", "temp"]
    );
    assert_eq!(long.height(), 4);

    let load = long.column("load").unwrap().f64().unwrap();
    let temp = long.column("temp").unwrap().f64().unwrap();
    assert_eq!(load.get(0), Some(1.0));
    assert_eq!(load.get(1), Some(2.0));
    assert_eq!(load.get(2), None);
    assert_eq!(temp.get(0), None);
    assert_eq!(temp.get(3), Some(4.0));
}

#[test]
fn test_multiindex_to_long_rejects_duplicate_rows() {
    let frame = LabeledFrame::new(
        vec![
            Series::new("group_id".into(), vec!["A", "A"]),
            Series::new(FEATURE_LEVEL.into(), vec!["x", "x"]),
        ],
        vec![Series::new("time_id".into(), vec![0i64])],
        vec![Series::new("0".into(), vec![1.0, 2.0])],
    )
    .unwrap();
    let err = multiindex_to_long(&frame, &ReshapeOptions::default()).unwrap_err();
    assert!(matches!(err, ReshapeError::Shape { .. }));
}

#[test]
fn test_multiindex_to_long_rejects_wide_shape() {
    let frame = LabeledFrame::new(
        vec![Series::new("group_id".into(), vec!["A"])],
        vec![
            Series::new(FEATURE_LEVEL.into(), vec!["x"]),
            Series::new("time_id".into(), vec![0i64]),
        ],
        vec![Series::new("x".into(), vec![1.0])],
    )
    .unwrap();
    let err = multiindex_to_long(&frame, &ReshapeOptions::default()).unwrap_err();
    assert!(matches!(err, ReshapeError::Shape { .. }));
}

#[test]
fn test_long_to_multiindex_leaves_input_untouched() {
    let table = sensor_table();
    let before = table.data().clone();

    long_to_multiindex(&table, &ReshapeOptions::default()).unwrap();

    assert!(table.data().equals_missing(&before));
}
