//! Single-row scans across the bundled and scripted row sources.


use rowbind::{
    build_map, build_named_fields, get_fields_from, match_columns, post_scan, quick_scan, scan,
    scan_with_fields, scan_with_map, wrap_basic, Error, IterableScannable, MatchStrategy,
    MemoryRows, ScanConfig, ScanInto, ScanMap, Value, ValueRow,
};
use test_data_gen::{
    BrokenOverride, Normalized, Ordered, Pairs, Person, ScriptedRows, Twins, Typed,
};

#[test]
fn test_scan_discards_unknown_columns() {
    let mut rows = ScriptedRows::new(&["age", "extra", "name"], &[&["30", "x", "Bob"]]);
    assert!(rows.advance());

    let mut person = Person::default();
    scan(&mut rows, &mut [&mut person]).expect("scan person");

    assert_eq!(person.age, "30");
    assert_eq!(person.name, "Bob");
    assert_eq!(rows.scans, vec![vec!["field", "discard", "field"]]);
}

#[test]
fn test_empty_target_list_is_arity_error() {
    let mut rows = ScriptedRows::new(&["a"], &[&["1"]]);
    rows.fail_columns = true;
    let err = scan(&mut rows, &mut []).unwrap_err();
    assert!(matches!(err, Error::Arity(_)));
    assert_eq!(rows.column_calls, 0, "arity is checked before the source");

    let err = quick_scan(&mut rows, &mut []).unwrap_err();
    assert!(matches!(err, Error::Arity(_)));
    assert!(rows.scans.is_empty());
}

#[test]
fn test_structural_errors_fail_fast() {
    let mut rows = ScriptedRows::new(&["a"], &[&["1"]]);

    let mut scalar = 5i64;
    let err = scan(&mut rows, &mut [&mut scalar]).unwrap_err();
    assert!(matches!(err, Error::Structural(_)));

    let mut missing: Option<Person> = None;
    let err = scan(&mut rows, &mut [&mut missing]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "structural error: incompatible object type: nil"
    );

    assert_eq!(rows.column_calls, 0);
    assert!(rows.scans.is_empty());
}

#[test]
fn test_indirect_targets_resolve() {
    let mut rows = ScriptedRows::new(&["name", "age"], &[&["Ann", "7"]]);
    let mut boxed: Box<Person> = Box::default();
    let mut present: Option<Person> = Some(Person::default());
    scan(&mut rows, &mut [&mut boxed]).unwrap();
    assert_eq!(boxed.name, "Ann");

    rows.scans.clear();
    scan(&mut rows, &mut [&mut present]).unwrap();
    assert_eq!(present.map(|p| p.age), Some("7".to_string()));
}

#[test]
fn test_verbatim_mode_uses_field_list_directly() {
    let mut rows = ScriptedRows::without_columns(&[&["Bob", "30"]]);
    let mut person = Person::default();
    scan(&mut rows, &mut [&mut person]).unwrap();

    assert_eq!(rows.scans, vec![vec!["field", "field"]]);
    assert_eq!(person.name, "Bob");
    assert_eq!(person.age, "30");
}

#[test]
fn test_unknown_columns_never_touch_fields() {
    let mut rows = ScriptedRows::new(&["junk", "name", "junk2"], &[&["j", "Zed", "k"]]);
    let mut person = Person {
        name: String::new(),
        age: "unchanged".into(),
    };
    scan(&mut rows, &mut [&mut person]).unwrap();
    assert_eq!(person.name, "Zed");
    assert_eq!(person.age, "unchanged");
    assert_eq!(rows.scans[0], vec!["discard", "field", "discard"]);
}

#[test]
fn test_zero_columns_is_empty_scan() {
    let mut rows = ScriptedRows::new(&[], &[&[]]);
    let mut person = Person::default();
    let err = scan(&mut rows, &mut [&mut person]).unwrap_err();
    assert!(matches!(err, Error::EmptyScan));
    assert!(rows.scans.is_empty());
}

#[test]
fn test_duplicate_names_pair_in_order() {
    let mut rows = ScriptedRows::new(&["a", "a"], &[&["one", "two"]]);
    let mut twins = Twins::default();
    scan(&mut rows, &mut [&mut twins]).unwrap();
    assert_eq!(twins.first, "one");
    assert_eq!(twins.second, "two");

    let mut rows = ScriptedRows::new(&["a"], &[&["only"]]);
    let mut twins = Twins::default();
    scan(&mut rows, &mut [&mut twins]).unwrap();
    assert_eq!(twins.first, "only");
    assert_eq!(twins.second, "");
}

#[test]
fn test_embedded_fields_come_first() {
    let mut ordered = Ordered::default();
    let fields = get_fields_from(&mut ordered).unwrap();
    assert_eq!(fields.names(), &["f0", "f1", "f2"]);
    drop(fields);

    let mut rows = ScriptedRows::new(&["f2", "f0", "f1"], &[&["c", "a", "b"]]);
    scan(&mut rows, &mut [&mut ordered]).unwrap();
    assert_eq!(ordered.audit.f0, "a");
    assert_eq!(ordered.f1, "b");
    assert_eq!(ordered.f2, "c");
}

#[test]
fn test_multiple_targets_share_one_row() {
    let mut rows = ScriptedRows::new(
        &["testing2", "name", "f0", "testing1"],
        &[&["r", "Bob", "zero", "l"]],
    );
    let mut person = Person::default();
    let mut pairs = Pairs::default();
    let mut ordered = Ordered::default();
    scan(&mut rows, &mut [&mut person, &mut pairs, &mut ordered]).unwrap();

    assert_eq!(person.name, "Bob");
    assert_eq!(pairs.left, "l");
    assert_eq!(pairs.right, "r");
    assert_eq!(ordered.audit.f0, "zero");
}

#[test]
fn test_override_failure_is_reported() {
    let mut rows = ScriptedRows::new(&["a"], &[&["1"]]);
    let mut broken = BrokenOverride;
    let err = scan(&mut rows, &mut [&mut broken]).unwrap_err();
    assert!(matches!(err, Error::Override(_)));
    assert_eq!(err.to_string(), "error when listing fields: listing failed");
}

#[test]
fn test_column_enumeration_failure_is_wrapped() {
    let mut rows = ScriptedRows::new(&["name"], &[&["Bob"]]);
    rows.fail_columns = true;
    let mut person = Person::default();
    let err = scan(&mut rows, &mut [&mut person]).unwrap_err();
    assert!(matches!(err, Error::Columns(_)));
    assert!(err.to_string().contains("connection closed"));
    assert!(rows.scans.is_empty());
}

#[test]
fn test_transfer_error_is_unchanged() {
    let mut rows = ScriptedRows::new(&["name", "age"], &[&["Bob", "30"]]);
    rows.fail_scan_at = Some(0);
    let mut person = Person::default();
    let err = scan(&mut rows, &mut [&mut person]).unwrap_err();
    assert!(matches!(err, Error::Transfer(_)));
    assert_eq!(err.to_string(), "transfer failed on row 0");
}

#[test]
fn test_post_scan_hooks() {
    let mut rows = ScriptedRows::new(&["name"], &[&["bob"]]);
    let mut normalized = Normalized::default();
    scan(&mut rows, &mut [&mut normalized]).unwrap();
    assert_eq!(normalized.name, "BOB");

    let mut rows = ScriptedRows::new(&["name"], &[&[""]]);
    let mut normalized = Normalized::default();
    let err = scan(&mut rows, &mut [&mut normalized]).unwrap_err();
    assert!(matches!(err, Error::PostScan(_)));
    assert_eq!(err.to_string(), "name must not be empty");

    // Hooks run in order and stop at the first failure.
    let mut ok = Normalized { name: "x".into() };
    let mut bad = Normalized::default();
    let mut later = Normalized { name: "y".into() };
    let err = post_scan(&mut [&mut ok, &mut bad, &mut later]).unwrap_err();
    assert!(matches!(err, Error::PostScan(_)));
    assert_eq!(ok.name, "X");
    assert_eq!(later.name, "y");
}

#[test]
fn test_scan_with_fields_runs_no_hooks() {
    let mut rows = ScriptedRows::new(&["name"], &[&["bob"]]);
    let mut normalized = Normalized::default();
    let fields = get_fields_from(&mut normalized).unwrap();
    scan_with_fields(&mut rows, fields).unwrap();
    assert_eq!(normalized.name, "bob");
}

#[test]
fn test_scan_with_prebuilt_map() {
    let config = ScanConfig::default();
    let map = match_columns(&["age", "name"], &["name", "age"], &config);
    assert_eq!(map, ScanMap::from(vec![Some(1), Some(0)]));

    let mut rows = MemoryRows::new(
        ["age", "name"],
        vec![
            vec!["30".into(), "Bob".into()],
            vec!["41".into(), "Ann".into()],
        ],
    );
    let mut seen = Vec::new();
    while rows.advance() {
        let mut person = Person::default();
        scan_with_map(&mut rows, Some(&map), &mut [&mut person]).unwrap();
        seen.push(person);
    }
    assert_eq!(seen[1].name, "Ann");
    assert_eq!(seen[1].age, "41");
}

#[test]
fn test_build_map_over_target_list() {
    let mut rows = ScriptedRows::new(&["testing1", "name", "zzz"], &[]);
    let mut person = Person::default();
    let mut pairs = Pairs::default();
    let mut targets: [&mut dyn ScanInto; 2] = [&mut person, &mut pairs];
    let fields = build_named_fields(&mut targets).unwrap();
    assert_eq!(fields.names(), &["name", "age", "testing1", "testing2"]);

    let map = build_map(&mut rows, &fields).unwrap().expect("columns are known");
    assert_eq!(map.as_slice(), &[Some(2), Some(0), None]);

    rows.columns = None;
    assert!(build_map(&mut rows, &fields).unwrap().is_none());
}

#[test]
fn test_typed_fields_from_memory_rows() {
    let mut rows = MemoryRows::new(
        ["raw", "nick", "active", "score", "id"],
        vec![vec![
            Value::Bin(vec![1, 2]),
            Value::Null,
            Value::Bool(true),
            Value::F64(2.5),
            Value::I64(9),
        ]],
    );
    rows.advance();
    let mut typed = Typed {
        nick: Some("old".into()),
        ..Default::default()
    };
    scan(&mut rows, &mut [&mut typed]).unwrap();
    assert_eq!(typed.id, 9);
    assert_eq!(typed.score, 2.5);
    assert!(typed.active);
    assert_eq!(typed.nick, None);
    assert_eq!(typed.raw, Value::Bin(vec![1, 2]));
}

#[test]
fn test_type_mismatch_is_the_sources_error() {
    let mut rows = MemoryRows::new(["id"], vec![vec![Value::from("nine")]]);
    rows.advance();
    let mut typed = Typed::default();
    let err = scan(&mut rows, &mut [&mut typed]).unwrap_err();
    assert!(matches!(err, Error::Transfer(_)));
    assert_eq!(err.to_string(), "cannot parse \"nine\" as i64");
}

#[test]
fn test_quick_scan_single_row() {
    let mut row = ValueRow::new(["Bob", "30"]);
    let mut person = Person::default();
    quick_scan(&mut row, &mut [&mut person]).unwrap();
    assert_eq!(person.name, "Bob");
    assert_eq!(person.age, "30");

    let mut short = ValueRow::new(["Bob"]);
    let err = quick_scan(&mut short, &mut [&mut person]).unwrap_err();
    assert!(matches!(err, Error::Transfer(_)));
}

#[test]
fn test_wrapped_single_row_is_verbatim() {
    let mut wrapped = wrap_basic(ValueRow::new(["Bob", "30"]));
    let mut person = Person::default();
    assert!(wrapped.advance());
    scan(&mut wrapped, &mut [&mut person]).unwrap();
    assert_eq!(person.name, "Bob");
    assert!(!wrapped.advance());
}

#[test]
fn test_strategies_agree_end_to_end() {
    let columns: Vec<String> = (0..40).rev().map(|i| format!("c{}", i % 13)).collect();
    let names: Vec<String> = (0..30).map(|i| format!("c{}", i % 11)).collect();
    let nested = match_columns(
        &columns,
        &names,
        &ScanConfig::default().with_strategy(MatchStrategy::Nested),
    );
    let hashed = match_columns(
        &columns,
        &names,
        &ScanConfig::default().with_strategy(MatchStrategy::Hashed),
    );
    assert_eq!(nested, hashed);
    assert_eq!(nested.len(), columns.len());
}
