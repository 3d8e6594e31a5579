use std::sync::Arc;
use std::thread;

use morph_api::{Convert, ConvertExt, ErrorKind, TypeDescriptor, Value};
use morph_engine::{Adapter, Catalog, CatalogConfig, MorphConfig, Rule, RuleTable, StandardConverter, TypeHierarchy};

fn split_join(adapter: &Adapter) -> Adapter {
    adapter
        .rule_fn(
            |s: &String| s.split(',').map(String::from).collect::<Vec<_>>(),
            |v: &Vec<String>| v.join(","),
        )
        .unwrap()
}

/// Catalog with every policy except single-element containers, so
/// `Vec<String> → String` has no standard entry.
fn without_containers() -> StandardConverter {
    StandardConverter::from_config(&MorphConfig {
        catalog: CatalogConfig {
            containers: false,
            ..CatalogConfig::default()
        },
    })
}

#[test]
fn split_and_join_strings() {
    let converter = without_containers();
    let adapter = split_join(&converter.adapt());

    let parts: Vec<String> = adapter.convert("a,b,c".to_string()).unwrap();
    assert_eq!(parts, vec!["a", "b", "c"]);

    let joined: String = adapter.convert(vec!["a".to_string(), "b".into(), "c".into()]).unwrap();
    assert_eq!(joined, "a,b,c");

    let err = converter
        .convert::<String>(vec!["a".to_string(), "b".into(), "c".into()])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoApplicableConversion);
    assert_eq!(err.to_string(), "no applicable conversion from Vec<String> to String");
}

#[test]
fn child_rule_overrides_parent_rule() {
    let root = StandardConverter::new();
    let a = root.adapt().rule_fn(|n: &i32| format!("A{n}"), |s: &String| s.len() as i32).unwrap();
    let b = a.adapt().rule_fn(|n: &i32| format!("B{n}"), |s: &String| -(s.len() as i32)).unwrap();

    assert_eq!(b.convert::<String>(5_i32).unwrap(), "B5");
    assert_eq!(a.convert::<String>(5_i32).unwrap(), "A5");
    assert_eq!(root.convert::<String>(5_i32).unwrap(), "5");
}

#[test]
fn later_registration_wins_on_same_adapter() {
    let adapter = StandardConverter::new()
        .adapt()
        .rule_fn(|n: &u8| format!("first {n}"), |_: &String| 0_u8)
        .unwrap()
        .rule_fn(|n: &u8| format!("second {n}"), |_: &String| 1_u8)
        .unwrap();

    assert_eq!(adapter.convert::<String>(3_u8).unwrap(), "second 3");
    assert_eq!(adapter.rules().len(), 2);
}

#[test]
fn unresolved_requests_walk_up_the_chain() {
    let root = StandardConverter::new();
    let a = root.adapt().rule_fn(|b: &bool| u8::from(*b), |n: &u8| *n != 0).unwrap();
    let b = a.adapt().rule_fn(|c: &char| c.to_string(), |s: &String| s.chars().next().unwrap_or(' ')).unwrap();
    let c = b.adapt();

    // Own table is empty → b's rule.
    assert_eq!(c.convert::<String>('x').unwrap(), "x");
    // Backward direction of a's rule, two levels up.
    assert!(c.convert::<bool>(1_u8).unwrap());
    // Root catalog.
    assert_eq!(c.convert::<u64>(7_u16).unwrap(), 7);
    // Nothing anywhere.
    let err = c.convert::<char>(true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoApplicableConversion);
}

#[test]
fn siblings_do_not_see_each_other() {
    let root = StandardConverter::new().adapt();
    let left = root.rule_fn(|n: &i16| format!("L{n}"), |_: &String| 0_i16).unwrap();
    let right = root.rule_fn(|n: &i16| format!("R{n}"), |_: &String| 0_i16).unwrap();

    assert_eq!(left.convert::<String>(1_i16).unwrap(), "L1");
    assert_eq!(right.convert::<String>(1_i16).unwrap(), "R1");
    assert_eq!(root.convert::<String>(1_i16).unwrap(), "1");
}

#[test]
fn repeated_calls_are_deterministic() {
    let adapter = split_join(&without_containers().adapt());
    let first: Vec<String> = adapter.convert("x,y".to_string()).unwrap();
    for _ in 0..10 {
        let again: Vec<String> = adapter.convert("x,y".to_string()).unwrap();
        assert_eq!(again, first);
        assert_eq!(
            adapter.convert::<u8>(vec![1_u8]).unwrap_err().kind(),
            ErrorKind::NoApplicableConversion
        );
    }
}

#[test]
fn shared_across_threads() {
    let adapter = Arc::new(split_join(&StandardConverter::new().adapt()));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adapter = Arc::clone(&adapter);
            thread::spawn(move || {
                let input = format!("{i},{i}");
                let parts: Vec<String> = adapter.convert(input.clone()).unwrap();
                let back: String = adapter.convert(parts).unwrap();
                assert_eq!(back, input);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Celsius(f64);

#[derive(Clone, Debug, PartialEq)]
struct Fahrenheit(f64);

#[derive(Clone, Debug, PartialEq)]
struct Reading(Celsius);

#[test]
fn hierarchy_flows_into_adapters() {
    let converter = StandardConverter::builder()
        .hierarchy(TypeHierarchy::new().with(|r: &Reading| r.0.clone()))
        .build();
    let adapter = converter
        .adapt()
        .rule_fn(
            |c: &Celsius| Fahrenheit(c.0 * 9.0 / 5.0 + 32.0),
            |f: &Fahrenheit| Celsius((f.0 - 32.0) * 5.0 / 9.0),
        )
        .unwrap();

    // Reading is assignable to Celsius, so the Celsius rule applies.
    assert_eq!(adapter.convert::<Fahrenheit>(Reading(Celsius(100.0))).unwrap(), Fahrenheit(212.0));
    assert_eq!(adapter.convert::<Celsius>(Fahrenheit(32.0)).unwrap(), Celsius(0.0));
    // Root converter upcasts directly.
    assert_eq!(adapter.convert::<Celsius>(Reading(Celsius(1.0))).unwrap(), Celsius(1.0));
}

#[test]
fn wrapped_catalog_as_parent() {
    let mut catalog = Catalog::empty();
    catalog.insert_total(|n: &u8| u16::from(*n));
    let adapter = Adapter::wrap(Arc::new(catalog))
        .rule_fn(|n: &u16| n.to_string(), |s: &String| s.len() as u16)
        .unwrap();

    assert_eq!(adapter.convert::<u16>(200_u8).unwrap(), 200);
    assert_eq!(adapter.convert::<String>(7_u16).unwrap(), "7");
    assert_eq!(adapter.convert::<u16>("abc".to_string()).unwrap(), 3);
}

#[test]
fn converting_with_default() {
    let adapter = split_join(&without_containers().adapt());

    let parts: Vec<String> = adapter
        .converting(None::<String>)
        .default_value("d1,d2".to_string())
        .to()
        .unwrap();
    assert_eq!(parts, vec!["d1", "d2"]);

    let value = adapter
        .converting(Some("only".to_string()))
        .default_value("ignored".to_string())
        .to_value(&TypeDescriptor::of::<Vec<String>>())
        .unwrap();
    assert_eq!(value.downcast_ref::<Vec<String>>().unwrap(), &vec!["only".to_string()]);

    let err = adapter.converting(None::<String>).to::<Vec<String>>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingValue);
}

#[test]
fn dyn_convert_entry_point() {
    let adapter: Arc<dyn Convert> = Arc::new(split_join(&StandardConverter::new().adapt()));
    let out = adapter
        .convert_value(&Value::new("p,q".to_string()), &TypeDescriptor::of::<Vec<String>>())
        .unwrap();
    assert!(out.is::<Vec<String>>());
}

#[test]
fn tables_can_be_built_by_hand() {
    let rule = Rule::new(|n: &u8| n.to_string(), |s: &String| s.len() as u8).unwrap();
    let table = RuleTable::new().push(rule.into());
    let found = table
        .lookup(&TypeDescriptor::of::<String>(), &TypeDescriptor::of::<u8>())
        .unwrap();
    assert_eq!(found.rule().from_type(), TypeDescriptor::of::<u8>());
}
