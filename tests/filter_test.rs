use std::collections::HashMap;

use nuodbaas_provider::driver::ManagedResource;
use nuodbaas_provider::list::{matches_all, parse_filters, LabelFilter};
use nuodbaas_provider::model::identity::{
    is_valid_name, join_identity, split_identity, validate_component,
};
use nuodbaas_provider::resources::{BackupState, DatabaseState, ProjectState};

fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_label_filter_grammar() {
    assert_eq!(
        "key".parse::<LabelFilter>().unwrap(),
        LabelFilter::Present("key".to_string())
    );
    assert_eq!(
        "!key".parse::<LabelFilter>().unwrap(),
        LabelFilter::Absent("key".to_string())
    );
    assert_eq!(
        "key=value".parse::<LabelFilter>().unwrap(),
        LabelFilter::Equals("key".to_string(), "value".to_string())
    );
    assert_eq!(
        "key!=value".parse::<LabelFilter>().unwrap(),
        LabelFilter::NotEquals("key".to_string(), "value".to_string())
    );
}

#[test]
fn test_label_filter_rejects_bad_keys() {
    assert!("Key".parse::<LabelFilter>().is_err());
    assert!("0key".parse::<LabelFilter>().is_err());
    assert!("".parse::<LabelFilter>().is_err());
    assert!("!".parse::<LabelFilter>().is_err());
    assert!("=value".parse::<LabelFilter>().is_err());
}

#[test]
fn test_label_filter_round_trips_through_display() {
    for raw in ["key", "!key", "key=value", "key!=value", "key="] {
        let filter: LabelFilter = raw.parse().unwrap();
        assert_eq!(filter.to_string(), raw);
    }
}

#[test]
fn test_label_filters_are_conjunctive() {
    let resource = labels(&[("a", "1"), ("b", "2")]);

    let filters = parse_filters(&["a".to_string(), "b=2".to_string()]).unwrap();
    assert!(matches_all(&filters, &resource));

    let filters = parse_filters(&["!a".to_string()]).unwrap();
    assert!(!matches_all(&filters, &resource));

    let filters = parse_filters(&["b=3".to_string()]).unwrap();
    assert!(!matches_all(&filters, &resource));
}

#[test]
fn test_label_filter_scenario_two_databases() {
    let db0 = labels(&[("name", "db0")]);
    let db1 = labels(&[("name", "db1")]);
    let all = [&db0, &db1];

    let count = |raw: &[&str]| {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        let filters = parse_filters(&raw).unwrap();
        all.iter().filter(|l| matches_all(&filters, l)).count()
    };

    assert_eq!(count(&["name=db0"]), 1);
    assert_eq!(count(&["!name"]), 0);
    assert_eq!(count(&["name!=db0", "name"]), 1);
}

#[test]
fn test_name_validation() {
    assert!(is_valid_name("acme"));
    assert!(is_valid_name("db0"));
    assert!(!is_valid_name("Acme"));
    assert!(!is_valid_name("0db"));
    assert!(!is_valid_name("my-db"));
    assert!(!is_valid_name(""));
    assert!(validate_component("organization", "acme").is_ok());
    assert!(validate_component("organization", "").is_err());
}

#[test]
fn test_identity_split_and_join() {
    let parts = split_identity("acme/main/orders", 3).unwrap();
    assert_eq!(parts, vec!["acme", "main", "orders"]);
    assert_eq!(join_identity(&["acme", "main", "orders"]), "acme/main/orders");

    assert!(split_identity("acme/main", 3).is_err());
    assert!(split_identity("acme//orders", 3).is_err());
    assert!(split_identity("acme/main/orders/extra", 3).is_err());
}

#[test]
fn test_set_id_round_trips() {
    let mut project = ProjectState::default();
    project.set_id("acme/main").unwrap();
    assert_eq!(project.id(), "acme/main");

    let mut database = DatabaseState::default();
    database.set_id("acme/main/orders").unwrap();
    assert_eq!(database.id(), "acme/main/orders");
    assert_eq!(database.organization, "acme");
    assert_eq!(database.project, "main");
    assert_eq!(database.name, "orders");

    let mut backup = BackupState::default();
    backup.set_id("acme/main/orders/nightly").unwrap();
    assert_eq!(backup.id(), "acme/main/orders/nightly");
}

#[test]
fn test_set_id_zeroes_other_fields() {
    let mut database = DatabaseState {
        dba_password: Some("secret".to_string()),
        tier: Some("n0.nano".to_string()),
        ..DatabaseState::default()
    };
    database.set_id("acme/main/orders").unwrap();
    assert_eq!(database.dba_password, None);
    assert_eq!(database.tier, None);
}

#[test]
fn test_set_id_rejects_wrong_arity() {
    let mut database = DatabaseState::default();
    assert!(database.set_id("acme/main").is_err());
    assert!(database.set_id("acme/main/orders/extra").is_err());
    assert!(database.set_id("").is_err());
}
