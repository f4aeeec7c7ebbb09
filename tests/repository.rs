use pretty_assertions::assert_eq;
use realty::setup::{self, fixture_count};
use realty::{EntityKind, Error, Fields, SqliteStore, Value};
use rstest::{fixture, rstest};

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[fixture]
fn seeded() -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().unwrap();
    setup::seed(&mut store).unwrap();
    store
}

#[rstest]
#[case(EntityKind::Address, 9)]
#[case(EntityKind::Person, 9)]
#[case(EntityKind::Owner, 3)]
#[case(EntityKind::Agent, 3)]
#[case(EntityKind::Client, 3)]
#[case(EntityKind::Location, 9)]
#[case(EntityKind::Property, 9)]
#[case(EntityKind::Contract, 9)]
#[case(EntityKind::Payment, 9)]
fn seeded_listing_returns_every_fixture_row(
    seeded: SqliteStore,
    #[case] kind: EntityKind,
    #[case] expected: usize,
) {
    let listing = seeded.list_with_relations(kind).unwrap();
    assert_eq!(listing.len(), expected);
    assert_eq!(fixture_count(kind), expected);
}

#[rstest]
fn property_listing_carries_location_and_owner_name(seeded: SqliteStore) {
    let listing = seeded.list_with_relations(EntityKind::Property).unwrap();
    let first = &listing.records[0];

    assert_eq!(first.get("latitude"), Some(&Value::Real(40.712776)));
    assert_eq!(first.get("longitude"), Some(&Value::Real(-74.005974)));
    assert_eq!(first.text("owner_first_name"), Some("Alice"));
    assert_eq!(first.text("owner_last_name"), Some("Liddell"));

    // second fixture property belongs to the second owner, Peter Pan
    assert_eq!(listing.records[1].text("owner_first_name"), Some("Peter"));
}

#[rstest]
fn contract_listing_names_agent_and_client(seeded: SqliteStore) {
    let listing = seeded.list_with_relations(EntityKind::Contract).unwrap();
    let first = &listing.records[0];

    assert_eq!(first.text("sign_date"), Some("2022-01-01"));
    assert_eq!(first.text("agent_first_name"), Some("Wendy"));
    assert_eq!(first.text("client_first_name"), Some("Ron"));
    assert_eq!(first.get("price"), Some(&Value::Real(200000.0)));
}

#[test]
fn person_listing_includes_address_columns() {
    let store = SqliteStore::open_in_memory().unwrap();
    let address_id = store
        .create(
            EntityKind::Address,
            &fields(&[
                ("street_number", "12"),
                ("address_line", "Baker St"),
                ("country", "UK"),
                ("postal_code", "NW1"),
            ]),
        )
        .unwrap();
    let person_id = store
        .create(
            EntityKind::Person,
            &fields(&[
                ("first_name", "Sherlock"),
                ("last_name", "Holmes"),
                ("date_of_birth", "1854-01-06"),
                ("address_id", &address_id.to_string()),
            ]),
        )
        .unwrap();

    let listing = store.list_with_relations(EntityKind::Person).unwrap();
    let person = listing.find(person_id).unwrap();
    assert_eq!(person.text("address_line"), Some("Baker St"));
    assert_eq!(person.text("country"), Some("UK"));
    assert_eq!(person.text("postal_code"), Some("NW1"));
    assert!(person.get("email").unwrap().is_null());
}

#[test]
fn owner_for_unknown_person_is_a_constraint_violation() {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = store
        .create(EntityKind::Owner, &fields(&[("person_id", "999")]))
        .unwrap_err();

    assert!(matches!(err, Error::ConstraintViolation(_)), "got {:?}", err);
    assert_eq!(store.count(EntityKind::Owner).unwrap(), 0);
}

#[rstest]
#[case(EntityKind::Person, &[("first_name", "Ada"), ("date_of_birth", "1815-12-10")], "last_name")]
#[case(EntityKind::Location, &[("latitude", "1.5")], "longitude")]
#[case(EntityKind::Payment, &[("amount", "10"), ("date", "  "), ("contract_id", "1")], "date")]
fn blank_or_absent_required_field_is_rejected(
    #[case] kind: EntityKind,
    #[case] pairs: &[(&str, &str)],
    #[case] missing: &str,
) {
    let store = SqliteStore::open_in_memory().unwrap();
    match store.create(kind, &fields(pairs)) {
        Err(Error::MissingField { entity, field }) => {
            assert_eq!(entity, kind);
            assert_eq!(field, missing);
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
    assert_eq!(store.count(kind).unwrap(), 0);
}

#[test]
fn setup_twice_keeps_structure_and_only_latest_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realty.db");

    let first = setup::initialize(&path, true).unwrap();
    let schema = first.schema_snapshot().unwrap();
    first
        .create(
            EntityKind::Location,
            &fields(&[("latitude", "0.0"), ("longitude", "0.0")]),
        )
        .unwrap();
    assert_eq!(first.count(EntityKind::Location).unwrap(), 10);
    drop(first);

    let second = setup::initialize(&path, true).unwrap();
    assert_eq!(second.schema_snapshot().unwrap(), schema);
    for kind in EntityKind::all() {
        assert_eq!(second.count(*kind).unwrap(), fixture_count(*kind), "{}", kind);
    }
}

#[test]
fn store_reopens_existing_file_without_losing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realty.db");

    drop(setup::initialize(&path, true).unwrap());
    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.count(EntityKind::Payment).unwrap(), 9);
}

#[rstest]
fn get_returns_one_denormalized_record(seeded: SqliteStore) {
    let payment = seeded.get(EntityKind::Payment, 3).unwrap().unwrap();
    assert_eq!(payment.text("contract_sign_date"), Some("2022-03-01"));
    assert!(seeded.get(EntityKind::Payment, 42).unwrap().is_none());
}

#[test]
fn setup_rebuilds_a_database_with_an_older_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realty.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE property (id INTEGER PRIMARY KEY, location TEXT, price REAL);
             INSERT INTO property (location, price) VALUES ('downtown', 1.0);
             CREATE TABLE owner (id INTEGER PRIMARY KEY, name TEXT);",
        )
        .unwrap();
    }

    let store = setup::initialize(&path, true).unwrap();
    assert_eq!(store.count(EntityKind::Property).unwrap(), 9);

    let schema = store.schema_snapshot().unwrap();
    let (_, property_sql) = schema.iter().find(|(name, _)| name == "property").unwrap();
    assert!(property_sql.contains("location_id"));

    let listing = store.list_with_relations(EntityKind::Property).unwrap();
    assert_eq!(listing.records[0].text("owner_first_name"), Some("Alice"));
}

#[test]
fn setup_replaces_a_file_that_is_not_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("realty.db");
    std::fs::write(&path, "address_id,street_number\n1,101\n".repeat(64)).unwrap();

    let store = setup::initialize(&path, false).unwrap();
    assert_eq!(store.stats().unwrap().total(), 0);
    store
        .create(EntityKind::Location, &fields(&[("latitude", "1"), ("longitude", "2")]))
        .unwrap();
    assert_eq!(store.count(EntityKind::Location).unwrap(), 1);
}

#[test]
fn unreachable_database_is_a_connection_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("realty.db");

    match SqliteStore::open(&path) {
        Err(Error::ConnectionFailure(_)) => {}
        Err(other) => panic!("expected ConnectionFailure, got {:?}", other),
        Ok(_) => panic!("opened a database in a missing directory"),
    }
}
