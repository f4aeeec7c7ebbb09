//! Database setup - destructive (re)initialization and fixture seeding

use std::path::Path;

use rusqlite::Connection;

use crate::entity::EntityKind;
use crate::model::{
    NewAddress, NewAgent, NewClient, NewContract, NewLocation, NewOwner, NewPayment, NewPerson,
    NewProperty, parse_date,
};
use crate::storage::sqlite::{
    insert_address, insert_agent, insert_client, insert_contract, insert_location, insert_owner,
    insert_payment, insert_person, insert_property,
};
use crate::storage::{DbStats, SqliteStore};
use crate::Result;

// Fixture rows. Foreign keys are 0-based indexes into the fixture list of
// the referenced kind and are resolved to the generated ids while seeding.

/// (street_number, address_line, country, postal_code)
const ADDRESSES: &[(i64, &str, &str, &str)] = &[
    (101, "First St", "Wonderland", "12345"),
    (202, "Second St", "Neverland", "23456"),
    (303, "Third St", "Oz", "34567"),
    (404, "Fourth Ave", "Narnia", "45678"),
    (505, "Fifth Ave", "Middle Earth", "56789"),
    (606, "Sixth Blvd", "Atlantis", "67890"),
    (707, "Seventh Lane", "El Dorado", "78901"),
    (808, "Eighth Road", "Shangri-La", "89012"),
    (909, "Ninth Road", "SNew York", "90012"),
];

/// (first_name, last_name, date_of_birth, phone_number, email, address)
const PERSONS: &[(&str, &str, &str, &str, &str, usize)] = &[
    ("Alice", "Liddell", "1985-05-04", "1112223333", "alice@example.com", 0),
    ("Peter", "Pan", "1986-06-04", "2223334444", "peter@example.com", 1),
    ("Dorothy", "Gale", "1987-07-04", "3334445555", "dorothy@example.com", 2),
    ("Wendy", "Darling", "1988-08-04", "4445556666", "wendy@example.com", 3),
    ("Harry", "Potter", "1989-09-04", "5556667777", "harry@example.com", 4),
    ("Hermione", "Granger", "1990-10-04", "6667778888", "hermione@example.com", 5),
    ("Ron", "Weasley", "1991-11-04", "7778889999", "ron@example.com", 6),
    ("Luke", "Skywalker", "1992-12-04", "8889990000", "luke@example.com", 7),
    ("Henry", "Potter", "1999-12-04", "8887990000", "henry@example.com", 8),
];

/// (person, resident_status, acquisition_date)
const OWNERS: &[(usize, &str, &str)] = &[
    (0, "Permanent", "2001-01-01"),
    (1, "Temporary", "2002-02-02"),
    (2, "Permanent", "2003-03-03"),
];

/// (person, employment_date)
const AGENTS: &[(usize, &str)] = &[(3, "2010-01-01"), (4, "2011-02-01"), (5, "2012-01-01")];

/// (person, purchase_date)
const CLIENTS: &[(usize, &str)] = &[(6, "2020-01-01"), (7, "2021-02-01"), (8, "2022-01-01")];

/// (latitude, longitude)
const LOCATIONS: &[(f64, f64)] = &[
    (40.712776, -74.005974),
    (34.052235, -118.243683),
    (51.507351, -0.127758),
    (35.689487, 139.691706),
    (48.856614, 2.352222),
    (55.755826, 37.617300),
    (-33.868820, 151.209296),
    (-23.550520, -46.633309),
    (52.520007, 13.404954),
];

/// (number_of_rooms, building_year, area_size, price, location, owner)
const PROPERTIES: &[(i64, i64, f64, f64, usize, usize)] = &[
    (3, 1990, 100.0, 200000.0, 0, 0),
    (4, 1980, 150.0, 250000.0, 1, 1),
    (5, 2000, 200.0, 300000.0, 2, 2),
    (2, 2010, 120.0, 180000.0, 3, 0),
    (6, 1975, 250.0, 400000.0, 4, 1),
    (1, 2020, 80.0, 150000.0, 5, 2),
    (3, 1950, 90.0, 220000.0, 6, 0),
    (4, 1995, 180.0, 350000.0, 7, 1),
    (5, 1985, 160.0, 275000.0, 8, 2),
];

/// (sign_date, agent, client, property)
const CONTRACTS: &[(&str, usize, usize, usize)] = &[
    ("2022-01-01", 0, 0, 0),
    ("2022-02-01", 1, 1, 1),
    ("2022-03-01", 2, 2, 2),
    ("2022-04-01", 0, 0, 3),
    ("2022-05-01", 1, 1, 4),
    ("2022-06-01", 2, 2, 5),
    ("2022-07-01", 0, 0, 6),
    ("2022-08-01", 1, 1, 7),
    ("2022-09-01", 2, 2, 8),
];

/// (amount, date, contract)
const PAYMENTS: &[(f64, &str, usize)] = &[
    (100000.0, "2022-01-05", 0),
    (150000.0, "2022-02-05", 1),
    (200000.0, "2022-03-05", 2),
    (175000.0, "2022-04-06", 3),
    (225000.0, "2022-05-07", 4),
    (120000.0, "2022-06-08", 5),
    (160000.0, "2022-07-09", 6),
    (210000.0, "2022-08-10", 7),
    (190000.0, "2022-09-11", 8),
];

/// Number of fixture rows `seed` inserts for a kind
pub fn fixture_count(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Address => ADDRESSES.len(),
        EntityKind::Person => PERSONS.len(),
        EntityKind::Owner => OWNERS.len(),
        EntityKind::Agent => AGENTS.len(),
        EntityKind::Client => CLIENTS.len(),
        EntityKind::Location => LOCATIONS.len(),
        EntityKind::Property => PROPERTIES.len(),
        EntityKind::Contract => CONTRACTS.len(),
        EntityKind::Payment => PAYMENTS.len(),
    }
}

/// Open the database at `path`, wiping it first if it already exists.
///
/// This is destructive: every row of an existing database is dropped.
pub fn initialize(path: &Path, seed_fixtures: bool) -> Result<SqliteStore> {
    let mut store = if path.exists() {
        tracing::warn!(
            "Database {} already exists; dropping all tables and data",
            path.display()
        );
        SqliteStore::open_wiped(path)?
    } else {
        SqliteStore::open(path)?
    };

    if seed_fixtures {
        seed(&mut store)?;
    }
    Ok(store)
}

/// Insert the fixture rows in one transaction. Returns the inserted counts.
pub fn seed(store: &mut SqliteStore) -> Result<DbStats> {
    store.transaction(seed_rows)?;

    let counts = EntityKind::all()
        .iter()
        .map(|kind| (*kind, fixture_count(*kind)))
        .collect();
    let stats = DbStats { counts };
    tracing::info!("Database seeded with {} rows", stats.total());
    tracing::debug!("{}", stats);
    Ok(stats)
}

fn seed_rows(conn: &Connection) -> Result<()> {
    let addresses = ADDRESSES
        .iter()
        .map(|&(street_number, line, country, postal_code)| {
            insert_address(
                conn,
                &NewAddress {
                    street_number: Some(street_number),
                    address_line: Some(line.to_string()),
                    country: Some(country.to_string()),
                    postal_code: Some(postal_code.to_string()),
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let persons = PERSONS
        .iter()
        .map(|&(first, last, born, phone, email, address)| {
            insert_person(
                conn,
                &NewPerson {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    date_of_birth: parse_date(EntityKind::Person, "date_of_birth", born)?,
                    phone_number: Some(phone.to_string()),
                    email: Some(email.to_string()),
                    address_id: Some(addresses[address]),
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let owners = OWNERS
        .iter()
        .map(|&(person, status, acquired)| {
            insert_owner(
                conn,
                &NewOwner {
                    person_id: persons[person],
                    resident_status: Some(status.to_string()),
                    acquisition_date: Some(parse_date(EntityKind::Owner, "acquisition_date", acquired)?),
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let agents = AGENTS
        .iter()
        .map(|&(person, employed)| {
            insert_agent(
                conn,
                &NewAgent {
                    person_id: persons[person],
                    employment_date: parse_date(EntityKind::Agent, "employment_date", employed)?,
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let clients = CLIENTS
        .iter()
        .map(|&(person, purchased)| {
            insert_client(
                conn,
                &NewClient {
                    person_id: persons[person],
                    purchase_date: Some(parse_date(EntityKind::Client, "purchase_date", purchased)?),
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let locations = LOCATIONS
        .iter()
        .map(|&(latitude, longitude)| insert_location(conn, &NewLocation { latitude, longitude }))
        .collect::<Result<Vec<_>>>()?;

    let properties = PROPERTIES
        .iter()
        .map(|&(rooms, year, area, price, location, owner)| {
            insert_property(
                conn,
                &NewProperty {
                    number_of_rooms: Some(rooms),
                    building_year: Some(year),
                    area_size: Some(area),
                    price,
                    location_id: Some(locations[location]),
                    owner_id: owners[owner],
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let contracts = CONTRACTS
        .iter()
        .map(|&(signed, agent, client, property)| {
            insert_contract(
                conn,
                &NewContract {
                    sign_date: parse_date(EntityKind::Contract, "sign_date", signed)?,
                    agent_id: agents[agent],
                    client_id: clients[client],
                    property_id: properties[property],
                },
            )
        })
        .collect::<Result<Vec<_>>>()?;

    for &(amount, paid, contract) in PAYMENTS {
        insert_payment(
            conn,
            &NewPayment {
                amount,
                date: parse_date(EntityKind::Payment, "date", paid)?,
                contract_id: contracts[contract],
            },
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_references_are_in_range() {
        assert!(PERSONS.iter().all(|p| p.5 < ADDRESSES.len()));
        assert!(OWNERS.iter().all(|o| o.0 < PERSONS.len()));
        assert!(AGENTS.iter().all(|a| a.0 < PERSONS.len()));
        assert!(CLIENTS.iter().all(|c| c.0 < PERSONS.len()));
        assert!(PROPERTIES.iter().all(|p| p.4 < LOCATIONS.len() && p.5 < OWNERS.len()));
        assert!(CONTRACTS
            .iter()
            .all(|c| c.1 < AGENTS.len() && c.2 < CLIENTS.len() && c.3 < PROPERTIES.len()));
        assert!(PAYMENTS.iter().all(|p| p.2 < CONTRACTS.len()));
    }

    #[test]
    fn test_seed_counts_match_store() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let seeded = seed(&mut store).unwrap();

        assert_eq!(seeded, store.stats().unwrap());
        assert_eq!(seeded.get(EntityKind::Owner), 3);
        assert_eq!(seeded.get(EntityKind::Payment), 9);
    }

    #[test]
    fn test_initialize_reseeds_from_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("realty.db");
        let mut store = initialize(&path, true).unwrap();
        seed(&mut store).unwrap();
        assert_eq!(store.count(EntityKind::Person).unwrap(), 18);
        drop(store);

        let store = initialize(&path, true).unwrap();
        assert_eq!(store.count(EntityKind::Person).unwrap(), 9);
        assert_eq!(
            store.reference_options(EntityKind::Person).unwrap()[0].id,
            1,
            "ids restart after a reset"
        );
    }
}
