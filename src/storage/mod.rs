//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - address(street_number, address_line, country, postal_code)
//! - person(first_name, last_name, date_of_birth, phone_number, email, address_id)
//! - owner(person_id, resident_status, acquisition_date)
//! - agent(person_id, employment_date)
//! - client(person_id, purchase_date)
//! - location(latitude, longitude)
//! - property(number_of_rooms, building_year, area_size, price, location_id, owner_id)
//! - contract(sign_date, agent_id, client_id, property_id)
//! - payment(amount, date, contract_id)

pub mod schema;
pub mod queries;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};
