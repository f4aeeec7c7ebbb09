//! Fixed read and insert statements per entity kind
//!
//! Each listing is a hand-written join; the `list` and `by_id` forms are
//! derived from the same select at compile time so they can never drift.

use crate::entity::EntityKind;

/// A denormalized select in its two shapes
pub struct JoinQuery {
    /// Every row, ordered by primary key
    pub list: &'static str,
    /// One row, primary key bound to `?1`
    pub by_id: &'static str,
}

macro_rules! join_query {
    ($select:literal, key = $key:literal) => {
        JoinQuery {
            list: concat!($select, " ORDER BY ", $key),
            by_id: concat!($select, " WHERE ", $key, " = ?1"),
        }
    };
}

const ADDRESS: JoinQuery = join_query!(
    "SELECT address_id, street_number, address_line, country, postal_code FROM address",
    key = "address_id"
);

const PERSON: JoinQuery = join_query!(
    "SELECT p.person_id, p.first_name, p.last_name, p.date_of_birth, p.phone_number, p.email, \
            p.address_id, a.address_line, a.country, a.postal_code \
     FROM person p \
     LEFT JOIN address a ON p.address_id = a.address_id",
    key = "p.person_id"
);

const OWNER: JoinQuery = join_query!(
    "SELECT o.owner_id, o.person_id, o.resident_status, o.acquisition_date, \
            p.first_name, p.last_name, p.email, p.date_of_birth, p.phone_number, a.address_line \
     FROM owner o \
     JOIN person p ON o.person_id = p.person_id \
     LEFT JOIN address a ON p.address_id = a.address_id",
    key = "o.owner_id"
);

const AGENT: JoinQuery = join_query!(
    "SELECT ag.agent_id, ag.person_id, ag.employment_date, \
            p.first_name, p.last_name, p.email, p.date_of_birth, p.phone_number, a.address_line \
     FROM agent ag \
     JOIN person p ON ag.person_id = p.person_id \
     LEFT JOIN address a ON p.address_id = a.address_id",
    key = "ag.agent_id"
);

const CLIENT: JoinQuery = join_query!(
    "SELECT cl.client_id, cl.person_id, cl.purchase_date, \
            p.first_name, p.last_name, p.email, p.date_of_birth, p.phone_number, a.address_line \
     FROM client cl \
     JOIN person p ON cl.person_id = p.person_id \
     LEFT JOIN address a ON p.address_id = a.address_id",
    key = "cl.client_id"
);

const LOCATION: JoinQuery = join_query!(
    "SELECT location_id, latitude, longitude FROM location",
    key = "location_id"
);

const PROPERTY: JoinQuery = join_query!(
    "SELECT pr.property_id, pr.number_of_rooms, pr.building_year, pr.area_size, pr.price, \
            pr.location_id, pr.owner_id, \
            per.first_name AS owner_first_name, per.last_name AS owner_last_name, \
            l.latitude, l.longitude \
     FROM property pr \
     JOIN owner o ON pr.owner_id = o.owner_id \
     JOIN person per ON o.person_id = per.person_id \
     LEFT JOIN location l ON pr.location_id = l.location_id",
    key = "pr.property_id"
);

const CONTRACT: JoinQuery = join_query!(
    "SELECT c.contract_id, c.sign_date, \
            c.agent_id, ap.first_name AS agent_first_name, ap.last_name AS agent_last_name, \
            c.client_id, cp.first_name AS client_first_name, cp.last_name AS client_last_name, \
            c.property_id, pr.price, l.latitude, l.longitude \
     FROM contract c \
     JOIN agent ag ON c.agent_id = ag.agent_id \
     JOIN person ap ON ag.person_id = ap.person_id \
     JOIN client cl ON c.client_id = cl.client_id \
     JOIN person cp ON cl.person_id = cp.person_id \
     JOIN property pr ON c.property_id = pr.property_id \
     LEFT JOIN location l ON pr.location_id = l.location_id",
    key = "c.contract_id"
);

const PAYMENT: JoinQuery = join_query!(
    "SELECT pa.payment_id, pa.amount, pa.date, pa.contract_id, c.sign_date AS contract_sign_date \
     FROM payment pa \
     JOIN contract c ON pa.contract_id = c.contract_id",
    key = "pa.payment_id"
);

/// Listing join for a kind
pub fn join_query(kind: EntityKind) -> &'static JoinQuery {
    match kind {
        EntityKind::Address => &ADDRESS,
        EntityKind::Person => &PERSON,
        EntityKind::Owner => &OWNER,
        EntityKind::Agent => &AGENT,
        EntityKind::Client => &CLIENT,
        EntityKind::Location => &LOCATION,
        EntityKind::Property => &PROPERTY,
        EntityKind::Contract => &CONTRACT,
        EntityKind::Payment => &PAYMENT,
    }
}

/// `(id, label)` select feeding a kind's foreign-key dropdowns
pub fn options_query(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Address => {
            "SELECT address_id, TRIM(COALESCE(CAST(street_number AS TEXT), '') || ' ' || COALESCE(address_line, '')) \
             FROM address ORDER BY address_id"
        }
        EntityKind::Person => {
            "SELECT person_id, first_name || ' ' || last_name FROM person ORDER BY person_id"
        }
        EntityKind::Owner => {
            "SELECT o.owner_id, p.first_name || ' ' || p.last_name \
             FROM owner o JOIN person p ON o.person_id = p.person_id ORDER BY o.owner_id"
        }
        EntityKind::Agent => {
            "SELECT ag.agent_id, p.first_name || ' ' || p.last_name \
             FROM agent ag JOIN person p ON ag.person_id = p.person_id ORDER BY ag.agent_id"
        }
        EntityKind::Client => {
            "SELECT cl.client_id, p.first_name || ' ' || p.last_name \
             FROM client cl JOIN person p ON cl.person_id = p.person_id ORDER BY cl.client_id"
        }
        EntityKind::Location => {
            "SELECT location_id, latitude || ', ' || longitude FROM location ORDER BY location_id"
        }
        EntityKind::Property => {
            "SELECT property_id, '#' || property_id || ' - ' || price FROM property ORDER BY property_id"
        }
        EntityKind::Contract => {
            "SELECT contract_id, '#' || contract_id || ' signed ' || sign_date FROM contract ORDER BY contract_id"
        }
        EntityKind::Payment => {
            "SELECT payment_id, amount || ' on ' || date FROM payment ORDER BY payment_id"
        }
    }
}

/// Row count of a kind's table
pub fn count_query(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Address => "SELECT COUNT(*) FROM address",
        EntityKind::Person => "SELECT COUNT(*) FROM person",
        EntityKind::Owner => "SELECT COUNT(*) FROM owner",
        EntityKind::Agent => "SELECT COUNT(*) FROM agent",
        EntityKind::Client => "SELECT COUNT(*) FROM client",
        EntityKind::Location => "SELECT COUNT(*) FROM location",
        EntityKind::Property => "SELECT COUNT(*) FROM property",
        EntityKind::Contract => "SELECT COUNT(*) FROM contract",
        EntityKind::Payment => "SELECT COUNT(*) FROM payment",
    }
}

pub const INSERT_ADDRESS: &str =
    "INSERT INTO address (street_number, address_line, country, postal_code) VALUES (?1, ?2, ?3, ?4)";

pub const INSERT_PERSON: &str = "INSERT INTO person (first_name, last_name, date_of_birth, phone_number, email, address_id) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub const INSERT_OWNER: &str =
    "INSERT INTO owner (person_id, resident_status, acquisition_date) VALUES (?1, ?2, ?3)";

pub const INSERT_AGENT: &str = "INSERT INTO agent (person_id, employment_date) VALUES (?1, ?2)";

pub const INSERT_CLIENT: &str = "INSERT INTO client (person_id, purchase_date) VALUES (?1, ?2)";

pub const INSERT_LOCATION: &str = "INSERT INTO location (latitude, longitude) VALUES (?1, ?2)";

pub const INSERT_PROPERTY: &str = "INSERT INTO property (number_of_rooms, building_year, area_size, price, location_id, owner_id) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub const INSERT_CONTRACT: &str =
    "INSERT INTO contract (sign_date, agent_id, client_id, property_id) VALUES (?1, ?2, ?3, ?4)";

pub const INSERT_PAYMENT: &str = "INSERT INTO payment (amount, date, contract_id) VALUES (?1, ?2, ?3)";
