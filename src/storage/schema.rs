//! Database schema definitions

use crate::entity::EntityKind;

/// SQL to create the address table
pub const CREATE_ADDRESS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS address (
    address_id INTEGER PRIMARY KEY AUTOINCREMENT,
    street_number INTEGER,
    address_line TEXT,
    country TEXT,
    postal_code TEXT
)
"#;

/// SQL to create the person table
pub const CREATE_PERSON_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS person (
    person_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    phone_number TEXT,
    email TEXT,
    address_id INTEGER REFERENCES address(address_id)
)
"#;

/// SQL to create the owner role table
pub const CREATE_OWNER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS owner (
    owner_id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id INTEGER NOT NULL REFERENCES person(person_id),
    resident_status TEXT,
    acquisition_date TEXT
)
"#;

/// SQL to create the agent role table
pub const CREATE_AGENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS agent (
    agent_id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id INTEGER NOT NULL REFERENCES person(person_id),
    employment_date TEXT NOT NULL
)
"#;

/// SQL to create the client role table
pub const CREATE_CLIENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS client (
    client_id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id INTEGER NOT NULL REFERENCES person(person_id),
    purchase_date TEXT
)
"#;

/// SQL to create the location table
pub const CREATE_LOCATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS location (
    location_id INTEGER PRIMARY KEY AUTOINCREMENT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL
)
"#;

/// SQL to create the property table
pub const CREATE_PROPERTY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS property (
    property_id INTEGER PRIMARY KEY AUTOINCREMENT,
    number_of_rooms INTEGER,
    building_year INTEGER,
    area_size REAL,
    price REAL NOT NULL,
    location_id INTEGER REFERENCES location(location_id),
    owner_id INTEGER NOT NULL REFERENCES owner(owner_id)
)
"#;

/// SQL to create the contract table
pub const CREATE_CONTRACT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contract (
    contract_id INTEGER PRIMARY KEY AUTOINCREMENT,
    sign_date TEXT NOT NULL,
    agent_id INTEGER NOT NULL REFERENCES agent(agent_id),
    client_id INTEGER NOT NULL REFERENCES client(client_id),
    property_id INTEGER NOT NULL REFERENCES property(property_id)
)
"#;

/// SQL to create the payment table
pub const CREATE_PAYMENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS payment (
    payment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    amount REAL NOT NULL,
    date TEXT NOT NULL,
    contract_id INTEGER NOT NULL REFERENCES contract(contract_id)
)
"#;

/// SQL to create indexes on foreign-key columns
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_person_address ON person(address_id)",
    "CREATE INDEX IF NOT EXISTS idx_owner_person ON owner(person_id)",
    "CREATE INDEX IF NOT EXISTS idx_agent_person ON agent(person_id)",
    "CREATE INDEX IF NOT EXISTS idx_client_person ON client(person_id)",
    "CREATE INDEX IF NOT EXISTS idx_property_location ON property(location_id)",
    "CREATE INDEX IF NOT EXISTS idx_property_owner ON property(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_contract_agent ON contract(agent_id)",
    "CREATE INDEX IF NOT EXISTS idx_contract_client ON contract(client_id)",
    "CREATE INDEX IF NOT EXISTS idx_contract_property ON contract(property_id)",
    "CREATE INDEX IF NOT EXISTS idx_payment_contract ON payment(contract_id)",
];

/// `CREATE TABLE` statement of one kind's table
pub fn create_table_statement(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Address => CREATE_ADDRESS_TABLE,
        EntityKind::Person => CREATE_PERSON_TABLE,
        EntityKind::Owner => CREATE_OWNER_TABLE,
        EntityKind::Agent => CREATE_AGENT_TABLE,
        EntityKind::Client => CREATE_CLIENT_TABLE,
        EntityKind::Location => CREATE_LOCATION_TABLE,
        EntityKind::Property => CREATE_PROPERTY_TABLE,
        EntityKind::Contract => CREATE_CONTRACT_TABLE,
        EntityKind::Payment => CREATE_PAYMENT_TABLE,
    }
}

/// `DROP TABLE` statement of one kind's table
pub fn drop_table_statement(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Address => "DROP TABLE IF EXISTS address",
        EntityKind::Person => "DROP TABLE IF EXISTS person",
        EntityKind::Owner => "DROP TABLE IF EXISTS owner",
        EntityKind::Agent => "DROP TABLE IF EXISTS agent",
        EntityKind::Client => "DROP TABLE IF EXISTS client",
        EntityKind::Location => "DROP TABLE IF EXISTS location",
        EntityKind::Property => "DROP TABLE IF EXISTS property",
        EntityKind::Contract => "DROP TABLE IF EXISTS contract",
        EntityKind::Payment => "DROP TABLE IF EXISTS payment",
    }
}

/// All schema creation statements, tables in dependency order
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts: Vec<&'static str> = EntityKind::all()
        .iter()
        .map(|kind| create_table_statement(*kind))
        .collect();
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Drop statements, dependents first so foreign keys never dangle
pub fn all_drop_statements() -> Vec<&'static str> {
    EntityKind::all()
        .iter()
        .rev()
        .map(|kind| drop_table_statement(*kind))
        .collect()
}
