//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Statement, params};
use crate::{Result, Error};
use crate::entity::EntityKind;
use crate::model::{
    Fields, NewAddress, NewAgent, NewClient, NewContract, NewLocation, NewOwner, NewPayment,
    NewPerson, NewProperty, NewRecord, RoleDetails,
};
use crate::record::{Listing, Record, RefOption, Value};
use super::{queries, schema};

/// SQLite-backed storage for the real-estate records
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(open_connection(path)?)
    }

    /// Open a database file and discard everything it holds.
    ///
    /// The tables are dropped before any create statement runs, so a file
    /// holding an older layout of these tables is rebuilt rather than
    /// rejected. A file that is not a SQLite database is replaced.
    pub fn open_wiped(path: &Path) -> Result<Self> {
        let conn = match drop_all_tables(path) {
            Ok(conn) => conn,
            Err(rusqlite::Error::SqliteFailure(code, _)) if code.code == ErrorCode::NotADatabase => {
                tracing::warn!("{} is not a SQLite database; replacing it", path.display());
                remove_database_files(path)?;
                open_connection(path)?
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Foreign keys are off by default and must be enabled per connection
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Drop every table and create them again, discarding all rows
    pub fn recreate_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for stmt in schema::all_drop_statements() {
            tx.execute(stmt, [])?;
        }
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// `(name, sql)` of every table, for comparing schema shapes
    pub fn schema_snapshot(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, sql FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let tables = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tables)
    }

    /// Run `f` inside a transaction; any error rolls everything back
    pub(crate) fn transaction<T>(
        &mut self,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let tx = self.conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    // ========== Create Operations ==========

    /// Parse submitted form fields for `kind` and insert one row.
    /// Returns the store-assigned id.
    pub fn create(&self, kind: EntityKind, fields: &Fields) -> Result<i64> {
        let record = NewRecord::from_fields(kind, fields)?;
        self.insert(&record)
    }

    /// Insert one typed row
    pub fn insert(&self, record: &NewRecord) -> Result<i64> {
        let id = insert_record(&self.conn, record)?;
        tracing::info!("Created {} {}", record.kind(), id);
        Ok(id)
    }

    /// Insert a person and the role row referencing it, atomically.
    /// Returns `(person_id, role_id)`.
    pub fn create_person_with_role(
        &mut self,
        person: &NewPerson,
        role: RoleDetails,
    ) -> Result<(i64, i64)> {
        let role_kind = role.kind();
        let (person_id, role_id) = self.transaction(|conn| {
            let person_id = insert_person(conn, person)?;
            let role_id = insert_record(conn, &role.into_record(person_id))?;
            Ok((person_id, role_id))
        })?;
        tracing::info!("Created person {} as {} {}", person_id, role_kind, role_id);
        Ok((person_id, role_id))
    }

    pub fn insert_address(&self, address: &NewAddress) -> Result<i64> {
        insert_address(&self.conn, address)
    }

    pub fn insert_person(&self, person: &NewPerson) -> Result<i64> {
        insert_person(&self.conn, person)
    }

    pub fn insert_owner(&self, owner: &NewOwner) -> Result<i64> {
        insert_owner(&self.conn, owner)
    }

    pub fn insert_agent(&self, agent: &NewAgent) -> Result<i64> {
        insert_agent(&self.conn, agent)
    }

    pub fn insert_client(&self, client: &NewClient) -> Result<i64> {
        insert_client(&self.conn, client)
    }

    pub fn insert_location(&self, location: &NewLocation) -> Result<i64> {
        insert_location(&self.conn, location)
    }

    pub fn insert_property(&self, property: &NewProperty) -> Result<i64> {
        insert_property(&self.conn, property)
    }

    pub fn insert_contract(&self, contract: &NewContract) -> Result<i64> {
        insert_contract(&self.conn, contract)
    }

    pub fn insert_payment(&self, payment: &NewPayment) -> Result<i64> {
        insert_payment(&self.conn, payment)
    }

    // ========== Read Operations ==========

    /// All rows of `kind` joined with their directly related entities,
    /// ordered by primary key
    pub fn list_with_relations(&self, kind: EntityKind) -> Result<Listing> {
        let mut stmt = self.conn.prepare(queries::join_query(kind).list)?;
        let columns = column_names(&stmt);

        let records = stmt
            .query_map([], |row| row_to_record(row, &columns))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Listed {} {} rows", records.len(), kind);
        Ok(Listing {
            kind,
            columns,
            records,
        })
    }

    /// One denormalized row by id
    pub fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Record>> {
        let mut stmt = self.conn.prepare(queries::join_query(kind).by_id)?;
        let columns = column_names(&stmt);

        stmt.query_row([id], |row| row_to_record(row, &columns))
            .optional()
            .map_err(Into::into)
    }

    /// `(id, label)` pairs for a foreign-key dropdown of `kind`
    pub fn reference_options(&self, kind: EntityKind) -> Result<Vec<RefOption>> {
        let mut stmt = self.conn.prepare(queries::options_query(kind))?;

        let options = stmt
            .query_map([], |row| {
                Ok(RefOption {
                    id: row.get(0)?,
                    label: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(options)
    }

    /// Count rows of one kind
    pub fn count(&self, kind: EntityKind) -> Result<usize> {
        let count: i64 = self.conn.query_row(queries::count_query(kind), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let counts = EntityKind::all()
            .iter()
            .map(|kind| -> Result<(EntityKind, usize)> { Ok((*kind, self.count(*kind)?)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(DbStats { counts })
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    Connection::open(path).map_err(|e| match Error::from(e) {
        Error::Storage(inner) => Error::ConnectionFailure(inner.to_string()),
        other => other,
    })
}

/// Drop every table with foreign keys off, so the drop order cannot trip
/// over references in a stale layout
fn drop_all_tables(path: &Path) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", false)?;
    let tx = conn.transaction()?;
    for stmt in schema::all_drop_statements() {
        tx.execute(stmt, [])?;
    }
    tx.commit()?;
    Ok(conn)
}

/// Remove a database file and the journal files SQLite keeps beside it
fn remove_database_files(path: &Path) -> Result<()> {
    std::fs::remove_file(path)?;
    for suffix in ["-journal", "-wal", "-shm"] {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = Path::new(&sidecar);
        if sidecar.exists() {
            std::fs::remove_file(sidecar)?;
        }
    }
    Ok(())
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

/// Helper to convert a row to a Record
fn row_to_record(row: &rusqlite::Row, columns: &[String]) -> rusqlite::Result<Record> {
    let fields = columns
        .iter()
        .enumerate()
        .map(|(i, name)| Ok((name.clone(), Value::from(row.get_ref(i)?))))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(Record::new(fields))
}

// ========== Row Inserts ==========
//
// Free functions over `&Connection` so they run the same on a plain
// connection and inside a transaction.

/// Insert any typed row through its table's fixed statement
pub(crate) fn insert_record(conn: &Connection, record: &NewRecord) -> Result<i64> {
    match record {
        NewRecord::Address(address) => insert_address(conn, address),
        NewRecord::Person(person) => insert_person(conn, person),
        NewRecord::Owner(owner) => insert_owner(conn, owner),
        NewRecord::Agent(agent) => insert_agent(conn, agent),
        NewRecord::Client(client) => insert_client(conn, client),
        NewRecord::Location(location) => insert_location(conn, location),
        NewRecord::Property(property) => insert_property(conn, property),
        NewRecord::Contract(contract) => insert_contract(conn, contract),
        NewRecord::Payment(payment) => insert_payment(conn, payment),
    }
}

pub(crate) fn insert_address(conn: &Connection, a: &NewAddress) -> Result<i64> {
    conn.execute(
        queries::INSERT_ADDRESS,
        params![a.street_number, a.address_line, a.country, a.postal_code],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_person(conn: &Connection, p: &NewPerson) -> Result<i64> {
    conn.execute(
        queries::INSERT_PERSON,
        params![
            p.first_name,
            p.last_name,
            p.date_of_birth,
            p.phone_number,
            p.email,
            p.address_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_owner(conn: &Connection, o: &NewOwner) -> Result<i64> {
    conn.execute(
        queries::INSERT_OWNER,
        params![o.person_id, o.resident_status, o.acquisition_date],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_agent(conn: &Connection, a: &NewAgent) -> Result<i64> {
    conn.execute(queries::INSERT_AGENT, params![a.person_id, a.employment_date])?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_client(conn: &Connection, c: &NewClient) -> Result<i64> {
    conn.execute(queries::INSERT_CLIENT, params![c.person_id, c.purchase_date])?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_location(conn: &Connection, l: &NewLocation) -> Result<i64> {
    conn.execute(queries::INSERT_LOCATION, params![l.latitude, l.longitude])?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_property(conn: &Connection, p: &NewProperty) -> Result<i64> {
    conn.execute(
        queries::INSERT_PROPERTY,
        params![
            p.number_of_rooms,
            p.building_year,
            p.area_size,
            p.price,
            p.location_id,
            p.owner_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_contract(conn: &Connection, c: &NewContract) -> Result<i64> {
    conn.execute(
        queries::INSERT_CONTRACT,
        params![c.sign_date, c.agent_id, c.client_id, c.property_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_payment(conn: &Connection, p: &NewPayment) -> Result<i64> {
    conn.execute(queries::INSERT_PAYMENT, params![p.amount, p.date, p.contract_id])?;
    Ok(conn.last_insert_rowid())
}

/// Row counts per table
#[derive(Debug, Clone, PartialEq)]
pub struct DbStats {
    pub counts: Vec<(EntityKind, usize)>,
}

impl DbStats {
    pub fn get(&self, kind: EntityKind) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        for (kind, count) in &self.counts {
            writeln!(f, "  {}: {}", kind.plural_label(), count)?;
        }
        write!(f, "  Total: {}", self.total())
    }
}
