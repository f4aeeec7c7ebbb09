//! Typed insert records and form-field parsing
//!
//! A submitted form arrives as a flat string map. Each entity kind has a
//! `New*` struct whose `from_fields` constructor pulls the columns it needs
//! out of that map: NOT NULL columns must be present and non-blank
//! (`Error::MissingField`), optional columns turn blank into `None`, and
//! every present value must parse as its column type
//! (`Error::InvalidField`).

use crate::entity::EntityKind;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Raw submitted form fields
pub type Fields = HashMap<String, String>;

/// ISO date format used for every date column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a field is entered on its create form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Integer,
    Decimal,
    Date,
    Email,
    Phone,
    /// Foreign key, rendered as a dropdown of the referenced kind
    Reference(EntityKind),
}

/// One input of a create form
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, input: InputKind, required: bool) -> FieldSpec {
    FieldSpec { name, label, input, required }
}

use InputKind::{Date, Decimal, Email, Integer, Phone, Reference, Text};

const ADDRESS_FIELDS: &[FieldSpec] = &[
    field("street_number", "Street number", Integer, false),
    field("address_line", "Address line", Text, false),
    field("country", "Country", Text, false),
    field("postal_code", "Postal code", Text, false),
];

const PERSON_FIELDS: &[FieldSpec] = &[
    field("first_name", "First name", Text, true),
    field("last_name", "Last name", Text, true),
    field("date_of_birth", "Date of birth", Date, true),
    field("phone_number", "Phone number", Phone, false),
    field("email", "Email", Email, false),
    field("address_id", "Address", Reference(EntityKind::Address), false),
];

const OWNER_FIELDS: &[FieldSpec] = &[
    field("person_id", "Person", Reference(EntityKind::Person), true),
    field("resident_status", "Resident status", Text, false),
    field("acquisition_date", "Acquisition date", Date, false),
];

const AGENT_FIELDS: &[FieldSpec] = &[
    field("person_id", "Person", Reference(EntityKind::Person), true),
    field("employment_date", "Employment date", Date, true),
];

const CLIENT_FIELDS: &[FieldSpec] = &[
    field("person_id", "Person", Reference(EntityKind::Person), true),
    field("purchase_date", "Purchase date", Date, false),
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    field("latitude", "Latitude", Decimal, true),
    field("longitude", "Longitude", Decimal, true),
];

const PROPERTY_FIELDS: &[FieldSpec] = &[
    field("number_of_rooms", "Number of rooms", Integer, false),
    field("building_year", "Building year", Integer, false),
    field("area_size", "Area size", Decimal, false),
    field("price", "Price", Decimal, true),
    field("location_id", "Location", Reference(EntityKind::Location), false),
    field("owner_id", "Owner", Reference(EntityKind::Owner), true),
];

const CONTRACT_FIELDS: &[FieldSpec] = &[
    field("sign_date", "Sign date", Date, true),
    field("agent_id", "Agent", Reference(EntityKind::Agent), true),
    field("client_id", "Client", Reference(EntityKind::Client), true),
    field("property_id", "Property", Reference(EntityKind::Property), true),
];

const PAYMENT_FIELDS: &[FieldSpec] = &[
    field("amount", "Amount", Decimal, true),
    field("date", "Date", Date, true),
    field("contract_id", "Contract", Reference(EntityKind::Contract), true),
];

/// Role-specific inputs shown on the person form when a role is chosen
pub const ROLE_FIELDS: &[FieldSpec] = &[
    field("resident_status", "Resident status (owner)", Text, false),
    field("acquisition_date", "Acquisition date (owner)", Date, false),
    field("employment_date", "Employment date (agent)", Date, false),
    field("purchase_date", "Purchase date (client)", Date, false),
];

/// Form inputs for a kind, in column order. `required` mirrors the
/// table's NOT NULL columns.
pub fn form_fields(kind: EntityKind) -> &'static [FieldSpec] {
    match kind {
        EntityKind::Address => ADDRESS_FIELDS,
        EntityKind::Person => PERSON_FIELDS,
        EntityKind::Owner => OWNER_FIELDS,
        EntityKind::Agent => AGENT_FIELDS,
        EntityKind::Client => CLIENT_FIELDS,
        EntityKind::Location => LOCATION_FIELDS,
        EntityKind::Property => PROPERTY_FIELDS,
        EntityKind::Contract => CONTRACT_FIELDS,
        EntityKind::Payment => PAYMENT_FIELDS,
    }
}

/// Parse an ISO `YYYY-MM-DD` date for `entity.field`
pub fn parse_date(entity: EntityKind, field: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| Error::InvalidField {
        entity,
        field,
        reason: format!("expected a YYYY-MM-DD date, got '{}' ({})", raw, e),
    })
}

/// Typed view over a submitted form for one entity kind
struct FieldReader<'a> {
    entity: EntityKind,
    fields: &'a Fields,
}

impl<'a> FieldReader<'a> {
    fn new(entity: EntityKind, fields: &'a Fields) -> Self {
        Self { entity, fields }
    }

    /// Trimmed value, `None` when absent or blank
    fn raw(&self, field: &'static str) -> Option<&'a str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, field: &'static str) -> Result<&'a str> {
        self.raw(field).ok_or(Error::MissingField {
            entity: self.entity,
            field,
        })
    }

    fn invalid(&self, field: &'static str, reason: String) -> Error {
        Error::InvalidField {
            entity: self.entity,
            field,
            reason,
        }
    }

    fn text(&self, field: &'static str) -> Result<String> {
        self.require(field).map(str::to_string)
    }

    fn opt_text(&self, field: &'static str) -> Option<String> {
        self.raw(field).map(str::to_string)
    }

    fn int(&self, field: &'static str) -> Result<i64> {
        let raw = self.require(field)?;
        self.parse_int(field, raw)
    }

    fn opt_int(&self, field: &'static str) -> Result<Option<i64>> {
        self.raw(field).map(|raw| self.parse_int(field, raw)).transpose()
    }

    fn parse_int(&self, field: &'static str, raw: &str) -> Result<i64> {
        raw.parse::<i64>()
            .map_err(|e| self.invalid(field, format!("expected an integer, got '{}' ({})", raw, e)))
    }

    fn decimal(&self, field: &'static str) -> Result<f64> {
        let raw = self.require(field)?;
        self.parse_decimal(field, raw)
    }

    fn opt_decimal(&self, field: &'static str) -> Result<Option<f64>> {
        self.raw(field).map(|raw| self.parse_decimal(field, raw)).transpose()
    }

    fn parse_decimal(&self, field: &'static str, raw: &str) -> Result<f64> {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(self.invalid(field, format!("'{}' is not a finite number", raw))),
            Err(e) => Err(self.invalid(field, format!("expected a number, got '{}' ({})", raw, e))),
        }
    }

    fn date(&self, field: &'static str) -> Result<NaiveDate> {
        parse_date(self.entity, field, self.require(field)?)
    }

    fn opt_date(&self, field: &'static str) -> Result<Option<NaiveDate>> {
        self.raw(field)
            .map(|raw| parse_date(self.entity, field, raw))
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub street_number: Option<i64>,
    pub address_line: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl NewAddress {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Address, fields);
        Ok(Self {
            street_number: r.opt_int("street_number")?,
            address_line: r.opt_text("address_line"),
            country: r.opt_text("country"),
            postal_code: r.opt_text("postal_code"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i64>,
}

impl NewPerson {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Person, fields);
        Ok(Self {
            first_name: r.text("first_name")?,
            last_name: r.text("last_name")?,
            date_of_birth: r.date("date_of_birth")?,
            phone_number: r.opt_text("phone_number"),
            email: r.opt_text("email"),
            address_id: r.opt_int("address_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOwner {
    pub person_id: i64,
    pub resident_status: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
}

impl NewOwner {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Owner, fields);
        Ok(Self {
            person_id: r.int("person_id")?,
            resident_status: r.opt_text("resident_status"),
            acquisition_date: r.opt_date("acquisition_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAgent {
    pub person_id: i64,
    pub employment_date: NaiveDate,
}

impl NewAgent {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Agent, fields);
        Ok(Self {
            person_id: r.int("person_id")?,
            employment_date: r.date("employment_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub person_id: i64,
    pub purchase_date: Option<NaiveDate>,
}

impl NewClient {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Client, fields);
        Ok(Self {
            person_id: r.int("person_id")?,
            purchase_date: r.opt_date("purchase_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl NewLocation {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Location, fields);
        Ok(Self {
            latitude: r.decimal("latitude")?,
            longitude: r.decimal("longitude")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub number_of_rooms: Option<i64>,
    pub building_year: Option<i64>,
    pub area_size: Option<f64>,
    pub price: f64,
    pub location_id: Option<i64>,
    pub owner_id: i64,
}

impl NewProperty {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Property, fields);
        Ok(Self {
            number_of_rooms: r.opt_int("number_of_rooms")?,
            building_year: r.opt_int("building_year")?,
            area_size: r.opt_decimal("area_size")?,
            price: r.decimal("price")?,
            location_id: r.opt_int("location_id")?,
            owner_id: r.int("owner_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub sign_date: NaiveDate,
    pub agent_id: i64,
    pub client_id: i64,
    pub property_id: i64,
}

impl NewContract {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Contract, fields);
        Ok(Self {
            sign_date: r.date("sign_date")?,
            agent_id: r.int("agent_id")?,
            client_id: r.int("client_id")?,
            property_id: r.int("property_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub amount: f64,
    pub date: NaiveDate,
    pub contract_id: i64,
}

impl NewPayment {
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let r = FieldReader::new(EntityKind::Payment, fields);
        Ok(Self {
            amount: r.decimal("amount")?,
            date: r.date("date")?,
            contract_id: r.int("contract_id")?,
        })
    }
}

/// One row to insert, tagged by its table
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Address(NewAddress),
    Person(NewPerson),
    Owner(NewOwner),
    Agent(NewAgent),
    Client(NewClient),
    Location(NewLocation),
    Property(NewProperty),
    Contract(NewContract),
    Payment(NewPayment),
}

impl NewRecord {
    /// Parse a submitted form for `kind`
    pub fn from_fields(kind: EntityKind, fields: &Fields) -> Result<Self> {
        Ok(match kind {
            EntityKind::Address => NewRecord::Address(NewAddress::from_fields(fields)?),
            EntityKind::Person => NewRecord::Person(NewPerson::from_fields(fields)?),
            EntityKind::Owner => NewRecord::Owner(NewOwner::from_fields(fields)?),
            EntityKind::Agent => NewRecord::Agent(NewAgent::from_fields(fields)?),
            EntityKind::Client => NewRecord::Client(NewClient::from_fields(fields)?),
            EntityKind::Location => NewRecord::Location(NewLocation::from_fields(fields)?),
            EntityKind::Property => NewRecord::Property(NewProperty::from_fields(fields)?),
            EntityKind::Contract => NewRecord::Contract(NewContract::from_fields(fields)?),
            EntityKind::Payment => NewRecord::Payment(NewPayment::from_fields(fields)?),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            NewRecord::Address(_) => EntityKind::Address,
            NewRecord::Person(_) => EntityKind::Person,
            NewRecord::Owner(_) => EntityKind::Owner,
            NewRecord::Agent(_) => EntityKind::Agent,
            NewRecord::Client(_) => EntityKind::Client,
            NewRecord::Location(_) => EntityKind::Location,
            NewRecord::Property(_) => EntityKind::Property,
            NewRecord::Contract(_) => EntityKind::Contract,
            NewRecord::Payment(_) => EntityKind::Payment,
        }
    }
}

/// Role a freshly created person takes on in the same request. The
/// `person_id` of the role row is filled in from the inserted person.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleDetails {
    Owner {
        resident_status: Option<String>,
        acquisition_date: Option<NaiveDate>,
    },
    Agent {
        employment_date: NaiveDate,
    },
    Client {
        purchase_date: Option<NaiveDate>,
    },
}

impl RoleDetails {
    /// Read the optional `role` selector of the person form. A blank or
    /// absent `role` means the person is created without a role.
    pub fn from_fields(fields: &Fields) -> Result<Option<Self>> {
        let Some(role) = fields.get("role").map(|r| r.trim()).filter(|r| !r.is_empty()) else {
            return Ok(None);
        };

        let invalid = || Error::InvalidField {
            entity: EntityKind::Person,
            field: "role",
            reason: format!("'{}' is not a person role", role),
        };
        let kind: EntityKind = role.parse().map_err(|_| invalid())?;
        let r = FieldReader::new(kind, fields);
        let details = match kind {
            EntityKind::Owner => RoleDetails::Owner {
                resident_status: r.opt_text("resident_status"),
                acquisition_date: r.opt_date("acquisition_date")?,
            },
            EntityKind::Agent => RoleDetails::Agent {
                employment_date: r.date("employment_date")?,
            },
            EntityKind::Client => RoleDetails::Client {
                purchase_date: r.opt_date("purchase_date")?,
            },
            _ => return Err(invalid()),
        };
        Ok(Some(details))
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            RoleDetails::Owner { .. } => EntityKind::Owner,
            RoleDetails::Agent { .. } => EntityKind::Agent,
            RoleDetails::Client { .. } => EntityKind::Client,
        }
    }

    /// The role row to insert once the person's id is known
    pub fn into_record(self, person_id: i64) -> NewRecord {
        match self {
            RoleDetails::Owner {
                resident_status,
                acquisition_date,
            } => NewRecord::Owner(NewOwner {
                person_id,
                resident_status,
                acquisition_date,
            }),
            RoleDetails::Agent { employment_date } => NewRecord::Agent(NewAgent {
                person_id,
                employment_date,
            }),
            RoleDetails::Client { purchase_date } => NewRecord::Client(NewClient {
                person_id,
                purchase_date,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_person_from_fields() {
        let person = NewPerson::from_fields(&fields(&[
            ("first_name", " Alice "),
            ("last_name", "Liddell"),
            ("date_of_birth", "1985-05-04"),
            ("phone_number", ""),
            ("address_id", "3"),
        ]))
        .unwrap();

        assert_eq!(person.first_name, "Alice");
        assert_eq!(person.date_of_birth, NaiveDate::from_ymd_opt(1985, 5, 4).unwrap());
        assert_eq!(person.phone_number, None);
        assert_eq!(person.email, None);
        assert_eq!(person.address_id, Some(3));
    }

    #[test]
    fn test_blank_required_field_is_missing() {
        let err = NewAgent::from_fields(&fields(&[("person_id", "4"), ("employment_date", "  ")]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                entity: EntityKind::Agent,
                field: "employment_date"
            }
        ));
    }

    #[test]
    fn test_unparseable_values_are_invalid() {
        let err = NewLocation::from_fields(&fields(&[("latitude", "north"), ("longitude", "2.0")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "latitude", .. }));

        let err = NewPayment::from_fields(&fields(&[
            ("amount", "10"),
            ("date", "05/01/2022"),
            ("contract_id", "1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "date", .. }));

        let err = NewLocation::from_fields(&fields(&[("latitude", "NaN"), ("longitude", "2.0")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "latitude", .. }));
    }

    #[test]
    fn test_empty_form_reports_first_required_field() {
        for kind in EntityKind::all() {
            let first_required = form_fields(*kind).iter().find(|f| f.required);
            match (NewRecord::from_fields(*kind, &Fields::new()), first_required) {
                (Err(Error::MissingField { entity, field }), Some(spec)) => {
                    assert_eq!(entity, *kind);
                    assert_eq!(field, spec.name);
                }
                (Ok(record), None) => assert_eq!(record.kind(), *kind),
                (other, spec) => panic!("{kind}: unexpected {other:?} for {spec:?}"),
            }
        }
    }

    #[test]
    fn test_role_details() {
        assert_eq!(RoleDetails::from_fields(&fields(&[("role", "")])).unwrap(), None);

        let role = RoleDetails::from_fields(&fields(&[
            ("role", "agent"),
            ("employment_date", "2010-01-01"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(role.kind(), EntityKind::Agent);
        assert!(matches!(
            role.into_record(7),
            NewRecord::Agent(NewAgent { person_id: 7, .. })
        ));

        let err = RoleDetails::from_fields(&fields(&[("role", "agent")])).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                entity: EntityKind::Agent,
                field: "employment_date"
            }
        ));

        let err = RoleDetails::from_fields(&fields(&[("role", "payment")])).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "role", .. }));
    }
}
