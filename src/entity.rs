//! Entity kinds - the nine record tables of the real-estate schema
//!
//! Every table-level decision (which table to insert into, which join to
//! list with, which route serves it) goes through [`EntityKind`], so no SQL
//! or route is ever assembled from user-supplied table names.
//!
//! - `Address`, `Location`: standalone reference rows
//! - `Person`: identity, optionally pointing at an `Address`
//! - `Owner`, `Agent`, `Client`: role rows a `Person` can hold
//! - `Property`, `Contract`, `Payment`: the transaction chain

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The record tables, in dependency order (a kind only references kinds
/// listed before it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Address,
    Person,
    Owner,
    Agent,
    Client,
    Location,
    Property,
    Contract,
    Payment,
}

impl EntityKind {
    /// Table name, also used as the route suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Address => "address",
            EntityKind::Person => "person",
            EntityKind::Owner => "owner",
            EntityKind::Agent => "agent",
            EntityKind::Client => "client",
            EntityKind::Location => "location",
            EntityKind::Property => "property",
            EntityKind::Contract => "contract",
            EntityKind::Payment => "payment",
        }
    }

    /// Primary key column of the kind's table
    pub fn id_column(&self) -> &'static str {
        match self {
            EntityKind::Address => "address_id",
            EntityKind::Person => "person_id",
            EntityKind::Owner => "owner_id",
            EntityKind::Agent => "agent_id",
            EntityKind::Client => "client_id",
            EntityKind::Location => "location_id",
            EntityKind::Property => "property_id",
            EntityKind::Contract => "contract_id",
            EntityKind::Payment => "payment_id",
        }
    }

    /// Human-readable plural used for page titles
    pub fn plural_label(&self) -> &'static str {
        match self {
            EntityKind::Address => "Addresses",
            EntityKind::Person => "Persons",
            EntityKind::Owner => "Owners",
            EntityKind::Agent => "Agents",
            EntityKind::Client => "Clients",
            EntityKind::Location => "Locations",
            EntityKind::Property => "Properties",
            EntityKind::Contract => "Contracts",
            EntityKind::Payment => "Payments",
        }
    }

    /// Foreign-key fields of this kind and the kind each one references
    pub fn references(&self) -> &'static [(&'static str, EntityKind)] {
        match self {
            EntityKind::Address | EntityKind::Location => &[],
            EntityKind::Person => &[("address_id", EntityKind::Address)],
            EntityKind::Owner | EntityKind::Agent | EntityKind::Client => {
                &[("person_id", EntityKind::Person)]
            }
            EntityKind::Property => &[
                ("location_id", EntityKind::Location),
                ("owner_id", EntityKind::Owner),
            ],
            EntityKind::Contract => &[
                ("agent_id", EntityKind::Agent),
                ("client_id", EntityKind::Client),
                ("property_id", EntityKind::Property),
            ],
            EntityKind::Payment => &[("contract_id", EntityKind::Contract)],
        }
    }

    /// True for the role tables that hang off `person`
    pub fn is_role(&self) -> bool {
        matches!(self, EntityKind::Owner | EntityKind::Agent | EntityKind::Client)
    }

    /// Route of the listing page, e.g. `/show_person`
    pub fn listing_path(&self) -> String {
        format!("/show_{}", self.as_str())
    }

    /// Route of the create form, e.g. `/create_person`
    pub fn create_path(&self) -> String {
        format!("/create_{}", self.as_str())
    }

    /// All kinds in dependency order
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Address,
            EntityKind::Person,
            EntityKind::Owner,
            EntityKind::Agent,
            EntityKind::Client,
            EntityKind::Location,
            EntityKind::Property,
            EntityKind::Contract,
            EntityKind::Payment,
        ]
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "address" | "addresses" => Ok(EntityKind::Address),
            "person" | "persons" | "people" => Ok(EntityKind::Person),
            "owner" | "owners" => Ok(EntityKind::Owner),
            "agent" | "agents" => Ok(EntityKind::Agent),
            "client" | "clients" => Ok(EntityKind::Client),
            "location" | "locations" => Ok(EntityKind::Location),
            "property" | "properties" => Ok(EntityKind::Property),
            "contract" | "contracts" => Ok(EntityKind::Contract),
            "payment" | "payments" => Ok(EntityKind::Payment),
            _ => Err(Error::UnknownEntity(s.to_string())),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_roundtrip() {
        for kind in EntityKind::all() {
            let parsed: EntityKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_entity_kind_aliases() {
        assert_eq!(EntityKind::from_str("People").unwrap(), EntityKind::Person);
        assert_eq!(EntityKind::from_str("properties").unwrap(), EntityKind::Property);
        assert!(matches!(
            EntityKind::from_str("person; DROP TABLE person"),
            Err(Error::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_references_point_backwards() {
        // Every referenced kind must come earlier so seeding and setup can
        // follow `all()` order.
        for kind in EntityKind::all() {
            for (_, target) in kind.references() {
                assert!(target < kind, "{kind} references later kind {target}");
            }
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(EntityKind::Owner.listing_path(), "/show_owner");
        assert_eq!(EntityKind::Payment.create_path(), "/create_payment");
    }
}
