use crate::record::Listing;
use crate::storage::DbStats;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub table: String,
    #[tabled(rename = "Rows")]
    pub rows: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            table: label.to_string(),
            rows: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    for (kind, count) in &stats.counts {
        builder.add_row(kind.as_str(), &count.to_string());
    }
    builder.add_row("total", &stats.total().to_string());
    builder.build()
}

/// Render a listing with its join columns as headers
pub fn listing_table(listing: &Listing) -> String {
    let mut builder = Builder::default();
    builder.push_record(listing.columns.iter().cloned());
    for record in &listing.records {
        builder.push_record(record.values().map(|value| value.to_string()));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::record::{Record, Value};

    #[test]
    fn test_listing_table_has_headers_and_cells() {
        let listing = Listing {
            kind: EntityKind::Location,
            columns: vec!["location_id".to_string(), "latitude".to_string()],
            records: vec![Record::new(vec![
                ("location_id".to_string(), Value::Integer(1)),
                ("latitude".to_string(), Value::Real(40.712776)),
            ])],
        };

        let rendered = listing_table(&listing);
        assert!(rendered.contains("location_id"));
        assert!(rendered.contains("40.712776"));
    }

    #[test]
    fn test_stats_table_includes_total() {
        let stats = DbStats {
            counts: vec![(EntityKind::Address, 2), (EntityKind::Person, 3)],
        };
        let rendered = stats_table(&stats);
        assert!(rendered.contains("address"));
        assert!(rendered.contains("total"));
        assert!(rendered.contains('5'));
    }
}
