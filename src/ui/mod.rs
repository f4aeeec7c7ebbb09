pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, record_details, section, success, summary_row, warn};
pub use table::{TableBuilder, listing_table, stats_table};
pub use theme::{theme, Theme};
