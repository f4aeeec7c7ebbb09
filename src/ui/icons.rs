pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const HOUSE: &str = "🏠";
    pub const GLOBE: &str = "🌍";
    pub const SEED: &str = "🌱";
    pub const EMPTY: &str = "∅";
}
