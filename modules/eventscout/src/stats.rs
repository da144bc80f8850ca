use chrono::{DateTime, Utc};

/// Stats from one update cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub events_loaded: u32,
    pub stale_removed: u32,
    pub queries_searched: u32,
    pub queries_empty: u32,
    pub candidates_found: u32,
    pub dead_links: u32,
    pub verification_attempts: u32,
    pub events_verified: u32,
    pub events_rejected: u32,
    pub events_added: u32,
    pub duplicates_dropped: u32,
    pub catalog_size: u32,
}

impl RunStats {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            events_loaded: 0,
            stale_removed: 0,
            queries_searched: 0,
            queries_empty: 0,
            candidates_found: 0,
            dead_links: 0,
            verification_attempts: 0,
            events_verified: 0,
            events_rejected: 0,
            events_added: 0,
            duplicates_dropped: 0,
            catalog_size: 0,
        }
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Event Update Complete ===")?;
        writeln!(f, "Started:            {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Events loaded:      {}", self.events_loaded)?;
        writeln!(f, "Stale removed:      {}", self.stale_removed)?;
        writeln!(f, "Queries searched:   {}", self.queries_searched)?;
        writeln!(f, "Queries empty:      {}", self.queries_empty)?;
        writeln!(f, "Candidates found:   {}", self.candidates_found)?;
        writeln!(f, "Dead links:         {}", self.dead_links)?;
        writeln!(f, "Verifications:      {}", self.verification_attempts)?;
        writeln!(f, "  Verified:         {}", self.events_verified)?;
        writeln!(f, "  Rejected:         {}", self.events_rejected)?;
        writeln!(f, "Events added:       {}", self.events_added)?;
        writeln!(f, "Duplicates dropped: {}", self.duplicates_dropped)?;
        write!(f, "Catalog size:       {}", self.catalog_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_counters() {
        let mut stats = RunStats::new(Utc::now());
        stats.events_verified = 3;
        stats.catalog_size = 12;
        let text = stats.to_string();
        assert!(text.contains("Verified:         3"));
        assert!(text.contains("Catalog size:       12"));
    }
}
