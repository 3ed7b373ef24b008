//! Client-side copy of the server catalog.

use shared::CatalogRecord;

/// Generation of a catalog fetch. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Default)]
pub struct CatalogCache {
    records: Vec<CatalogRecord>,
    /// Last ticket handed out
    issued: u64,
    /// Newest ticket whose result was applied (or rejected)
    settled: u64,
}

impl CatalogCache {
    pub fn current(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn is_refreshing(&self) -> bool {
        self.issued > self.settled
    }

    /// Start a fetch; pass the ticket back with its result.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Apply a finished fetch. A success replaces the whole list; a failure
    /// keeps the last good list. Results older than an already settled fetch
    /// are dropped. Returns whether the list changed.
    pub fn complete_refresh<E: std::fmt::Display>(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<CatalogRecord>, E>,
    ) -> bool {
        if ticket.0 <= self.settled {
            tracing::debug!("Dropping out-of-order catalog result #{}", ticket.0);
            return false;
        }
        self.settled = ticket.0;

        match result {
            Ok(records) => {
                tracing::info!("Catalog refreshed: {} files", records.len());
                self.records = records;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to fetch files, keeping cached list: {}", e);
                false
            }
        }
    }
}
