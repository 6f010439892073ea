use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::model::common::identity::{EligibilitySource, Identity};

/// Read-only view of an external credential issuer.
///
/// A voter is eligible in an election iff they hold exactly one credential
/// from that election's eligibility source.
#[rocket::async_trait]
pub trait EligibilityOracle: Send + Sync {
    /// How many credentials from `source` does `holder` hold?
    async fn credential_count(&self, holder: &Identity, source: &EligibilitySource)
        -> Result<u64>;
}

/// Config-shaped credential table: source name -> holder -> count.
pub type CredentialTable = HashMap<String, HashMap<String, u64>>;

/// An in-memory credential ledger. Clones share the same ledger.
#[derive(Debug, Clone, Default)]
pub struct CredentialBook {
    counts: Arc<RwLock<HashMap<(EligibilitySource, Identity), u64>>>,
}

impl CredentialBook {
    /// Build a ledger from a configured credential table.
    pub fn from_table(table: &CredentialTable) -> Self {
        let book = Self::default();
        for (source, holders) in table {
            for (holder, count) in holders {
                book.set(
                    EligibilitySource::from(source.as_str()),
                    Identity::from(holder.as_str()),
                    *count,
                );
            }
        }
        book
    }

    /// Issue one more credential from `source` to `holder`.
    pub fn issue(&self, source: impl Into<EligibilitySource>, holder: impl Into<Identity>) {
        let mut counts = self.counts.write().unwrap_or_else(PoisonError::into_inner);
        *counts.entry((source.into(), holder.into())).or_insert(0) += 1;
    }

    /// Overwrite how many credentials `holder` has from `source`.
    pub fn set(&self, source: impl Into<EligibilitySource>, holder: impl Into<Identity>, count: u64) {
        let mut counts = self.counts.write().unwrap_or_else(PoisonError::into_inner);
        counts.insert((source.into(), holder.into()), count);
    }

    fn count(&self, holder: &Identity, source: &EligibilitySource) -> u64 {
        let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);
        counts
            .get(&(source.clone(), holder.clone()))
            .copied()
            .unwrap_or(0)
    }
}

#[rocket::async_trait]
impl EligibilityOracle for CredentialBook {
    async fn credential_count(
        &self,
        holder: &Identity,
        source: &EligibilitySource,
    ) -> Result<u64> {
        Ok(self.count(holder, source))
    }
}
