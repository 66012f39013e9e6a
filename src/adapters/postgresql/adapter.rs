//! PostgreSQL adapter implementing the catalog source traits

use crate::adapters::database::traits::{
    HoldingsSource, RawHoldings, RecordSetSource, RecordStore,
};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::queries;
use crate::core::scope::WindowBound;
use crate::domain::{OrgUnitId, RecordId, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Row;

/// Evergreen catalog database
///
/// Wraps the pooled client; cloning shares the pool.
#[derive(Clone)]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn record_ids(
        &self,
        sql: &str,
        org_units: &[OrgUnitId],
        bound: Option<&WindowBound>,
    ) -> Result<Vec<i64>> {
        let units = raw_units(org_units);
        let rows = match bound {
            None => self.client.query(sql, &[&units]).await?,
            Some(bound) => {
                let since = bound.since();
                self.client.query(sql, &[&units, &since]).await?
            }
        };
        rows.iter().map(|row| Ok(row.try_get::<_, i64>(0)?)).collect()
    }
}

fn raw_units(org_units: &[OrgUnitId]) -> Vec<i32> {
    org_units.iter().map(|unit| unit.get()).collect()
}

fn holdings_from_row(row: &Row) -> Result<RawHoldings> {
    Ok(RawHoldings {
        record_id: row.try_get("record")?,
        branches: row.try_get("branches")?,
        locations: row.try_get("locations")?,
        call_numbers: row.try_get("call_numbers")?,
        prefixes: row.try_get("prefixes")?,
        suffixes: row.try_get("suffixes")?,
    })
}

#[async_trait]
impl RecordSetSource for PostgreSQLAdapter {
    async fn base_record_ids(&self, org_units: &[OrgUnitId]) -> Result<Vec<i64>> {
        self.record_ids(queries::BASE_RECORDS, org_units, None).await
    }

    async fn changed_record_ids(
        &self,
        org_units: &[OrgUnitId],
        bound: &WindowBound,
    ) -> Result<Vec<i64>> {
        let sql = match bound {
            WindowBound::Rolling(_) => queries::CHANGED_RECORDS_ROLLING,
            WindowBound::Explicit(_) => queries::CHANGED_RECORDS_SINCE,
        };
        self.record_ids(sql, org_units, Some(bound)).await
    }

    async fn deleted_record_ids(
        &self,
        org_units: &[OrgUnitId],
        bound: &WindowBound,
    ) -> Result<Vec<i64>> {
        let sql = match bound {
            WindowBound::Rolling(_) => queries::DELETED_RECORDS_ROLLING,
            WindowBound::Explicit(_) => queries::DELETED_RECORDS_SINCE,
        };
        self.record_ids(sql, org_units, Some(bound)).await
    }
}

#[async_trait]
impl HoldingsSource for PostgreSQLAdapter {
    async fn holdings_for(
        &self,
        record_ids: &[RecordId],
        org_units: &[OrgUnitId],
    ) -> Result<Vec<RawHoldings>> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }
        let units = raw_units(org_units);
        let ids: Vec<i64> = record_ids.iter().map(|id| id.get()).collect();
        let rows = self.client.query(queries::HOLDINGS, &[&units, &ids]).await?;
        rows.iter().map(holdings_from_row).collect()
    }
}

#[async_trait]
impl RecordStore for PostgreSQLAdapter {
    async fn fetch_record(&self, id: RecordId) -> Result<Option<Vec<u8>>> {
        let rows = self
            .client
            .query(queries::RECORD_MARC, &[&id.get()])
            .await?;
        // A row with NULL marc is as good as missing
        match rows.first() {
            None => Ok(None),
            Some(row) => {
                let marc: Option<String> = row.try_get(0)?;
                Ok(marc.map(String::into_bytes))
            }
        }
    }
}
