//! Static SQL for the Evergreen catalog schema
//!
//! Every record-set statement takes `$1` as the org unit id array (`INT4[]`);
//! incremental variants take `$2` as the window lower bound (`TIMESTAMPTZ`).
//! Rolling windows compare with `> $2`, explicit windows with an inclusive
//! `BETWEEN $2 AND NOW()`.

/// Records with at least one live copy circulating from an org unit in scope
pub const BASE_RECORDS: &str = "
SELECT DISTINCT acn.record
  FROM asset.call_number acn
  JOIN asset.copy acp ON acp.call_number = acn.id
 WHERE acp.circ_lib = ANY($1)
   AND NOT acp.deleted
   AND NOT acn.deleted
   AND acn.record > 0
 ORDER BY acn.record";

/// Base records with a copy created or activated after `$2`
pub const CHANGED_RECORDS_ROLLING: &str = "
SELECT DISTINCT acn.record
  FROM asset.call_number acn
  JOIN asset.copy acp ON acp.call_number = acn.id
 WHERE acp.circ_lib = ANY($1)
   AND NOT acp.deleted
   AND NOT acn.deleted
   AND acn.record > 0
   AND (acp.create_date > $2 OR acp.active_date > $2)
 ORDER BY acn.record";

/// Base records with a copy created or activated between `$2` and now
pub const CHANGED_RECORDS_SINCE: &str = "
SELECT DISTINCT acn.record
  FROM asset.call_number acn
  JOIN asset.copy acp ON acp.call_number = acn.id
 WHERE acp.circ_lib = ANY($1)
   AND NOT acp.deleted
   AND NOT acn.deleted
   AND acn.record > 0
   AND (acp.create_date BETWEEN $2 AND NOW() OR acp.active_date BETWEEN $2 AND NOW())
 ORDER BY acn.record";

/// Records with a copy audited after `$2` that is now deleted, and no live copy left in scope
///
/// Copy deletes are rewritten to `UPDATE ... SET deleted = TRUE` and the
/// audit row holds the pre-update copy, so deletion is read from the current
/// `asset.copy` row.
pub const DELETED_RECORDS_ROLLING: &str = "
SELECT DISTINCT acn.record
  FROM auditor.asset_copy_history aach
  JOIN asset.copy acp ON acp.id = aach.id
  JOIN asset.call_number acn ON acn.id = aach.call_number
 WHERE aach.circ_lib = ANY($1)
   AND aach.audit_time > $2
   AND acp.deleted
   AND acn.record > 0
   AND NOT EXISTS (
       SELECT 1
         FROM asset.copy live
         JOIN asset.call_number live_acn ON live_acn.id = live.call_number
        WHERE live_acn.record = acn.record
          AND live.circ_lib = ANY($1)
          AND NOT live.deleted
          AND NOT live_acn.deleted)
 ORDER BY acn.record";

/// Records with a copy audited between `$2` and now that is now deleted, and
/// no live copy left in scope
pub const DELETED_RECORDS_SINCE: &str = "
SELECT DISTINCT acn.record
  FROM auditor.asset_copy_history aach
  JOIN asset.copy acp ON acp.id = aach.id
  JOIN asset.call_number acn ON acn.id = aach.call_number
 WHERE aach.circ_lib = ANY($1)
   AND aach.audit_time BETWEEN $2 AND NOW()
   AND acp.deleted
   AND acn.record > 0
   AND NOT EXISTS (
       SELECT 1
         FROM asset.copy live
         JOIN asset.call_number live_acn ON live_acn.id = live.call_number
        WHERE live_acn.record = acn.record
          AND live.circ_lib = ANY($1)
          AND NOT live.deleted
          AND NOT live_acn.deleted)
 ORDER BY acn.record";

/// Aggregated live holdings per record; `$2` is the record id array (`INT8[]`).
///
/// The five arrays share one ordering so entry `i` of each describes the
/// same copy.
pub const HOLDINGS: &str = "
SELECT acn.record,
       array_agg(aou.name ORDER BY aou.name, acn.label, acp.id) AS branches,
       array_agg(acl.name ORDER BY aou.name, acn.label, acp.id) AS locations,
       array_agg(acn.label ORDER BY aou.name, acn.label, acp.id) AS call_numbers,
       array_agg(COALESCE(acnp.label, '') ORDER BY aou.name, acn.label, acp.id) AS prefixes,
       array_agg(COALESCE(acns.label, '') ORDER BY aou.name, acn.label, acp.id) AS suffixes
  FROM asset.copy acp
  JOIN asset.call_number acn ON acn.id = acp.call_number
  JOIN actor.org_unit aou ON aou.id = acp.circ_lib
  JOIN asset.copy_location acl ON acl.id = acp.location
  LEFT JOIN asset.call_number_prefix acnp ON acnp.id = acn.prefix
  LEFT JOIN asset.call_number_suffix acns ON acns.id = acn.suffix
 WHERE acp.circ_lib = ANY($1)
   AND acn.record = ANY($2)
   AND NOT acp.deleted
   AND NOT acn.deleted
 GROUP BY acn.record
 ORDER BY acn.record";

/// Stored MARCXML for one record
pub const RECORD_MARC: &str = "SELECT marc FROM biblio.record_entry WHERE id = $1";

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CHANGED_RECORDS_ROLLING, "> $2" ; "changed rolling")]
    #[test_case(DELETED_RECORDS_ROLLING, "> $2" ; "deleted rolling")]
    #[test_case(CHANGED_RECORDS_SINCE, "BETWEEN $2 AND NOW()" ; "changed since")]
    #[test_case(DELETED_RECORDS_SINCE, "BETWEEN $2 AND NOW()" ; "deleted since")]
    fn test_window_comparison(sql: &str, comparison: &str) {
        assert!(sql.contains(comparison));
        assert!(sql.contains("ANY($1)"));
    }

    #[test_case(DELETED_RECORDS_ROLLING ; "rolling")]
    #[test_case(DELETED_RECORDS_SINCE ; "since")]
    fn test_deleted_queries_read_deletion_from_current_copy(sql: &str) {
        assert!(sql.contains("JOIN asset.copy acp ON acp.id = aach.id"));
        assert!(sql.contains("AND acp.deleted"));
        assert!(!sql.contains("aach.deleted"));
        assert!(!sql.contains("audit_action"));
        assert!(sql.contains("NOT EXISTS"));
        assert!(sql.contains("aach.circ_lib = ANY($1)"));
    }

    #[test]
    fn test_base_query_has_no_window() {
        assert!(!BASE_RECORDS.contains("$2"));
    }

    #[test]
    fn test_holdings_arrays_share_ordering() {
        let orderings = HOLDINGS
            .matches("ORDER BY aou.name, acn.label, acp.id")
            .count();
        assert_eq!(orderings, 5);
    }
}
