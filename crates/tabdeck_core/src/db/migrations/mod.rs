//! Ordered schema scripts and the upgrade runner.
//!
//! # Invariants
//! - Script versions start at 1 and increase by exactly one.
//! - All pending scripts run in one transaction; `user_version` moves with them.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs in upgrade order.
const SCRIPTS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Newest schema version this binary can read and write.
pub fn latest_version() -> u32 {
    SCRIPTS.last().map_or(0, |&(version, _)| version)
}

/// Brings the connection's schema up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = SCRIPTS
        .iter()
        .filter(|&&(version, _)| version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &&(version, script) in &pending {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={}",
        pending.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SCRIPTS;

    #[test]
    fn script_versions_are_contiguous_from_one() {
        for (index, &(version, _)) in SCRIPTS.iter().enumerate() {
            assert_eq!(version as usize, index + 1);
        }
    }
}
