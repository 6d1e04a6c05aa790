//! Cookie CRUD operations.
//!
//! Rows are unique per (user, website, cookie name); uploading a cookie
//! that already exists replaces its value and clears its verdict.

use super::connection::CookieDb;
use crate::Error;
use crate::cookie::{CookieRecord, NewCookie, ValidationOutcome};
use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Row};

const SELECT_COLUMNS: &str = "SELECT id, user_id, website, cookie_name, cookie_value, domain, path,
        expires, is_valid, last_validated, created_at
    FROM cookies";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CookieRecord> {
    Ok(CookieRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        website: row.get(2)?,
        name: row.get(3)?,
        value: row.get(4)?,
        domain: row.get(5)?,
        path: row.get(6)?,
        expires: row.get(7)?,
        is_valid: row.get(8)?,
        last_validated: row.get(9)?,
        created_at: row.get(10)?,
    })
}

impl CookieDb {
    /// Insert or replace cookies for a user and website in one transaction.
    ///
    /// Returns the number of rows written.
    pub async fn save_cookies(&self, user_id: i64, website: &str, cookies: &[NewCookie]) -> Result<usize, Error> {
        let website = website.to_string();
        let cookies = cookies.to_vec();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);

        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO cookies (
                        user_id, website, cookie_name, cookie_value, domain, path, expires,
                        is_valid, last_validated, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, ?8)
                    ON CONFLICT(user_id, website, cookie_name) DO UPDATE SET
                        cookie_value = excluded.cookie_value,
                        domain = excluded.domain,
                        path = excluded.path,
                        expires = excluded.expires,
                        is_valid = NULL,
                        last_validated = NULL,
                        created_at = excluded.created_at",
                    )?;
                    for cookie in &cookies {
                        stmt.execute(params![
                            user_id,
                            &website,
                            &cookie.name,
                            &cookie.value,
                            &cookie.domain,
                            &cookie.path,
                            &cookie.expires,
                            &created_at,
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(cookies.len())
            })
            .await
            .map_err(Error::from)
    }

    /// List a user's cookies, newest first, optionally for one website only.
    pub async fn list_cookies(&self, user_id: i64, website: Option<&str>) -> Result<Vec<CookieRecord>, Error> {
        let website = website.map(str::to_string);
        self.conn
            .call(move |conn| -> Result<Vec<CookieRecord>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_COLUMNS}
                    WHERE user_id = ?1 AND (?2 IS NULL OR website = ?2)
                    ORDER BY created_at DESC, id DESC"
                ))?;

                let rows = stmt
                    .query_map(params![user_id, website], record_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }

    /// Get one cookie by id.
    ///
    /// Returns None if the id doesn't exist.
    pub async fn get_cookie(&self, cookie_id: i64) -> Result<Option<CookieRecord>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<CookieRecord>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;

                match stmt.query_row(params![cookie_id], record_from_row) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Store a batch of verdicts, all stamped `validated_at`, in one transaction.
    ///
    /// Either every verdict is written or none is. Returns the number of rows
    /// updated; outcomes for ids that no longer exist are skipped.
    pub async fn set_validities(
        &self, outcomes: &[ValidationOutcome], validated_at: DateTime<Utc>,
    ) -> Result<usize, Error> {
        let outcomes = outcomes.to_vec();
        let validated_at = validated_at.to_rfc3339();

        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                let mut updated = 0;
                {
                    let mut stmt =
                        tx.prepare("UPDATE cookies SET is_valid = ?1, last_validated = ?2 WHERE id = ?3")?;
                    for outcome in &outcomes {
                        updated += stmt.execute(params![outcome.is_valid, &validated_at, outcome.cookie_id])?;
                    }
                }
                tx.commit()?;
                Ok(updated)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a cookie owned by the user.
    ///
    /// Returns false if the cookie doesn't exist or belongs to someone else.
    pub async fn delete_cookie(&self, user_id: i64, cookie_id: i64) -> Result<bool, Error> {
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count =
                    conn.execute("DELETE FROM cookies WHERE id = ?1 AND user_id = ?2", params![cookie_id, user_id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}
