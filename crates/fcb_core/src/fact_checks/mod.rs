use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{FactCheckResult, StoredFactCheck};
use crate::error::AppError;

const SELECT_COLUMNS: &str = r#"
    SELECT id, claim, claim_type, initial_response,
           assumptions_json, assumption_verdicts_json, gathered_evidence_json,
           final_answer, created_at
    FROM fact_checks
"#;

fn encode_list(field: &str, values: &[String]) -> Result<String, AppError> {
    serde_json::to_string(values).map_err(|e| {
        AppError::new("DB_FACT_CHECK_INVALID", format!("Failed to encode {field}"))
            .with_details(e.to_string())
    })
}

// NULL and empty text both decode to an empty list.
fn decode_list(row: &rusqlite::Row<'_>, idx: usize) -> Result<Vec<String>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> Result<StoredFactCheck, rusqlite::Error> {
    let claim_type: Option<String> = row.get(2)?;
    let initial_response: Option<String> = row.get(3)?;
    let final_answer: Option<String> = row.get(7)?;
    Ok(StoredFactCheck {
        id: row.get(0)?,
        result: FactCheckResult {
            claim: row.get(1)?,
            claim_type: claim_type.unwrap_or_default(),
            initial_response: initial_response.unwrap_or_default(),
            assumptions: decode_list(row, 4)?,
            assumption_verdicts: decode_list(row, 5)?,
            gathered_evidence: decode_list(row, 6)?,
            final_answer: final_answer.unwrap_or_default(),
        },
        created_at: row.get(8)?,
    })
}

fn read_error(e: rusqlite::Error) -> AppError {
    match e {
        rusqlite::Error::FromSqlConversionFailure(idx, _, inner) => AppError::new(
            "DB_HISTORY_CORRUPT",
            "Stored fact-check history could not be decoded",
        )
        .with_details(format!("column={idx}; err={inner}")),
        other => AppError::new("DB_FACT_CHECK_QUERY_FAILED", "Failed to read fact-check row")
            .with_details(other.to_string()),
    }
}

/// Insert one result as a single row. `created_at` is RFC3339 UTC.
pub fn insert_fact_check(
    conn: &Connection,
    result: &FactCheckResult,
    created_at: &str,
) -> Result<StoredFactCheck, AppError> {
    if result.claim.trim().is_empty() {
        return Err(AppError::new("DB_FACT_CHECK_INVALID", "claim is required"));
    }

    let assumptions_json = encode_list("assumptions", &result.assumptions)?;
    let verdicts_json = encode_list("assumption_verdicts", &result.assumption_verdicts)?;
    let evidence_json = encode_list("gathered_evidence", &result.gathered_evidence)?;

    conn.execute(
        r#"
        INSERT INTO fact_checks(
          claim, claim_type, initial_response,
          assumptions_json, assumption_verdicts_json, gathered_evidence_json,
          final_answer, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            result.claim,
            result.claim_type,
            result.initial_response,
            assumptions_json,
            verdicts_json,
            evidence_json,
            result.final_answer,
            created_at
        ],
    )
    .map_err(|e| {
        AppError::new("DB_FACT_CHECK_CREATE_FAILED", "Failed to store fact-check")
            .with_details(e.to_string())
    })?;

    let id = conn.last_insert_rowid();
    get_fact_check(conn, id)?.ok_or_else(|| {
        AppError::new(
            "DB_FACT_CHECK_CREATE_FAILED",
            "Fact-check stored but could not be read back",
        )
    })
}

pub fn get_fact_check(conn: &Connection, id: i64) -> Result<Option<StoredFactCheck>, AppError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(|e| {
        AppError::new("DB_FACT_CHECK_QUERY_FAILED", "Failed to prepare fact-check query")
            .with_details(e.to_string())
    })?;

    stmt.query_row([id], map_row).optional().map_err(read_error)
}

/// All stored results, oldest first. One undecodable row fails the whole load.
pub fn list_fact_checks(conn: &Connection) -> Result<Vec<StoredFactCheck>, AppError> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY created_at ASC, id ASC");
    let mut stmt = conn.prepare(&sql).map_err(|e| {
        AppError::new("DB_FACT_CHECK_QUERY_FAILED", "Failed to prepare fact-check history query")
            .with_details(e.to_string())
    })?;

    let rows = stmt.query_map([], map_row).map_err(|e| {
        AppError::new("DB_FACT_CHECK_QUERY_FAILED", "Failed to query fact-check history")
            .with_details(e.to_string())
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(read_error)?);
    }
    Ok(out)
}

pub fn count_fact_checks(conn: &Connection) -> Result<i64, AppError> {
    conn.query_row("SELECT COUNT(*) FROM fact_checks", [], |row| row.get(0))
        .map_err(|e| {
            AppError::new("DB_FACT_CHECK_QUERY_FAILED", "Failed to count fact-checks")
                .with_details(e.to_string())
        })
}

/// Delete every stored result. Returns the number of rows removed.
pub fn clear_fact_checks(conn: &Connection) -> Result<usize, AppError> {
    conn.execute("DELETE FROM fact_checks", []).map_err(|e| {
        AppError::new("DB_FACT_CHECK_CLEAR_FAILED", "Failed to clear fact-check history")
            .with_details(e.to_string())
    })
}
