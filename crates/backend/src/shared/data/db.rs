use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Схема БД. Каждая таблица создаётся, только если её ещё нет.
const SCHEMA: &[(&str, &str)] = &[
    (
        "sys_users",
        r#"CREATE TABLE IF NOT EXISTS sys_users (
            id TEXT PRIMARY KEY NOT NULL,
            nom TEXT NOT NULL,
            prenom TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            statut TEXT NOT NULL DEFAULT 'ACTIF',
            date_creation TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT,
            created_by TEXT
        );"#,
    ),
    (
        "sys_refresh_tokens",
        r#"CREATE TABLE IF NOT EXISTS sys_refresh_tokens (
            id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            token_hash TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );"#,
    ),
    (
        "sys_settings",
        r#"CREATE TABLE IF NOT EXISTS sys_settings (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );"#,
    ),
    (
        "a001_project",
        r#"CREATE TABLE IF NOT EXISTS a001_project (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            location TEXT,
            initial_budget REAL NOT NULL DEFAULT 0,
            current_cost REAL NOT NULL DEFAULT 0,
            start_date TEXT NOT NULL,
            planned_end_date TEXT NOT NULL,
            actual_end_date TEXT,
            status TEXT NOT NULL DEFAULT 'PLANIFIE',
            responsible_id TEXT,
            cost_alert_threshold REAL NOT NULL DEFAULT 80,
            delay_alert_threshold REAL NOT NULL DEFAULT 80,
            progress REAL NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a002_phase",
        r#"CREATE TABLE IF NOT EXISTS a002_phase (
            id TEXT PRIMARY KEY NOT NULL,
            project_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            planned_start TEXT NOT NULL,
            planned_end TEXT NOT NULL,
            actual_start TEXT,
            actual_end TEXT,
            allocated_budget REAL NOT NULL DEFAULT 0,
            current_cost REAL NOT NULL DEFAULT 0,
            progress REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'PLANIFIE',
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a003_operation",
        r#"CREATE TABLE IF NOT EXISTS a003_operation (
            id TEXT PRIMARY KEY NOT NULL,
            phase_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            operation_type TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL DEFAULT 0,
            planned_start TEXT NOT NULL,
            planned_end TEXT NOT NULL,
            actual_start TEXT,
            actual_end TEXT,
            planned_cost REAL NOT NULL DEFAULT 0,
            actual_cost REAL NOT NULL DEFAULT 0,
            progress REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'PLANIFIE',
            responsible_id TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a004_threshold",
        r#"CREATE TABLE IF NOT EXISTS a004_threshold (
            id TEXT PRIMARY KEY NOT NULL,
            operation_id TEXT NOT NULL,
            green REAL NOT NULL,
            yellow REAL NOT NULL,
            red REAL NOT NULL,
            defined_by TEXT,
            modified_by TEXT,
            modified_at TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a005_report",
        r#"CREATE TABLE IF NOT EXISTS a005_report (
            id TEXT PRIMARY KEY NOT NULL,
            project_id TEXT NOT NULL,
            phase_id TEXT,
            operation_id TEXT,
            report_type TEXT NOT NULL,
            file_name TEXT NOT NULL,
            file_path TEXT,
            imported_by TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'A_TRAITER',
            comments TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a006_problem",
        r#"CREATE TABLE IF NOT EXISTS a006_problem (
            id TEXT PRIMARY KEY NOT NULL,
            project_id TEXT,
            phase_id TEXT,
            operation_id TEXT,
            report_id TEXT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            severity TEXT NOT NULL DEFAULT 'MOYENNE',
            status TEXT NOT NULL DEFAULT 'OUVERT',
            reported_by TEXT NOT NULL,
            resolved_by TEXT,
            resolved_at TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a007_solution",
        r#"CREATE TABLE IF NOT EXISTS a007_solution (
            id TEXT PRIMARY KEY NOT NULL,
            problem_id TEXT NOT NULL,
            description TEXT NOT NULL,
            solution_type TEXT NOT NULL DEFAULT '',
            estimated_cost REAL,
            estimated_delay_days INTEGER,
            proposed_by TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'PROPOSEE',
            validated_by TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a008_team_member",
        r#"CREATE TABLE IF NOT EXISTS a008_team_member (
            id TEXT PRIMARY KEY NOT NULL,
            project_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            project_role TEXT NOT NULL,
            assigned_by TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0,
            UNIQUE (project_id, user_id)
        );"#,
    ),
    (
        "a009_alert",
        r#"CREATE TABLE IF NOT EXISTS a009_alert (
            id TEXT PRIMARY KEY NOT NULL,
            project_id TEXT,
            phase_id TEXT,
            operation_id TEXT,
            kind TEXT NOT NULL,
            level TEXT NOT NULL,
            message TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'NON_LU',
            read_by TEXT,
            read_at TEXT,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );"#,
    ),
    (
        "a010_history",
        r#"CREATE TABLE IF NOT EXISTS a010_history (
            id TEXT PRIMARY KEY NOT NULL,
            table_name TEXT NOT NULL,
            record_id TEXT NOT NULL,
            field TEXT NOT NULL,
            old_value TEXT,
            new_value TEXT,
            modified_by TEXT,
            comment TEXT,
            modified_at TEXT NOT NULL
        );"#,
    ),
];

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    for (table, ddl) in SCHEMA {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await
            .map_err(|e| anyhow::anyhow!("failed to create table {}: {}", table, e))?;
    }
    tracing::info!("Database schema ready ({} tables)", SCHEMA.len());

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
