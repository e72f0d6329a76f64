use crate::entities::{folder_contributors, folders, items, sessions, user_folders, users};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::env;
use std::time::Duration;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

/// Creates every table from its entity definition. Parents come before the
/// tables whose foreign keys reference them.
pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("🔄 Running SeaORM schema sync...");
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let stmts = vec![
        schema
            .create_table_from_entity(users::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(folders::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(items::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(user_folders::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(folder_contributors::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(sessions::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in stmts {
        db.execute(builder.build(&stmt)).await?;
    }

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_folders_feed ON folders(private, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_folders_owner ON folders(owner)",
        "CREATE INDEX IF NOT EXISTS idx_items_folder_id ON items(folder_id)",
        "CREATE INDEX IF NOT EXISTS idx_items_owner_id ON items(owner_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
    ];

    for sql in indexes {
        db.execute(sea_orm::Statement::from_string(builder, sql.to_string()))
            .await?;
    }

    Ok(())
}
