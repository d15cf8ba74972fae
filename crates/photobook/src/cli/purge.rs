//! Purge commands.

use super::storage::init_storage;
use photobook::{
    PhotobookConfig, PhotobookError, PhotobookResult, PostgresRecords, PurgeServer, PurgeTask,
    Purger, database_url, establish_pool, purge_once, run_migrations,
};
use photobook_error::{DatabaseError, DatabaseErrorKind};
use std::sync::Arc;
use tracing::info;

fn connect(config: &PhotobookConfig) -> PhotobookResult<PostgresRecords> {
    let pool = establish_pool(&database_url()?, *config.database().pool_size())?;
    let mut conn = pool.get().map_err(|e| {
        PhotobookError::from(DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
    })?;
    run_migrations(&mut conn)?;
    Ok(PostgresRecords::new(pool))
}

fn purger(
    config: &PhotobookConfig,
) -> Result<Arc<Purger<photobook::FileSystemBlobStore, PostgresRecords>>, Box<dyn std::error::Error>>
{
    let store = Arc::new(init_storage(config)?);
    let records = Arc::new(connect(config)?);
    Ok(Arc::new(Purger::new(
        store,
        records,
        config.purge().staging_max_age(),
    )))
}

/// Run the given tasks once and print each report as JSON.
pub async fn run_purge(
    config: &PhotobookConfig,
    tasks: Vec<PurgeTask>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(init_storage(config)?);
    let reports = purge_once(store, config.purge(), &tasks, || {
        connect(config).map(Arc::new)
    })
    .await?;
    for (_, report) in reports {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Run the purge server until Ctrl-C.
pub async fn serve(config: &PhotobookConfig) -> Result<(), Box<dyn std::error::Error>> {
    let purger = purger(config)?;
    let handle = PurgeServer::new(config.purge().clone(), purger).start()?;

    info!("Purge server running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    handle.shutdown().await;
    Ok(())
}
