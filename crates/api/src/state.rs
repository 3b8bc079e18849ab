use std::sync::Arc;

use folio_db::memory::MemoryRevisionStore;
use folio_db::pg::PgRevisionStore;
use folio_db::DbPool;
use folio_history::collaborators::{PostReader, PostWriter};
use folio_history::config::HistoryConfig;
use folio_history::facade::PostHistory;
use folio_history::log::RevisionLog;
use folio_history::memory::MemoryPosts;
use folio_history::pg::PgPosts;
use folio_history::renderer::HtmlRenderer;
use folio_history::tags::BasicTagResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database pool; `None` when running on the in-memory stores.
    pub pool: Option<DbPool>,
    pub posts: Arc<dyn PostReader>,
    pub writer: Arc<dyn PostWriter>,
    pub history: Arc<PostHistory>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(config: ServerConfig, history: HistoryConfig, pool: DbPool) -> Self {
        let log = RevisionLog::from_store(Arc::new(PgRevisionStore::new(pool.clone())));
        let posts = Arc::new(PgPosts::new(pool.clone(), log.clone(), history.clone()));
        Self::assemble(config, history, Some(pool), log, posts.clone(), posts)
    }

    /// State backed by in-process stores; nothing survives a restart.
    pub fn in_memory(config: ServerConfig, history: HistoryConfig) -> Self {
        let log = RevisionLog::from_store(Arc::new(MemoryRevisionStore::new()));
        let posts = Arc::new(MemoryPosts::new(log.clone(), history.clone()));
        Self::assemble(config, history, None, log, posts.clone(), posts)
    }

    fn assemble(
        config: ServerConfig,
        history: HistoryConfig,
        pool: Option<DbPool>,
        log: RevisionLog,
        posts: Arc<dyn PostReader>,
        writer: Arc<dyn PostWriter>,
    ) -> Self {
        let history = PostHistory::new(
            history,
            log,
            posts.clone(),
            writer.clone(),
            Arc::new(HtmlRenderer),
            Arc::new(BasicTagResolver),
        );
        Self {
            config: Arc::new(config),
            pool,
            posts,
            writer,
            history: Arc::new(history),
        }
    }
}
