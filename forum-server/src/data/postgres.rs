use sqlx::PgPool;

/// PostgreSQL-backed record store. Tables come from `migrations/`.
#[derive(Clone)]
pub struct PostgresStore {
    pub(crate) pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
