use sqlx::PgPool;

/// Shared handler state. The pool is created once in `main` and closed there.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
