//! Query timing and pool gauges for the asset store.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Publishes pool usage gauges. Called on a schedule by the API.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle() as u32;

    gauge!("database_connections_total").set(size as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
}

/// Times one repository call.
///
/// ```ignore
/// let timer = QueryTimer::new("find_asset_by_id");
/// let result = sqlx::query_as::<_, AssetEntity>(&sql).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Publishes the elapsed time under the query's label.
    pub fn record(self) {
        let elapsed = self.start.elapsed().as_secs_f64();
        histogram!("database_query_duration_seconds", "query" => self.query).record(elapsed);
        counter!("database_queries_total", "query" => self.query).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_keeps_query_label() {
        let timer = QueryTimer::new("list_active_assets");
        assert_eq!(timer.query, "list_active_assets");
        timer.record();
    }
}
