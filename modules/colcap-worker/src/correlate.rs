use std::sync::Arc;

use colcap_common::HistoricalTable;
use colcap_store::CoordinationStore;

const NEWS_PER_MONTH: u64 = 100;
const MONTHS_WINDOW: usize = 8;

/// Deterministically distributes an unbounded article stream across the
/// most recent `MONTHS_WINDOW` months of the historical index, using the
/// store's atomic `colcap_news_counter` so the rotation is strictly
/// monotone across every worker process — never cached locally.
pub struct Correlator {
    months: Vec<Vec<String>>,
    table: HistoricalTable,
}

impl Correlator {
    pub fn new(table: HistoricalTable) -> Self {
        let months = table.recent_months(MONTHS_WINDOW);
        Self { months, table }
    }

    /// `(assigned_date, index_value)`, or `None` if no value could be found.
    pub async fn correlate(
        &self,
        store: &Arc<dyn CoordinationStore>,
        original_date: &str,
    ) -> Option<(String, f64)> {
        if self.months.is_empty() {
            let value = self.table.get(original_date)?;
            return Some((original_date.to_string(), value));
        }

        let counter = store.incr("colcap_news_counter").await;
        let c = (counter - 1).max(0) as u64;

        let cycle_len = NEWS_PER_MONTH * self.months.len() as u64;
        let pos = c % cycle_len;
        let month_idx = (pos / NEWS_PER_MONTH) as usize;
        let within_month = pos % NEWS_PER_MONTH;

        let month_dates = &self.months[month_idx.min(self.months.len() - 1)];
        if month_dates.is_empty() {
            return None;
        }
        let assigned_date = &month_dates[(within_month as usize) % month_dates.len()];
        let value = self.table.get(assigned_date)?;
        Some((assigned_date.clone(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colcap_store::MemoryStore;
    use std::io::Write;

    fn historical_with(rows: &[(&str, &str)]) -> HistoricalTable {
        let path = std::env::temp_dir().join(format!(
            "colcap_correlate_test_{}.csv",
            std::process::id()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Fecha,Ultimo").unwrap();
        for (date, value) in rows {
            writeln!(f, "{date},{value}").unwrap();
        }
        drop(f);
        let table = HistoricalTable::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        table
    }

    fn eight_months_table() -> HistoricalTable {
        let mut rows = Vec::new();
        for month in 1..=8 {
            rows.push((format!("2024-{month:02}-01"), "1000".to_string()));
        }
        let refs: Vec<(&str, &str)> = rows.iter().map(|(d, v)| (d.as_str(), v.as_str())).collect();
        historical_with(&refs)
    }

    #[tokio::test]
    async fn counter_is_strictly_monotonic_across_calls() {
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
        let correlator = Correlator::new(eight_months_table());

        let mut prev = -1i64;
        for _ in 0..10 {
            let before = store.get("colcap_news_counter").await;
            correlator.correlate(&store, "2024-01-01").await;
            let after: i64 = store
                .get("colcap_news_counter")
                .await
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let before_val: i64 = before.and_then(|v| v.parse().ok()).unwrap_or(0);
            assert!(after > before_val);
            assert!(after > prev);
            prev = after;
        }
    }

    #[tokio::test]
    async fn distributes_800_articles_evenly_across_eight_months() {
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
        let correlator = Correlator::new(eight_months_table());

        let mut assigned_dates = Vec::new();
        for _ in 0..800 {
            let (date, _) = correlator.correlate(&store, "2024-01-01").await.unwrap();
            assigned_dates.push(date);
        }

        // First 100 map to the most recent month (2024-08), next 100 to
        // 2024-07, and so on.
        assert!(assigned_dates[0..100].iter().all(|d| d == "2024-08-01"));
        assert!(assigned_dates[100..200].iter().all(|d| d == "2024-07-01"));
        assert!(assigned_dates[700..800].iter().all(|d| d == "2024-01-01"));
    }

    #[tokio::test]
    async fn assigned_date_always_exists_in_historical_table() {
        let store: Arc<dyn CoordinationStore> = Arc::new(MemoryStore::new());
        let correlator = Correlator::new(eight_months_table());
        for _ in 0..20 {
            let (date, _) = correlator.correlate(&store, "2024-01-01").await.unwrap();
            assert!(correlator.table.get(&date).is_some());
        }
    }
}
