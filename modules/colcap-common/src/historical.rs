use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ColcapError, Result};

/// In-memory historical COLCAP index table, keyed by ISO date string
/// (`Fecha` column), value is the closing index (`Ultimo` column).
#[derive(Debug, Clone, Default)]
pub struct HistoricalTable {
    by_date: BTreeMap<String, f64>,
}

impl HistoricalTable {
    /// Load from a CSV file with at least `Fecha` and `Ultimo` columns.
    /// Rows that fail to parse are skipped, not fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| ColcapError::Data(format!("{}: {e}", path.display())))?;

        let mut by_date = BTreeMap::new();
        for record in reader.deserialize::<RawRow>() {
            match record {
                Ok(row) => {
                    if let Some(value) = parse_colombian_number(&row.ultimo) {
                        by_date.insert(row.fecha, value);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed historical row");
                }
            }
        }

        if by_date.is_empty() {
            return Err(ColcapError::Fatal(format!(
                "historical index table at {} is empty",
                path.display()
            )));
        }

        Ok(Self { by_date })
    }

    pub fn get(&self, date: &str) -> Option<f64> {
        self.by_date.get(date).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Group dates by `(year, month)`, keep the `n` most recent months
    /// (descending), each as an ascending-by-day list of date strings.
    pub fn recent_months(&self, n: usize) -> Vec<Vec<String>> {
        let mut by_month: BTreeMap<(i32, u32), Vec<String>> = BTreeMap::new();
        for date in self.by_date.keys() {
            if let Some((year, month)) = year_month(date) {
                by_month.entry((year, month)).or_default().push(date.clone());
            }
        }
        for dates in by_month.values_mut() {
            dates.sort();
        }
        by_month
            .into_iter()
            .rev()
            .take(n)
            .map(|(_, dates)| dates)
            .collect()
    }
}

#[derive(Debug, serde::Deserialize)]
struct RawRow {
    #[serde(rename = "Fecha")]
    fecha: String,
    #[serde(rename = "Ultimo")]
    ultimo: String,
}

fn year_month(date: &str) -> Option<(i32, u32)> {
    let mut parts = date.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    Some((year, month))
}

/// Parses numbers formatted with `.` thousands separators and `,` decimal
/// point, the convention used by the Colombian COLCAP export (e.g.
/// `"1.400,50"`), falling back to plain float parsing.
fn parse_colombian_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.contains(',') {
        let normalized = cleaned.replace('.', "").replace(',', ".");
        normalized.parse().ok()
    } else {
        cleaned.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    struct TempCsv {
        path: std::path::PathBuf,
    }

    impl TempCsv {
        fn new(contents: &str) -> Self {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "colcap_historical_test_{}_{n}.csv",
                std::process::id()
            ));
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(contents.as_bytes()).unwrap();
            Self { path }
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    #[test]
    fn loads_and_looks_up_by_date() {
        let csv = TempCsv::new("Fecha,Ultimo\n2024-03-15,\"1.400,50\"\n2024-03-14,\"1.390,00\"\n");
        let table = HistoricalTable::load(&csv.path).unwrap();
        assert_eq!(table.get("2024-03-15"), Some(1400.50));
        assert_eq!(table.get("2024-01-01"), None);
    }

    #[test]
    fn groups_into_recent_months_descending() {
        let csv = TempCsv::new(
            "Fecha,Ultimo\n2024-01-02,1.0\n2024-01-01,1.0\n2024-02-01,2.0\n2024-03-01,3.0\n",
        );
        let table = HistoricalTable::load(&csv.path).unwrap();
        let months = table.recent_months(2);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0], vec!["2024-03-01".to_string()]);
        assert_eq!(months[1], vec!["2024-02-01".to_string()]);
    }

    #[test]
    fn empty_table_is_fatal() {
        let csv = TempCsv::new("Fecha,Ultimo\n");
        let result = HistoricalTable::load(&csv.path);
        assert!(result.is_err());
    }
}
