use crate::data::Dataset;
use crate::error::{DashboardError, Result};
use log::warn;
use rayon::prelude::*;

/// What to do with a cell that does not hold a non-negative integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellPolicy {
    /// Fail the aggregation with a parse error
    #[default]
    Strict,
    /// Count the cell as zero
    ZeroFill,
}

/// Column totals, kept in the order they were requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    entries: Vec<(String, u64)>,
}

impl Totals {
    pub fn get(&self, column: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    pub fn values(&self) -> Vec<u64> {
        self.entries.iter().map(|(_, total)| *total).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum each named column over every row of `dataset`.
///
/// Fails with `MissingColumn` for the first name absent from the header and
/// with `InvalidInput` when `columns` is empty.
pub fn sum_columns(dataset: &Dataset, columns: &[&str], policy: CellPolicy) -> Result<Totals> {
    if columns.is_empty() {
        return Err(DashboardError::invalid_input("no columns requested"));
    }

    let indices = columns
        .iter()
        .map(|name| {
            dataset
                .column_index(name)
                .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut entries = Vec::with_capacity(columns.len());
    for (name, idx) in columns.iter().zip(indices) {
        entries.push((name.to_string(), sum_column(dataset, name, idx, policy)?));
    }
    Ok(Totals { entries })
}

fn sum_column(dataset: &Dataset, name: &str, idx: usize, policy: CellPolicy) -> Result<u64> {
    let (total, coerced) = dataset
        .rows()
        .par_iter()
        .enumerate()
        .map(|(row, record)| {
            let cell = record.get(idx).unwrap_or("");
            match (parse_count(cell), policy) {
                (Some(n), _) => Ok((n, 0usize)),
                (None, CellPolicy::ZeroFill) => Ok((0, 1)),
                (None, CellPolicy::Strict) => Err(DashboardError::parse(
                    format!("column {name}, row {}", row + 1),
                    format!("expected a vote count, found {cell:?}"),
                )),
            }
        })
        .try_reduce(
            || (0u64, 0usize),
            |(a, ca), (b, cb)| {
                let sum = a.checked_add(b).ok_or_else(|| {
                    DashboardError::parse(format!("column {name}"), "sum overflows u64")
                })?;
                Ok((sum, ca + cb))
            },
        )?;

    if coerced > 0 {
        warn!("column {name}: {coerced} malformed cells counted as zero");
    }
    Ok(total)
}

/// Parse a vote count; surrounding whitespace is tolerated
fn parse_count(cell: &str) -> Option<u64> {
    cell.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_rows(
            ["Inscrits", "Votants", "Abstentions", "Exprimés", "Blancs", "Nuls"],
            [
                ["100", "80", "20", "78", "1", "1"],
                ["200", "150", "50", "148", "1", "1"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sum_turnout_columns() {
        let totals = sum_columns(&sample(), &["Registered", "Voters", "Abstentionists"], CellPolicy::Strict).unwrap();
        assert_eq!(totals.get("Registered"), Some(300));
        assert_eq!(totals.get("Voters"), Some(230));
        assert_eq!(totals.get("Abstentionists"), Some(70));
        assert_eq!(totals.values(), vec![300, 230, 70]);
    }

    #[test]
    fn test_sum_matches_row_loop() {
        let headers = ["Voters", "Abstentionists"];
        let rows: Vec<[String; 2]> = (0..1000u64)
            .map(|i| [(i * 7 % 113).to_string(), (i * 13 % 97).to_string()])
            .collect();
        let ds = Dataset::from_rows(headers, rows.iter().map(|r| r.iter())).unwrap();

        let totals = sum_columns(&ds, &headers, CellPolicy::Strict).unwrap();

        let mut expected = 0u64;
        for row in &rows {
            expected += row[0].parse::<u64>().unwrap() + row[1].parse::<u64>().unwrap();
        }
        assert_eq!(
            totals.get("Voters").unwrap() + totals.get("Abstentionists").unwrap(),
            expected
        );
    }

    #[test]
    fn test_missing_column() {
        let result = sum_columns(&sample(), &["Voters", "Inscrits"], CellPolicy::Strict);
        assert_eq!(result, Err(DashboardError::MissingColumn("Inscrits".to_string())));
    }

    #[test]
    fn test_empty_request() {
        let result = sum_columns(&sample(), &[], CellPolicy::Strict);
        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[test]
    fn test_strict_rejects_malformed_cell() {
        let ds = Dataset::from_rows(["Blank"], [["3"], [""], ["n/a"]]).unwrap();
        let result = sum_columns(&ds, &["Blank"], CellPolicy::Strict);
        assert!(matches!(result, Err(DashboardError::Parse { .. })));
    }

    #[test]
    fn test_zero_fill_counts_malformed_as_zero() {
        let ds = Dataset::from_rows(["Blank"], [["3"], [""], ["n/a"], [" 4 "]]).unwrap();
        let totals = sum_columns(&ds, &["Blank"], CellPolicy::ZeroFill).unwrap();
        assert_eq!(totals.get("Blank"), Some(7));
    }

    #[test]
    fn test_negative_count_rejected() {
        let ds = Dataset::from_rows(["Invalid"], [["-1"]]).unwrap();
        assert!(sum_columns(&ds, &["Invalid"], CellPolicy::Strict).is_err());
    }

    #[test]
    fn test_empty_dataset_sums_to_zero() {
        let ds = Dataset::from_rows(["Cast"], Vec::<[&str; 1]>::new()).unwrap();
        let totals = sum_columns(&ds, &["Cast"], CellPolicy::Strict).unwrap();
        assert_eq!(totals.get("Cast"), Some(0));
    }

    #[test]
    fn test_overflow_reported() {
        let max = u64::MAX.to_string();
        let ds = Dataset::from_rows(["Cast"], [[max.as_str()], ["1"]]).unwrap();
        let result = sum_columns(&ds, &["Cast"], CellPolicy::Strict);
        assert!(matches!(result, Err(DashboardError::Parse { .. })));
    }
}
