//! Table-level derived features: cyclical encodings, wind category, lags

use std::f64::consts::PI;
use std::sync::Arc;

use crate::error::FeatureError;
use crate::features::table::FeatureTable;

/// Mean synodic month in days
pub const LUNAR_CYCLE_DAYS: f64 = 29.53;
pub const YEAR_DAYS: f64 = 365.25;
pub const WEEK_DAYS: f64 = 7.0;

/// Columns never lagged even when the model lists them
pub const LAG_EXCLUDED: [&str; 7] = [
    "year",
    "month",
    "week_of_month",
    "is_weekend",
    "is_holiday",
    "weekday_sin",
    "weekday_cos",
];

/// Integer encoder for the wind-direction sector, fit on a fixed vocabulary
pub trait CategoryEncoder: Send + Sync {
    /// Known classes, in encoding order
    fn classes(&self) -> &[i64];

    /// Position of `value` in the vocabulary, `None` when unseen
    fn encode(&self, value: i64) -> Option<usize> {
        self.classes().iter().position(|c| *c == value)
    }
}

/// Most frequent class, smallest value on ties
pub fn most_frequent_class(classes: &[i64]) -> Result<i64, FeatureError> {
    let mut sorted = classes.to_vec();
    sorted.sort_unstable();

    let mut best: Option<(i64, usize)> = None;
    for run in sorted.chunk_by(|a, b| a == b) {
        let count = run.len();
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((run[0], count));
        }
    }

    best.map(|(class, _)| class)
        .ok_or(FeatureError::EmptyVocabulary)
}

/// Adds derived columns to a filled [`FeatureTable`].
///
/// The out-of-vocabulary fallback is computed once at construction.
pub struct FeatureEngineer {
    encoder: Arc<dyn CategoryEncoder>,
    fallback_class: i64,
    model_features: Vec<String>,
}

impl FeatureEngineer {
    pub fn new(
        encoder: Arc<dyn CategoryEncoder>,
        model_features: Vec<String>,
    ) -> Result<Self, FeatureError> {
        let fallback_class = most_frequent_class(encoder.classes())?;
        Ok(Self {
            encoder,
            fallback_class,
            model_features,
        })
    }

    pub fn fallback_class(&self) -> i64 {
        self.fallback_class
    }

    pub fn model_features(&self) -> &[String] {
        &self.model_features
    }

    /// Known sector index, or the fallback class for unseen and missing values
    pub fn remap_direction(&self, value: Option<f64>) -> i64 {
        value
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i64)
            .filter(|v| self.encoder.encode(*v).is_some())
            .unwrap_or(self.fallback_class)
    }

    /// Base columns that get `_lag1`/`_lag2` copies
    pub fn lag_columns<'a>(&'a self, table: &'a FeatureTable) -> impl Iterator<Item = &'a str> {
        self.model_features
            .iter()
            .map(String::as_str)
            .filter(|name| !name.contains("_lag"))
            .filter(|name| !LAG_EXCLUDED.contains(name))
            .filter(move |name| table.has_column(name))
    }

    /// Add every derived column to `table`.
    ///
    /// Fails with [`FeatureError::DuplicateColumn`] when run on a table that
    /// has already been engineered.
    pub fn engineer(&self, table: &mut FeatureTable) -> Result<(), FeatureError> {
        add_cyclical(table, "moon_age", LUNAR_CYCLE_DAYS)?;
        add_cyclical(table, "day_of_year", YEAR_DAYS)?;
        add_cyclical(table, "weekday", WEEK_DAYS)?;

        let temperature = required(table, "temperature_mean")?;
        let wind_speed = required(table, "wind_speed_mean")?;
        let interaction = temperature
            .iter()
            .zip(&wind_speed)
            .map(|(t, w)| Some((*t)? * (*w)?))
            .collect();
        table.add_column("temp_x_wind", interaction)?;

        let remapped: Vec<i64> = required(table, "wind_direction_mean")?
            .into_iter()
            .map(|v| self.remap_direction(v))
            .collect();
        let encoded = remapped
            .iter()
            .map(|class| self.encoder.encode(*class).map(|pos| pos as f64))
            .collect();
        table.replace_column(
            "wind_direction_mean",
            remapped.iter().map(|class| Some(*class as f64)).collect(),
        )?;
        table.add_column("wind_direction_encoded", encoded)?;

        let lagged: Vec<String> = self.lag_columns(table).map(str::to_string).collect();
        for name in lagged {
            let lag1 = table.shifted(&name, 1)?;
            let lag2 = table.shifted(&name, 2)?;
            table.add_column(format!("{name}_lag1"), lag1)?;
            table.add_column(format!("{name}_lag2"), lag2)?;
        }

        Ok(())
    }
}

fn required(table: &FeatureTable, name: &str) -> Result<Vec<Option<f64>>, FeatureError> {
    table
        .column(name)
        .map(<[Option<f64>]>::to_vec)
        .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))
}

fn add_cyclical(table: &mut FeatureTable, name: &str, period: f64) -> Result<(), FeatureError> {
    let values = required(table, name)?;
    let angle = |v: f64| 2.0 * PI * v / period;
    let sin = values.iter().map(|v| v.map(|v| angle(v).sin())).collect();
    let cos = values.iter().map(|v| v.map(|v| angle(v).cos())).collect();
    table.add_column(format!("{name}_sin"), sin)?;
    table.add_column(format!("{name}_cos"), cos)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyFeatureRecord;
    use chrono::{Duration, NaiveDate};

    struct Classes(Vec<i64>);

    impl CategoryEncoder for Classes {
        fn classes(&self) -> &[i64] {
            &self.0
        }
    }

    fn record(date: NaiveDate, n: f64) -> DailyFeatureRecord {
        DailyFeatureRecord {
            date,
            year: 2024,
            month: 3,
            day: 1,
            weekday: 2,
            week_of_year: 9,
            week_of_month: 1,
            day_of_year: 61,
            is_weekend: false,
            is_holiday: false,
            moon_age: 10.0 + n,
            temperature_mean: Some(15.0 + n),
            temperature_max: Some(18.0),
            temperature_min: Some(12.0),
            temperature_std: Some(1.0),
            temperature_mean_10_13: Some(15.0),
            temperature_mean_14_17: Some(15.0),
            temperature_mean_18_21: Some(15.0),
            temperature_mean_22_0: Some(15.0),
            temperature_mean_1_4: Some(15.0),
            precipitation_sum: Some(0.0),
            precipitation_binary: Some(0.0),
            precipitation_sum_10_13: Some(0.0),
            precipitation_sum_14_17: Some(0.0),
            precipitation_sum_18_21: Some(0.0),
            precipitation_sum_22_0: Some(0.0),
            precipitation_sum_1_4: Some(0.0),
            wind_speed_mean: Some(2.0),
            wind_speed_max: Some(2.0),
            wind_speed_min: Some(2.0),
            wind_speed_std: Some(0.0),
            wind_direction_mean: Some(0.0),
        }
    }

    fn table(rows: usize) -> FeatureTable {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let records: Vec<_> = (0..rows)
            .map(|i| record(start + Duration::days(i as i64), i as f64))
            .collect();
        FeatureTable::from_records(&records)
    }

    fn engineer(features: &[&str]) -> FeatureEngineer {
        FeatureEngineer::new(
            Arc::new(Classes(vec![0, 4, 8, 12])),
            features.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_fallback_is_smallest_of_most_frequent() {
        assert_eq!(most_frequent_class(&[8, 4, 12]), Ok(4));
        assert_eq!(most_frequent_class(&[12, 12, 3, 3, 5]), Ok(3));
        assert_eq!(most_frequent_class(&[7, 9, 9]), Ok(9));
        assert_eq!(most_frequent_class(&[]), Err(FeatureError::EmptyVocabulary));
    }

    #[test]
    fn test_empty_vocabulary_is_rejected() {
        let result = FeatureEngineer::new(Arc::new(Classes(vec![])), vec![]);
        assert!(matches!(result, Err(FeatureError::EmptyVocabulary)));
    }

    #[test]
    fn test_lag_columns() {
        let mut t = table(10);
        let fe = engineer(&["temperature_mean", "moon_age_sin", "year", "weekday_sin", "x_lag1"]);
        fe.engineer(&mut t).unwrap();

        assert_eq!(t.value(2, "temperature_mean_lag1"), t.value(1, "temperature_mean"));
        assert_eq!(t.value(2, "temperature_mean_lag2"), t.value(0, "temperature_mean"));
        assert_eq!(t.value(2, "moon_age_sin_lag1"), t.value(1, "moon_age_sin"));
        assert_eq!(t.value(0, "temperature_mean_lag1"), None);
        assert_eq!(t.value(1, "temperature_mean_lag1"), Some(15.0));
        assert_eq!(t.value(0, "temperature_mean_lag2"), None);
        assert_eq!(t.value(1, "temperature_mean_lag2"), None);

        assert!(!t.has_column("year_lag1"));
        assert!(!t.has_column("weekday_sin_lag1"));
        assert!(!t.has_column("x_lag1_lag1"));
    }

    #[test]
    fn test_missing_lag_base_is_skipped() {
        let mut t = table(3);
        let fe = engineer(&["not_a_column"]);
        fe.engineer(&mut t).unwrap();
        assert!(!t.has_column("not_a_column_lag1"));
    }

    #[test]
    fn test_cyclical_and_interaction_terms() {
        let mut t = table(1);
        engineer(&[]).engineer(&mut t).unwrap();

        let angle = 2.0 * PI * 10.0 / LUNAR_CYCLE_DAYS;
        assert!((t.value(0, "moon_age_sin").unwrap() - angle.sin()).abs() < 1e-12);
        assert!((t.value(0, "moon_age_cos").unwrap() - angle.cos()).abs() < 1e-12);

        let angle = 2.0 * PI * 2.0 / WEEK_DAYS;
        assert!((t.value(0, "weekday_sin").unwrap() - angle.sin()).abs() < 1e-12);
        assert!(t.has_column("day_of_year_cos"));

        assert_eq!(t.value(0, "temp_x_wind"), Some(30.0));
    }

    #[test]
    fn test_engineer_twice_reports_duplicate() {
        let mut t = table(3);
        let fe = engineer(&["temperature_mean"]);
        fe.engineer(&mut t).unwrap();
        assert_eq!(
            fe.engineer(&mut t),
            Err(FeatureError::DuplicateColumn("moon_age_sin".to_string()))
        );
    }

    #[test]
    fn test_unseen_direction_maps_to_fallback() {
        let mut t = table(4);
        t.replace_column(
            "wind_direction_mean",
            vec![Some(8.0), Some(5.0), None, Some(12.0)],
        )
        .unwrap();

        let fe = engineer(&[]);
        assert_eq!(fe.fallback_class(), 0);
        fe.engineer(&mut t).unwrap();

        assert_eq!(
            t.column("wind_direction_mean").unwrap(),
            &[Some(8.0), Some(0.0), Some(0.0), Some(12.0)]
        );
        assert_eq!(
            t.column("wind_direction_encoded").unwrap(),
            &[Some(2.0), Some(0.0), Some(0.0), Some(3.0)]
        );
    }
}
