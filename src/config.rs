use serde::{Deserialize, Serialize};

pub const DEFAULT_PASS_THRESHOLD: f64 = 70.0;
pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 100.0;
pub const DEFAULT_DECIMALS: u32 = 2;
/// More places than an f64 can carry; larger requests are clamped.
pub const MAX_DECIMALS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// A reviewed submission passes when its grade is at least this value.
    pub pass_threshold: f64,
    /// A lesson counts as completed when progress reaches this percentage.
    pub completion_threshold: f64,
    /// Decimal places kept on rates and averages. `None` leaves them unrounded.
    pub decimals: Option<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            decimals: Some(DEFAULT_DECIMALS),
        }
    }
}

impl ReportConfig {
    pub fn round(&self, value: f64) -> f64 {
        match self.decimals {
            Some(decimals) => {
                let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
                (value * factor).round() / factor
            }
            None => value,
        }
    }

    /// `numerator / denominator * 100`, or 0 when the denominator is 0.
    pub fn percent(&self, numerator: usize, denominator: usize) -> f64 {
        if denominator == 0 {
            return 0.0;
        }
        self.round(numerator as f64 / denominator as f64 * 100.0)
    }

    /// `total / count`, or 0 when the count is 0.
    pub fn average(&self, total: f64, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.round(total / count as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingGrouping {
    #[default]
    PerEnrollment,
    /// Summed across the student's distinct enrolled courses.
    PerStudent,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissingHomeworksParams {
    /// Rows are kept when `missing > min_missing`.
    pub min_missing: usize,
    /// Keep every row regardless of `min_missing`.
    pub include_all: bool,
    pub grouping: MissingGrouping,
}

impl MissingHomeworksParams {
    pub fn keeps(&self, missing: usize) -> bool {
        self.include_all || missing > self.min_missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionGrouping {
    #[default]
    PerCourse,
    PerEnrollment,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseCompletionParams {
    pub grouping: CompletionGrouping,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkloadOrder {
    #[default]
    PendingReviews,
    CoursesTaught,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherWorkloadParams {
    pub order: WorkloadOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_thresholds() {
        let config = ReportConfig::default();
        assert_eq!(config.pass_threshold, 70.0);
        assert_eq!(config.completion_threshold, 100.0);
        assert_eq!(config.decimals, Some(2));
    }

    #[test]
    fn zero_denominators_yield_zero() {
        let config = ReportConfig::default();
        assert_eq!(config.percent(3, 0), 0.0);
        assert_eq!(config.average(12.5, 0), 0.0);
    }

    #[test]
    fn rounding_is_optional() {
        let rounded = ReportConfig::default();
        assert_eq!(rounded.percent(1, 3), 33.33);

        let raw = ReportConfig {
            decimals: None,
            ..ReportConfig::default()
        };
        assert!((raw.percent(1, 3) - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn oversized_precision_is_clamped() {
        let wide = ReportConfig {
            decimals: Some(400),
            ..ReportConfig::default()
        };
        assert_eq!(wide.percent(1, 2), 50.0);
        assert_eq!(wide.average(0.0, 1), 0.0);
        assert!(wide.percent(1, 3).is_finite());

        let parsed: ReportConfig = serde_json::from_str(r#"{"decimals": 4000000000}"#).unwrap();
        assert!((parsed.percent(1, 3) - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(parsed.average(7.0, 2), 3.5);
    }

    #[test]
    fn missing_threshold_variants() {
        let strict = MissingHomeworksParams::default();
        assert!(!strict.keeps(0));
        assert!(strict.keeps(1));

        let two = MissingHomeworksParams {
            min_missing: 2,
            ..Default::default()
        };
        assert!(!two.keeps(2));
        assert!(two.keeps(3));

        let all = MissingHomeworksParams {
            include_all: true,
            ..Default::default()
        };
        assert!(all.keeps(0));
    }

    #[test]
    fn params_deserialize_from_camel_case() {
        let params: MissingHomeworksParams =
            serde_json::from_str(r#"{"minMissing": 2, "grouping": "perStudent"}"#).unwrap();
        assert_eq!(params.min_missing, 2);
        assert_eq!(params.grouping, MissingGrouping::PerStudent);
        assert!(!params.include_all);
    }
}
