use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{
    CompletionGrouping, CourseCompletionParams, MissingHomeworksParams, ReportConfig,
    TeacherWorkloadParams,
};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::index::DatasetIndex;
use crate::models::{
    CourseAnalytics, CourseCompletionRow, EnrollmentCompletionRow, HomeworkReviewRow,
    MissingHomeworkRow, TeacherWorkloadRow,
};

pub mod analytics;
pub mod completion;
pub mod missing;
pub mod reviews;
pub mod workload;

#[cfg(test)]
pub(crate) mod fixtures;

pub use analytics::{course_analytics, course_overview};
pub use completion::{course_completion, enrollment_completion};
pub use missing::missing_homeworks;
pub use reviews::homework_review_stats;
pub use workload::teacher_workload;

/// Which report to compute and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "camelCase")]
pub enum ReportRequest {
    MissingHomeworks(MissingHomeworksParams),
    CourseCompletion(CourseCompletionParams),
    HomeworkReviewStats,
    TeacherWorkload(TeacherWorkloadParams),
    CourseAnalytics {
        #[serde(default, rename = "courseId")]
        course_id: Option<String>,
    },
    CourseOverview,
}

impl ReportRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingHomeworks(_) => "missingHomeworks",
            Self::CourseCompletion(_) => "courseCompletion",
            Self::HomeworkReviewStats => "homeworkReviewStats",
            Self::TeacherWorkload(_) => "teacherWorkload",
            Self::CourseAnalytics { .. } => "courseAnalytics",
            Self::CourseOverview => "courseOverview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    MissingHomeworks(Vec<MissingHomeworkRow>),
    CourseCompletion(Vec<CourseCompletionRow>),
    EnrollmentCompletion(Vec<EnrollmentCompletionRow>),
    HomeworkReviews(Vec<HomeworkReviewRow>),
    TeacherWorkload(Vec<TeacherWorkloadRow>),
    CourseOverview(Vec<CourseAnalytics>),
    CourseAnalytics(Box<CourseAnalytics>),
}

impl ReportData {
    pub fn len(&self) -> usize {
        match self {
            Self::MissingHomeworks(rows) => rows.len(),
            Self::CourseCompletion(rows) => rows.len(),
            Self::EnrollmentCompletion(rows) => rows.len(),
            Self::HomeworkReviews(rows) => rows.len(),
            Self::TeacherWorkload(rows) => rows.len(),
            Self::CourseOverview(rows) => rows.len(),
            Self::CourseAnalytics(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A computed report. Everything except `generated_at` is a pure function of
/// the snapshot, the request and the config.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    pub status: &'static str,
    pub report: &'static str,
    pub total: usize,
    pub summary: BTreeMap<&'static str, f64>,
    pub data: ReportData,
    pub generated_at: DateTime<Utc>,
}

fn mean(values: impl Iterator<Item = f64>, config: &ReportConfig) -> f64 {
    let (sum, count) = values.fold((0.0, 0), |(sum, count), value| (sum + value, count + 1));
    config.average(sum, count)
}

fn summarize(data: &ReportData, config: &ReportConfig) -> BTreeMap<&'static str, f64> {
    let mut summary = BTreeMap::new();
    match data {
        ReportData::MissingHomeworks(rows) => {
            let total: usize = rows.iter().map(|r| r.missing_submissions).sum();
            summary.insert("totalMissing", total as f64);
        }
        ReportData::CourseCompletion(rows) => {
            summary.insert("averageCompletion", mean(rows.iter().map(|r| r.completion_rate), config));
        }
        ReportData::EnrollmentCompletion(rows) => {
            summary.insert(
                "averageCompletion",
                mean(rows.iter().map(|r| r.completion_percentage), config),
            );
        }
        ReportData::HomeworkReviews(rows) => {
            summary.insert("averagePassRate", mean(rows.iter().map(|r| r.pass_rate), config));
        }
        ReportData::TeacherWorkload(rows) => {
            let total: usize = rows.iter().map(|r| r.pending_reviews).sum();
            summary.insert("totalPendingReviews", total as f64);
        }
        ReportData::CourseOverview(rows) => {
            summary.insert(
                "averageEnrollment",
                mean(rows.iter().map(|r| r.statistics.enrolled_students as f64), config),
            );
        }
        ReportData::CourseAnalytics(_) => {}
    }
    summary
}

/// Computes `request` over an indexed snapshot. Fails as a whole; there is no partial output.
pub fn compute(index: &DatasetIndex, request: &ReportRequest, config: &ReportConfig) -> Result<ReportData> {
    let data = match request {
        ReportRequest::MissingHomeworks(params) => {
            ReportData::MissingHomeworks(missing_homeworks(index, params, config)?)
        }
        ReportRequest::CourseCompletion(params) => match params.grouping {
            CompletionGrouping::PerCourse => {
                let mut rows = course_completion(index, config)?;
                if let Some(limit) = params.limit {
                    rows.truncate(limit);
                }
                ReportData::CourseCompletion(rows)
            }
            CompletionGrouping::PerEnrollment => {
                ReportData::EnrollmentCompletion(enrollment_completion(index, params, config)?)
            }
        },
        ReportRequest::HomeworkReviewStats => ReportData::HomeworkReviews(homework_review_stats(index, config)?),
        ReportRequest::TeacherWorkload(params) => {
            ReportData::TeacherWorkload(teacher_workload(index, params, config)?)
        }
        ReportRequest::CourseAnalytics { course_id } => {
            ReportData::CourseAnalytics(Box::new(course_analytics(index, course_id.as_deref(), config)?))
        }
        ReportRequest::CourseOverview => ReportData::CourseOverview(course_overview(index, config)?),
    };
    Ok(data)
}

/// Indexes `dataset`, computes the report and wraps it in an envelope.
pub fn run_report(dataset: &Dataset, request: &ReportRequest, config: &ReportConfig) -> Result<ReportEnvelope> {
    let index = DatasetIndex::build(dataset)?;
    let data = compute(&index, request, config)?;

    if data.is_empty() {
        tracing::warn!(report = request.name(), "report produced no rows");
    }
    tracing::info!(report = request.name(), rows = data.len(), "report computed");

    Ok(ReportEnvelope {
        status: "success",
        report: request.name(),
        total: data.len(),
        summary: summarize(&data, config),
        data,
        generated_at: Utc::now(),
    })
}
