use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use coursework_analytics::config::{
    CompletionGrouping, CourseCompletionParams, MissingGrouping, MissingHomeworksParams,
    TeacherWorkloadParams, WorkloadOrder, DEFAULT_COMPLETION_THRESHOLD, DEFAULT_DECIMALS,
    DEFAULT_PASS_THRESHOLD, MAX_DECIMALS,
};
use coursework_analytics::{db, render, run_report, sample, Dataset, ReportConfig, ReportRequest};

#[derive(Parser)]
#[command(name = "coursework-analytics")]
#[command(about = "Course, homework and teacher analytics for the online education platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

/// Where the snapshot comes from. Postgres (`DATABASE_URL`) when none is given.
#[derive(Args)]
#[group(id = "source", multiple = false)]
struct SourceArgs {
    /// JSON snapshot file
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Directory with one CSV file per entity
    #[arg(long)]
    csv_dir: Option<PathBuf>,
    /// Use the built-in demo snapshot
    #[arg(long)]
    sample: bool,
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Write to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_PASS_THRESHOLD)]
    pass_threshold: f64,
    #[arg(long, default_value_t = DEFAULT_COMPLETION_THRESHOLD)]
    completion_threshold: f64,
    #[arg(long, default_value_t = DEFAULT_DECIMALS,
          value_parser = clap::value_parser!(u32).range(..=MAX_DECIMALS as i64))]
    decimals: u32,
    /// Keep full precision on rates and averages
    #[arg(long, conflicts_with = "decimals")]
    no_rounding: bool,
}

impl OutputArgs {
    fn config(&self) -> ReportConfig {
        ReportConfig {
            pass_threshold: self.pass_threshold,
            completion_threshold: self.completion_threshold,
            decimals: (!self.no_rounding).then_some(self.decimals),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load the demo snapshot into Postgres
    Seed,
    /// Students with homeworks they never submitted
    MissingHomeworks {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value_t = 0)]
        min_missing: usize,
        /// Keep students with nothing missing
        #[arg(long)]
        include_all: bool,
        /// One row per student instead of per enrollment
        #[arg(long)]
        per_student: bool,
    },
    /// Completion rate per course
    CourseCompletion {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// One row per enrollment with lesson detail
        #[arg(long)]
        per_enrollment: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Review and pass rates per homework
    HomeworkReviews {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Courses, students and pending reviews per teacher
    TeacherWorkload {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Sort by courses taught instead of pending reviews
        #[arg(long)]
        by_courses: bool,
    },
    /// Full statistics for one course
    CourseAnalytics {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long)]
        course_id: String,
    },
    /// Statistics for every course, most enrolled first
    CourseOverview {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set when no --snapshot, --csv-dir or --sample is given")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn load(source: &SourceArgs) -> anyhow::Result<Dataset> {
    if let Some(path) = &source.snapshot {
        return Dataset::from_json_path(path);
    }
    if let Some(dir) = &source.csv_dir {
        return Dataset::from_csv_dir(dir);
    }
    if source.sample {
        return Ok(sample::sample_dataset());
    }
    let pool = connect().await?;
    db::fetch_dataset(&pool).await
}

async fn report(source: &SourceArgs, output: &OutputArgs, request: ReportRequest) -> anyhow::Result<()> {
    let dataset = load(source).await?;
    let envelope = run_report(&dataset, &request, &output.config())
        .with_context(|| format!("{} report failed", request.name()))?;

    let rendered = match output.format {
        Format::Json => serde_json::to_string_pretty(&envelope)?,
        Format::Markdown => render::markdown(&envelope),
    };

    match &output.out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::MissingHomeworks {
            source,
            output,
            min_missing,
            include_all,
            per_student,
        } => {
            let grouping = if per_student {
                MissingGrouping::PerStudent
            } else {
                MissingGrouping::PerEnrollment
            };
            let request = ReportRequest::MissingHomeworks(MissingHomeworksParams {
                min_missing,
                include_all,
                grouping,
            });
            report(&source, &output, request).await?;
        }
        Commands::CourseCompletion {
            source,
            output,
            per_enrollment,
            limit,
        } => {
            let grouping = if per_enrollment {
                CompletionGrouping::PerEnrollment
            } else {
                CompletionGrouping::PerCourse
            };
            let request = ReportRequest::CourseCompletion(CourseCompletionParams { grouping, limit });
            report(&source, &output, request).await?;
        }
        Commands::HomeworkReviews { source, output } => {
            report(&source, &output, ReportRequest::HomeworkReviewStats).await?;
        }
        Commands::TeacherWorkload {
            source,
            output,
            by_courses,
        } => {
            let order = if by_courses {
                WorkloadOrder::CoursesTaught
            } else {
                WorkloadOrder::PendingReviews
            };
            let request = ReportRequest::TeacherWorkload(TeacherWorkloadParams { order });
            report(&source, &output, request).await?;
        }
        Commands::CourseAnalytics {
            source,
            output,
            course_id,
        } => {
            let request = ReportRequest::CourseAnalytics {
                course_id: Some(course_id),
            };
            report(&source, &output, request).await?;
        }
        Commands::CourseOverview { source, output } => {
            report(&source, &output, ReportRequest::CourseOverview).await?;
        }
    }

    Ok(())
}
