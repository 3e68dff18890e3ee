use crate::selection::{BasicInfo, SelectionState};
use chrono::Local;
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

static SUMMARY_TEMPLATE: &str = include_str!("summary.txt");

static JINJA_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("summary.txt", SUMMARY_TEMPLATE)
        .expect("Failed to compile the submission summary template");
    env
});

/// The payload handed to the submission collaborator when the wizard finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub basic_info: BasicInfo,
    pub destinations: Vec<String>,
    pub region_sub_selections: BTreeMap<String, Vec<String>>,
    pub experiences: Vec<String>,
}

impl From<SelectionState> for Submission {
    fn from(state: SelectionState) -> Self {
        Self {
            basic_info: state.basic_info,
            destinations: state.destinations,
            region_sub_selections: state.region_sub_selections,
            experiences: state.experiences,
        }
    }
}

impl Submission {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Receives the finished trip request. Delivery is up to the implementation.
pub trait Submitter {
    fn submit(&mut self, submission: &Submission) -> anyhow::Result<()>;
}

/// Writes the submission to the log, as JSON plus a readable summary.
#[derive(Debug, Default)]
pub struct LogSubmitter;

impl Submitter for LogSubmitter {
    fn submit(&mut self, submission: &Submission) -> anyhow::Result<()> {
        let submitted_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let summary = render_summary(submission, &submitted_at)?;
        log::info!("Trip request submitted: {}", submission.to_json());
        for line in summary.lines() {
            log::info!("{}", line);
        }
        Ok(())
    }
}

pub fn render_summary(submission: &Submission, submitted_at: &str) -> Result<String, minijinja::Error> {
    let tmpl = JINJA_ENV.get_template("summary.txt")?;
    tmpl.render(minijinja::context! {
        submission => minijinja::Value::from_serialize(submission),
        submitted_at => submitted_at,
    })
}
