//! Response aggregation for dashboards and analysis.
//!
//! All functions are pure over already-loaded records.

use serde::Serialize;

use crate::models::{Survey, SurveyResponse};

const SECONDS_PER_DAY: i64 = 86_400;

/// Count of one option within a question.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
}

/// Tally for one question, options in survey order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionTally {
    pub question: String,
    pub answered: usize,
    pub options: Vec<OptionCount>,
    /// Answers naming an option the question does not list
    pub other: usize,
}

/// Response volume figures.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseMetrics {
    pub total: usize,
    pub today: usize,
    pub this_week: usize,
    pub avg_per_day: f64,
}

/// Everything the dashboard shows for one survey.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SurveySummary {
    pub survey_id: String,
    pub title: String,
    pub metrics: ResponseMetrics,
    pub questions: Vec<QuestionTally>,
}

impl SurveySummary {
    pub fn build(survey: &Survey, responses: &[SurveyResponse], now: i64) -> Self {
        Self {
            survey_id: survey.id.clone(),
            title: survey.title.clone(),
            metrics: metrics(responses, now),
            questions: tally(survey, responses),
        }
    }
}

/// Count answers per option for every question of the survey.
///
/// Answers keyed by text that is not a question of the survey are ignored.
pub fn tally(survey: &Survey, responses: &[SurveyResponse]) -> Vec<QuestionTally> {
    survey
        .questions
        .iter()
        .map(|question| {
            let mut options: Vec<OptionCount> = question
                .options
                .iter()
                .map(|option| OptionCount {
                    option: option.clone(),
                    count: 0,
                })
                .collect();
            let mut answered = 0;
            let mut other = 0;

            for answer in responses
                .iter()
                .filter_map(|r| r.answers.get(&question.text))
            {
                answered += 1;
                match options.iter_mut().find(|o| &o.option == answer) {
                    Some(slot) => slot.count += 1,
                    None => other += 1,
                }
            }

            QuestionTally {
                question: question.text.clone(),
                answered,
                options,
                other,
            }
        })
        .collect()
}

/// Volume metrics relative to `now` (Unix seconds, UTC days).
pub fn metrics(responses: &[SurveyResponse], now: i64) -> ResponseMetrics {
    let today_start = now - now.rem_euclid(SECONDS_PER_DAY);
    let week_start = now - 7 * SECONDS_PER_DAY;

    let today = responses
        .iter()
        .filter(|r| r.submitted_at >= today_start)
        .count();
    let recent: Vec<i64> = responses
        .iter()
        .map(|r| r.submitted_at)
        .filter(|ts| *ts >= week_start)
        .collect();

    let mut days: Vec<i64> = recent
        .iter()
        .map(|ts| ts.div_euclid(SECONDS_PER_DAY))
        .collect();
    days.sort_unstable();
    days.dedup();

    let avg = recent.len() as f64 / days.len().max(1) as f64;

    ResponseMetrics {
        total: responses.len(),
        today,
        this_week: recent.len(),
        avg_per_day: (avg * 10.0).round() / 10.0,
    }
}

/// One JSON line per response, the input for aggregated analysis.
pub fn aggregate_text(responses: &[SurveyResponse]) -> String {
    responses
        .iter()
        .filter_map(|r| serde_json::to_string(&r.answers).ok())
        .collect::<Vec<_>>()
        .join("\n")
}
