//! Prompt templates sent to the completion service.

const SURVEY_CREATION: &str = r#"You design concise multiple-choice surveys.
Answer with a single JSON object and nothing else, shaped like:
{
  "title": "Survey title",
  "description": "One sentence on what the survey is for.",
  "questions": [
    { "question": "Question text?", "options": ["Option A", "Option B", "Option C"] }
  ]
}
Write 5 to 7 questions, each with 3 to 5 distinct options. Never repeat a question.
Request: "#;

const SURVEY_ANALYSIS: &str = r#"You analyse survey results.
Each line below is one respondent's answers as a JSON object of question -> chosen option.
Answer with a single JSON object and nothing else, shaped like:
{
  "overall_sentiment": "positive | negative | mixed | neutral",
  "key_insights": ["..."],
  "recommendations": ["..."],
  "priority_areas": ["..."]
}
Responses:
"#;

const INDIVIDUAL_ANALYSIS: &str = r#"You analyse a single piece of written feedback.
Answer with a single JSON object and nothing else, shaped like:
{
  "sentiment": "positive | negative | neutral",
  "themes": ["..."],
  "feedback": "Short actionable takeaway.",
  "full_analysis": "Reasoning behind the assessment."
}
Feedback: "#;

pub fn survey_creation(request: &str) -> String {
    format!("{}{}", SURVEY_CREATION, request.trim())
}

pub fn survey_analysis(aggregated: &str) -> String {
    format!("{}{}", SURVEY_ANALYSIS, aggregated)
}

pub fn individual_analysis(text: &str) -> String {
    format!("{}{}", INDIVIDUAL_ANALYSIS, text.trim())
}
