//! HTML response form for a survey.

use crate::models::{Question, Survey};

/// Render the public response form for a survey.
///
/// Radio groups are named by question index; the script maps them back to
/// the question text before posting `{"responses": {...}}`.
pub fn survey_form(survey: &Survey) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("  <title>{}</title>\n", escape_html(&survey.title)));
    html.push_str(STYLES);
    html.push_str("</head>\n<body>\n<div class=\"sage-container\">\n");

    html.push_str("  <div id=\"sage-survey\">\n");
    html.push_str(&format!("    <h1>{}</h1>\n", escape_html(&survey.title)));
    if !survey.description.is_empty() {
        html.push_str(&format!(
            "    <p class=\"sage-description\">{}</p>\n",
            escape_html(&survey.description)
        ));
    }
    html.push_str("    <form id=\"sage-form\">\n");
    for (index, question) in survey.questions.iter().enumerate() {
        html.push_str(&question_block(index, question));
    }
    html.push_str("      <button type=\"submit\">Submit Response</button>\n");
    html.push_str("    </form>\n  </div>\n");
    html.push_str(
        "  <div id=\"sage-thanks\" class=\"sage-thanks\">Thank you for your response!</div>\n",
    );
    html.push_str("</div>\n");

    html.push_str(&submit_script(survey));
    html.push_str("</body>\n</html>\n");
    html
}

/// Page served for an unknown survey identity.
pub fn not_found_page() -> String {
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\"><title>Survey not found</title></head>\n<body><h1>404: Survey not found</h1></body>\n</html>\n".to_string()
}

fn question_block(index: usize, question: &Question) -> String {
    let mut html = String::new();
    html.push_str("      <fieldset class=\"sage-question\">\n");
    html.push_str(&format!(
        "        <legend>{}</legend>\n",
        escape_html(&question.text)
    ));
    for (option_index, option) in question.options.iter().enumerate() {
        let input_id = format!("q{index}-o{option_index}");
        html.push_str(&format!(
            "        <label class=\"sage-option\" for=\"{input_id}\"><input type=\"radio\" id=\"{input_id}\" name=\"q{index}\" value=\"{}\" required><span>{}</span></label>\n",
            escape_html(option),
            escape_html(option)
        ));
    }
    html.push_str("      </fieldset>\n");
    html
}

fn submit_script(survey: &Survey) -> String {
    let questions: Vec<&str> = survey.questions.iter().map(|q| q.text.as_str()).collect();
    let questions_json = script_json(&serde_json::to_string(&questions).unwrap_or_else(|_| "[]".into()));
    let endpoint = script_json(
        &serde_json::to_string(&format!("/api/surveys/{}/responses", survey.id))
            .unwrap_or_else(|_| "\"\"".into()),
    );

    format!(
        r#"<script>
  const questions = {questions_json};
  const endpoint = {endpoint};
  document.getElementById('sage-form').addEventListener('submit', function (event) {{
    event.preventDefault();
    const data = new FormData(this);
    const responses = {{}};
    questions.forEach(function (text, index) {{
      const value = data.get('q' + index);
      if (value !== null) {{ responses[text] = value; }}
    }});
    fetch(endpoint, {{
      method: 'POST',
      headers: {{ 'Content-Type': 'application/json' }},
      body: JSON.stringify({{ responses: responses }})
    }})
      .then(function (res) {{ return res.json(); }})
      .then(function (body) {{
        if (body.success) {{
          document.getElementById('sage-survey').style.display = 'none';
          document.getElementById('sage-thanks').style.display = 'block';
        }} else {{
          alert('Error submitting response. Please try again.');
        }}
      }})
      .catch(function () {{ alert('A network error occurred.'); }});
  }});
</script>
"#
    )
}

/// Make a JSON literal safe to embed inside a `<script>` element.
fn script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = r#"  <style>
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f4f7f6; color: #333; margin: 0; padding: 2rem; }
    .sage-container { max-width: 700px; margin: 0 auto; background: #fff; padding: 2.5rem; border-radius: 12px; box-shadow: 0 6px 25px rgba(0,0,0,0.1); }
    h1 { color: #2c3e50; text-align: center; margin-top: 0; }
    .sage-description { color: #555; text-align: center; margin-bottom: 2rem; }
    .sage-question { border: none; margin: 0 0 2rem; padding: 0; }
    .sage-question legend { font-weight: 600; margin-bottom: 1rem; font-size: 1.1rem; }
    .sage-option { display: flex; align-items: center; gap: 0.8rem; padding: 0.9rem; margin-bottom: 0.6rem; border: 1px solid #ddd; border-radius: 8px; cursor: pointer; }
    .sage-option:hover { background: #f8f9fa; border-color: #667eea; }
    button { width: 100%; padding: 1rem; background: #667eea; color: #fff; border: none; border-radius: 8px; font-size: 1.1rem; cursor: pointer; }
    .sage-thanks { display: none; text-align: center; padding: 3rem 1rem; font-size: 1.6rem; color: #28a745; }
  </style>
"#;
