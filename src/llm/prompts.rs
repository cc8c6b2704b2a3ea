//! Prompt contract for minutes extraction.
//!
//! The rendered document is the whole agreement with the model: JSON shape,
//! action item rules, and the deadline resolution rules it must apply. Output
//! is a pure function of the request so identical requests produce identical
//! bytes.

use chrono::NaiveDate;

use crate::minutes::request::RequestConfig;
use crate::minutes::schema::SchemaVariant;

const SECTION_SEPARATOR: &str = "\n\n";

/// Render the prompt for `request`, deriving the schema variant from it.
pub fn build_prompt(request: &RequestConfig) -> String {
    render_prompt(request, SchemaVariant::for_request(request))
}

pub fn render_prompt(request: &RequestConfig, variant: SchemaVariant) -> String {
    let mut sections = vec![
        "### INSTRUCTIONS ###".to_string(),
        output_format_section(variant),
    ];

    if let Some(title) = request.title() {
        sections.push(format!("Meeting Title: {}", title));
    }
    if let Some(date) = request.meeting_date {
        sections.push(format!("Meeting Date: {} (YYYY-MM-DD)", date.format("%Y-%m-%d")));
    }

    sections.push(rules_section(request, variant));
    sections.push("### TRANSCRIPT ###".to_string());
    sections.push(request.transcript.clone());

    sections.join(SECTION_SEPARATOR)
}

/// JSON skeleton listing only the sections `variant` enables, in schema order
pub fn json_skeleton(variant: SchemaVariant) -> String {
    let mut fields = vec![
        r#"  "summary_short": ["..."]"#,
        r#"  "summary_detailed": "...""#,
        r#"  "discussion_flow": ["..."]"#,
    ];
    if variant.timeline {
        fields.push(r#"  "timeline": [{ "timestamp": "MM:SS", "topic": "..." }]"#);
    }
    fields.push(
        r#"  "action_items": [{ "task": "...", "assigned_to": "...|null", "deadline": "YYYY-MM-DD|null" }]"#,
    );
    if variant.sentiment {
        fields.push(r#"  "speaker_sentiment": { "Speaker Name": "positive|neutral|negative" }"#);
    }

    format!("{{\n{}\n}}", fields.join(",\n"))
}

fn output_format_section(variant: SchemaVariant) -> String {
    format!(
        "You are an assistant that MUST produce ONLY valid JSON and nothing else.\n\
         The input transcript is a real meeting transcript.\n\
         Produce exactly the following JSON structure (every field must exist; empty values are allowed):\n\
         {}\n\
         For \"summary_short\", give concise bullet points.\n\
         For \"summary_detailed\", write a detailed summary in 2-3 separate paragraphs.\n\
         For \"discussion_flow\", list the topics in the order they were discussed.",
        json_skeleton(variant)
    )
}

fn rules_section(request: &RequestConfig, variant: SchemaVariant) -> String {
    let mut rules: Vec<String> = Vec::new();

    rules.push(speaker_rule(request.include_speakers).to_string());
    rules.extend(ACTION_ITEM_RULES.iter().map(|r| r.to_string()));

    match request.meeting_date {
        Some(date) => rules.extend(deadline_rules(date)),
        None => rules.push(NO_DATE_DEADLINE_RULE.to_string()),
    }

    if variant.timeline {
        rules.push(TIMELINE_RULE.to_string());
    }
    if variant.sentiment {
        rules.push(SENTIMENT_RULE.to_string());
    }

    rules.push(format!(
        "Write all text values in {}; keep speaker names exactly as they appear.",
        request.language.trim()
    ));
    rules.push(CLOSING_RULE.to_string());

    rules.join("\n")
}

fn speaker_rule(include_speakers: bool) -> &'static str {
    if include_speakers {
        "Preserve and use speaker labels exactly as written in the transcript (e.g., 'Alice:', 'Bob:')."
    } else {
        "Ignore speaker labels; do not attribute statements to individual speakers."
    }
}

const ACTION_ITEM_RULES: [&str; 5] = [
    "Extract only clear, actionable tasks that contain an explicit verb (e.g., add, update, deploy, fix).",
    "Each action item MUST represent exactly one unique task.",
    "Do NOT split a single commitment into several tasks unless they are clearly different.",
    "Merge overlapping or duplicate tasks into a single action item.",
    "If ownership is stated, fill 'assigned_to'. Otherwise set 'assigned_to' to null.",
];

const NO_DATE_DEADLINE_RULE: &str = "No meeting date is known. Only extract deadlines that are stated as explicit absolute dates. \
Do NOT infer or resolve relative phrases such as 'tomorrow' or weekday names. \
Output deadlines as YYYY-MM-DD; if unclear, set deadline to null.";

const TIMELINE_RULE: &str = "Build 'timeline' only from timestamps that appear in the transcript. \
Do NOT invent timestamps. If the cues are unreliable, return an empty array.";

const SENTIMENT_RULE: &str = "For each speaker who speaks at least once, classify their overall sentiment \
as exactly one of: positive, neutral, negative.";

const CLOSING_RULE: &str = "Return ONLY the JSON object. Do not include markdown, code fences, explanations, \
or any text outside the JSON object.";

fn deadline_rules(meeting_date: NaiveDate) -> Vec<String> {
    let date = meeting_date.format("%Y-%m-%d");
    let weekday = meeting_date.format("%A");

    vec![
        "Compute all deadlines relative to the meeting date.".to_string(),
        format!(
            "Treat the meeting date as {} (YYYY-MM-DD), which is a {}.",
            date, weekday
        ),
        format!(
            "WEEKDAY RESOLUTION (STRICT, NO EXCEPTIONS): if a weekday name is mentioned WITHOUT the word 'next' \
             (e.g., '{weekday}', 'by {weekday}', '{weekday} morning') and it is the same weekday as the meeting date, \
             the deadline is the MEETING DATE itself ({date}). Do NOT move it to the next day or the next week."
        ),
        "If a weekday name is mentioned WITHOUT 'next' and that weekday falls later in the SAME calendar week \
         as the meeting date, use that date in the current week."
            .to_string(),
        "If the phrase 'next <weekday>' is used explicitly (e.g., 'next Friday'), resolve it to that weekday \
         in the FOLLOWING calendar week."
            .to_string(),
        "'tomorrow' means the meeting date + 1 day.".to_string(),
        "'day after tomorrow' means the meeting date + 2 days.".to_string(),
        "Convert absolute dates in any format (e.g., '18/12/2025', 'December 18, 2025') to strict YYYY-MM-DD."
            .to_string(),
        format!("Deadlines must NEVER be earlier than the meeting date ({}).", date),
        "If resolving a deadline would place it before the meeting date, use the meeting date instead."
            .to_string(),
        "If several deadlines are mentioned for the same task, choose the earliest explicit one.".to_string(),
        "If no explicit or clearly resolvable deadline exists, set deadline to null. Do NOT guess or invent deadlines."
            .to_string(),
        "Always output deadlines in strict YYYY-MM-DD format.".to_string(),
    ]
}
