use crate::minutes::StructuredResult;

/// Render minutes as a markdown document
pub fn render_minutes(result: &StructuredResult) -> String {
    let mut content = String::new();

    let title = result.meeting_title.as_deref().unwrap_or("Meeting Minutes");
    content.push_str(&format!("# {}\n\n", title));
    if let Some(date) = result.meeting_date {
        content.push_str(&format!("- **Date**: {}\n\n", date.format("%Y-%m-%d")));
    }

    if !result.summary_short.is_empty() {
        content.push_str("## Summary\n\n");
        for point in &result.summary_short {
            content.push_str(&format!("- {}\n", point));
        }
        content.push('\n');
    }

    if !result.summary_detailed.trim().is_empty() {
        content.push_str("## Details\n\n");
        content.push_str(result.summary_detailed.trim());
        content.push_str("\n\n");
    }

    if !result.discussion_flow.is_empty() {
        content.push_str("## Discussion Flow\n\n");
        for (i, topic) in result.discussion_flow.iter().enumerate() {
            content.push_str(&format!("{}. {}\n", i + 1, topic));
        }
        content.push('\n');
    }

    if !result.timeline.is_empty() {
        content.push_str("## Timeline\n\n");
        for entry in &result.timeline {
            content.push_str(&format!("- [{}] {}\n", entry.timestamp, entry.topic));
        }
        content.push('\n');
    }

    content.push_str("## Action Items\n\n");
    if result.action_items.is_empty() {
        content.push_str("_No action items._\n\n");
    } else {
        for item in &result.action_items {
            let owner = item.assigned_to.as_deref().unwrap_or("Unassigned");
            let due = item.deadline.as_deref().unwrap_or("no deadline");
            content.push_str(&format!("- [ ] {} - {} - {}\n", item.task, owner, due));
        }
        content.push('\n');
    }

    if !result.speaker_sentiment.is_empty() {
        content.push_str("## Speaker Sentiment\n\n");
        content.push_str("| Speaker | Sentiment |\n|---|---|\n");
        for (speaker, sentiment) in &result.speaker_sentiment {
            content.push_str(&format!("| {} | {} |\n", speaker, sentiment));
        }
        content.push('\n');
    }

    content.trim_end().to_string() + "\n"
}
