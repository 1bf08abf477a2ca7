use poise::serenity_prelude::Mentionable;
use serenity::all::Timestamp;
use serenity::builder::{CreateEmbed, CreateEmbedFooter};

use crate::extensions::CreateEmbedExt;
use crate::report::Report;
use crate::util::ellipsis_text;

const COLOR_SUCCESS: u32 = 0xb8bb26;
const COLOR_ERROR: u32 = 0xfb4934;

pub fn base_embed() -> CreateEmbed {
    CreateEmbed::default().timestamp(Timestamp::now()).footer(CreateEmbedFooter::new("\u{200b}"))
}

pub fn make_success_embed(text: &str) -> CreateEmbed {
    CreateEmbed::default().description(text).color(COLOR_SUCCESS)
}

pub fn make_error_embed(text: &str) -> CreateEmbed {
    CreateEmbed::default().description(text).color(COLOR_ERROR)
}

/// The summary embed posted to the staff log channel and into ticket channels.
pub fn bug_report_embed(report: &Report) -> CreateEmbed {
    let description = if report.description.trim().is_empty() {
        "(no description)"
    } else {
        report.description.as_str()
    };
    base_embed()
        .title(ellipsis_text(&format!("🐛 Bug {}: {}", report.id, report.title), 256))
        .description(ellipsis_text(description, 4096))
        .field("Reporter", format!("{} ({})", report.user.mention(), report.user), false)
        .field("GitHub Issue", report.issue_url.clone(), false)
        .field_opt("Steps to Reproduce", clipped_field(&report.steps), false)
        .field_opt("Expected", clipped_field(&report.expected), false)
        .field_opt("Actual", clipped_field(&report.actual), false)
}

fn clipped_field(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(ellipsis_text(value, 1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::make_report;

    fn field_names(embed: &CreateEmbed) -> Vec<String> {
        let json = serde_json::to_value(embed).unwrap();
        json["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|field| field["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn bug_report_embed_skips_empty_optional_sections() {
        let mut report = make_report("BR-1234", 7);
        report.issue_url = "https://github.com/acme/webapp/issues/1".to_string();
        let embed = bug_report_embed(&report);

        // `expected` is empty in the fixture, so that field must be absent.
        assert_eq!(
            field_names(&embed),
            vec!["Reporter", "GitHub Issue", "Steps to Reproduce", "Actual"]
        );

        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["title"], "🐛 Bug BR-1234: Login crashes");
        assert_eq!(json["description"], "App crashes on login");
        assert_eq!(json["fields"][1]["value"], "https://github.com/acme/webapp/issues/1");
    }

    #[test]
    fn bug_report_embed_truncates_the_title() {
        let mut report = make_report("BR-1234", 7);
        report.title = "x".repeat(500);
        let embed = bug_report_embed(&report);
        let json = serde_json::to_value(&embed).unwrap();
        let title = json["title"].as_str().unwrap();
        assert!(title.chars().count() <= 256);
        assert!(title.ends_with("..."));
    }
}
