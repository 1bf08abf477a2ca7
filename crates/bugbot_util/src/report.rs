use rand::Rng;
use serenity::all::UserId;

/// One bug report, alive from modal submission until the user opens a ticket
/// channel (or the pending entry expires).
#[derive(Debug, Clone)]
pub struct Report {
    pub id: String,
    pub user: UserId,
    pub user_tag: String,
    pub title: String,
    pub description: String,
    pub steps: String,
    pub expected: String,
    pub actual: String,
    pub issue_url: String,
}

pub fn new_report_id() -> String {
    let mut rng = rand::thread_rng();
    format!("BR-{}", rng.gen_range(1000..10000))
}

impl Report {
    pub fn issue_title(&self) -> String {
        format!("[Bug] {}", self.title)
    }

    pub fn issue_body(&self) -> String {
        format!(
            "**Report ID:** {id}\n\
             **Reporter:** {tag} ({user})\n\n\
             ## What happened?\n{description}\n\n\
             ## Steps to reproduce\n{steps}\n\n\
             ## Expected\n{expected}\n\n\
             ## Actual\n{actual}\n",
            id = self.id,
            tag = self.user_tag,
            user = self.user,
            description = self.description,
            steps = or_not_provided(&self.steps),
            expected = or_not_provided(&self.expected),
            actual = or_not_provided(&self.actual),
        )
    }
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not provided)"
    } else {
        value
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_report(id: &str, user: u64) -> Report {
        Report {
            id: id.to_string(),
            user: UserId::new(user),
            user_tag: "reporter#0".to_string(),
            title: "Login crashes".to_string(),
            description: "App crashes on login".to_string(),
            steps: "open app, tap login".to_string(),
            expected: String::new(),
            actual: "Crash screen".to_string(),
            issue_url: String::new(),
        }
    }

    #[test]
    fn report_ids_have_the_expected_format() {
        for _ in 0..50 {
            let id = new_report_id();
            let number = id.strip_prefix("BR-").expect("missing BR- prefix");
            let number: u32 = number.parse().expect("suffix is not a number");
            assert!((1000..10000).contains(&number));
        }
    }

    #[test]
    fn issue_title_is_prefixed() {
        assert_eq!(make_report("BR-1234", 1).issue_title(), "[Bug] Login crashes");
    }

    #[test]
    fn issue_body_substitutes_missing_optional_fields() {
        let body = make_report("BR-1234", 1).issue_body();
        assert!(body.contains("**Report ID:** BR-1234"));
        assert!(body.contains("**Reporter:** reporter#0 (1)"));
        assert!(body.contains("## What happened?\nApp crashes on login"));
        assert!(body.contains("## Steps to reproduce\nopen app, tap login"));
        assert!(body.contains("## Expected\n(not provided)"));
        assert!(body.contains("## Actual\nCrash screen"));
    }

    #[test]
    fn issue_body_never_omits_section_headers() {
        let mut report = make_report("BR-1234", 1);
        report.steps = String::new();
        report.actual = "  ".to_string();
        let body = report.issue_body();
        for header in ["## What happened?", "## Steps to reproduce", "## Expected", "## Actual"] {
            assert!(body.contains(header), "missing header {header}");
        }
        assert_eq!(body.matches("(not provided)").count(), 3);
    }
}
