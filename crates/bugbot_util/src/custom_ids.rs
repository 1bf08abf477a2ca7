//! Custom ids shared between the panel message, the modal and the button
//! handlers. The chat button carries the report id behind a separator.

pub const OPEN_MODAL_BUTTON: &str = "bug_open_modal";
pub const REPORT_MODAL: &str = "bug_modal_submit";
pub const OPEN_CHAT_BUTTON: &str = "bug_chat_start";
pub const CLOSE_TICKET_BUTTON: &str = "bug_close_ticket";

const SEPARATOR: char = ':';

pub fn open_chat_button_id(report_id: &str) -> String {
    format!("{OPEN_CHAT_BUTTON}{SEPARATOR}{report_id}")
}

pub fn parse_open_chat_button_id(custom_id: &str) -> Option<&str> {
    custom_id.strip_prefix(OPEN_CHAT_BUTTON)?.strip_prefix(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_button_id_roundtrips_the_report_id() {
        let id = open_chat_button_id("BR-1234");
        assert_eq!(id, "bug_chat_start:BR-1234");
        assert_eq!(parse_open_chat_button_id(&id), Some("BR-1234"));
    }

    #[test]
    fn other_custom_ids_do_not_parse_as_chat_buttons() {
        assert_eq!(parse_open_chat_button_id(CLOSE_TICKET_BUTTON), None);
        assert_eq!(parse_open_chat_button_id("bug_chat_start"), None);
    }
}
