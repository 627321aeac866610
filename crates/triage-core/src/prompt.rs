//! The fixed classifier instruction shared by every provider adapter.

/// Upper bound on generated tokens for a classification reply.
pub const MAX_OUTPUT_TOKENS: u32 = 200;

/// System instruction: allowed categories, required output shape, and one
/// worked example.
pub const SYSTEM_PROMPT: &str = "\
You are a support ticket classifier.
Analyze the ticket and return a JSON response with these keys: category, confidence, explanation.
Allowed categories: Network, Billing, Hardware, Software, Account, Other.
Return only valid JSON, nothing else.
Example:
Ticket: \"Router light blinking red, no internet\"
Response: {\"category\": \"Network\", \"confidence\": 0.91, \"explanation\": \"Network connectivity failure\"}
";

/// The user turn sent alongside [`SYSTEM_PROMPT`].
pub fn user_turn(ticket_text: &str) -> String { format!("Ticket: {ticket_text}") }

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;
  use crate::{classification::parse_reply, ticket::Category};

  #[test]
  fn prompt_lists_every_category() {
    for c in Category::iter() {
      assert!(SYSTEM_PROMPT.contains(c.as_ref()), "missing {c}");
    }
  }

  #[test]
  fn worked_example_is_a_valid_reply() {
    let example = SYSTEM_PROMPT
      .lines()
      .find_map(|l| l.strip_prefix("Response: "))
      .unwrap();
    let parsed = parse_reply(example).unwrap();
    assert_eq!(parsed.category, "Network");
    assert_eq!(parsed.confidence, 0.91);
  }

  #[test]
  fn user_turn_prefixes_ticket() {
    assert_eq!(user_turn("no wifi"), "Ticket: no wifi");
  }
}
