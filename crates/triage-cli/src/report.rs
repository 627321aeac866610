//! Plain-text rendering of classification results and ticket listings.

use std::{collections::BTreeMap, fmt::Write as _};

use strum::IntoEnumIterator;
use triage_core::ticket::{Category, TicketRecord};

const TEXT_WIDTH: usize = 48;
const BAR_WIDTH: usize = 30;

/// One classified ticket, as shown after `triage classify`.
pub fn render_result(rec: &TicketRecord) -> String {
  format!(
    "Category:    {} ({:.2})\nExplanation: {}\nModel:       {}\nTicket:      {}\n",
    rec.category, rec.confidence, rec.explanation, rec.model, rec.ticket_id
  )
}

fn clip(text: &str, width: usize) -> String {
  let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
  if flat.chars().count() <= width {
    flat
  } else {
    let mut out: String = flat.chars().take(width - 1).collect();
    out.push('…');
    out
  }
}

/// Tickets as a fixed-width table, in the order given.
pub fn render_table(records: &[TicketRecord]) -> String {
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:<TEXT_WIDTH$}  {:<10}  {:>10}  {}",
    "TICKET", "CATEGORY", "CONFIDENCE", "CREATED"
  );
  for r in records {
    let _ = writeln!(
      out,
      "{:<TEXT_WIDTH$}  {:<10}  {:>10.2}  {}",
      clip(&r.ticket_text, TEXT_WIDTH),
      r.category,
      r.confidence,
      r.created_at.format("%Y-%m-%d %H:%M:%S"),
    );
  }
  out
}

/// Ticket counts per category: taxonomy categories first, in taxonomy
/// order, then any other labels alphabetically. Absent categories are
/// omitted.
pub fn category_counts(records: &[TicketRecord]) -> Vec<(String, usize)> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for r in records {
    *counts.entry(r.category.as_str()).or_default() += 1;
  }

  let mut out = Vec::with_capacity(counts.len());
  for c in Category::iter() {
    if let Some(n) = counts.remove(c.as_ref()) {
      out.push((c.to_string(), n));
    }
  }
  out.extend(counts.into_iter().map(|(k, n)| (k.to_owned(), n)));
  out
}

/// Category counts as horizontal bars scaled to the largest count.
pub fn render_counts(counts: &[(String, usize)]) -> String {
  let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
  let mut out = String::new();
  for (label, n) in counts {
    let len = if max == 0 { 0 } else { (n * BAR_WIDTH).div_ceil(max) };
    let _ = writeln!(out, "{label:<10} {:<BAR_WIDTH$} {n}", "█".repeat(len));
  }
  out
}
