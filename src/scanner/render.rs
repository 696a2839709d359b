//! Plain-text rendering of the deep-scan dossier.
//!
//! The output seeds an external narrative generator and is capped at
//! 5 000 characters; whole sections are dropped from the tail once the
//! budget runs out.

use crate::timeutil::day_key;

use super::DeepScan;

/// Character budget of the rendered block.
pub const RENDER_BUDGET: usize = 5_000;

/// Renders the dossier into one plain-text block of at most
/// [`RENDER_BUDGET`] characters.
pub fn render(scan: &DeepScan) -> String {
    let mut out = Budget::new(RENDER_BUDGET);

    for (name, dossier) in &scan.per_person {
        if !out.section(&format!("== {name} ==")) {
            break;
        }

        if !dossier.confessions.is_empty() {
            out.section("Najdłuższe wyznania:");
            for quote in dossier.confessions.iter().take(3) {
                out.line(&format!(
                    "- [{}] ({} słów) {}",
                    day_key(quote.timestamp),
                    quote.words,
                    quote.content
                ));
            }
        }

        if !dossier.embarrassing.is_empty() {
            out.section("Cytaty do wykorzystania:");
            for quote in dossier.embarrassing.iter().take(5) {
                out.line(&format!(
                    "- [{}] ({}) {}",
                    day_key(quote.timestamp),
                    quote.reason,
                    quote.content
                ));
            }
        }

        if !dossier.contradictions.is_empty() {
            out.section("Deklaracje bez pokrycia:");
            for c in &dossier.contradictions {
                out.line(&format!(
                    "- [{}] \"{}\" a potem {} wiadomości w 72h{}",
                    day_key(c.timestamp),
                    c.assertion,
                    c.followup_messages,
                    if c.affectionate_followup {
                        ", w tym czułe"
                    } else {
                        ""
                    }
                ));
            }
        }

        if !dossier.obsessions.is_empty() {
            let topics: Vec<String> = dossier
                .obsessions
                .iter()
                .map(|o| format!("{} (×{})", o.phrase, o.count))
                .collect();
            out.section(&format!("Obsesje: {}", topics.join(", ")));
        }

        if !dossier.pet_names.is_empty() {
            let names: Vec<String> = dossier
                .pet_names
                .iter()
                .map(|p| format!("{} (×{})", p.phrase, p.count))
                .collect();
            out.section(&format!("Czułe słówka: {}", names.join(", ")));
        }

        let moves = &dossier.power_moves;
        out.section(&format!(
            "Zagrania: zostawione na przeczytane ×{} (najdłużej {}h), przeprasza pierwszy ×{}, serie wiadomości ×{} (rekord {})",
            moves.left_on_read,
            moves.worst_left_on_read_ms / 3_600_000,
            moves.apologies_first,
            moves.double_text_chains,
            moves.longest_chain
        ));
    }

    if !scan.threads.is_empty() {
        out.section("== Najciekawsze wymiany ==");
        for thread in &scan.threads {
            out.line(&format!(
                "- [{}] {} wiadomości{}: {}",
                day_key(thread.start_ts),
                thread.messages,
                if thread.late_night { ", nocna" } else { "" },
                thread.preview
            ));
        }
    }

    out.finish()
}

/// Appends lines until the character budget runs out, then swallows the
/// rest.
struct Budget {
    text: String,
    limit: usize,
    exhausted: bool,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
            exhausted: false,
        }
    }

    fn push(&mut self, line: &str, blank_before: bool) -> bool {
        if self.exhausted {
            return false;
        }
        let extra = line.chars().count() + usize::from(blank_before) + 1;
        if self.text.chars().count() + extra > self.limit {
            self.exhausted = true;
            return false;
        }
        if blank_before && !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.text.push('\n');
        true
    }

    fn section(&mut self, header: &str) -> bool {
        self.push(header, true)
    }

    fn line(&mut self, line: &str) -> bool {
        self.push(line, false)
    }

    fn finish(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, ParsedConversation, UnifiedMessage};
    use crate::parser::Platform;

    const MIN: i64 = 60 * 1000;

    fn sample_scan(messages: usize) -> DeepScan {
        let messages: Vec<UnifiedMessage> = (0..messages)
            .map(|i| {
                let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
                let content = if i % 7 == 0 {
                    "kocham cię misiu i strasznie tęsknię, naprawdę nie wiem co bym bez ciebie zrobiła przez te wszystkie długie dni i tygodnie"
                } else {
                    "zwykła wiadomość o planach na jutro"
                };
                UnifiedMessage::text(sender, content, i as i64 * 2 * MIN)
            })
            .collect();
        let conv = ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        );
        super::super::scan(&conv)
    }

    #[test]
    fn test_render_under_budget() {
        let rendered = render(&sample_scan(2000));
        assert!(rendered.chars().count() <= RENDER_BUDGET);
        assert!(rendered.contains("== Ala =="));
    }

    #[test]
    fn test_render_contains_sections() {
        let rendered = render(&sample_scan(100));
        assert!(rendered.contains("Zagrania:"));
        assert!(rendered.contains("Czułe słówka:"));
    }

    #[test]
    fn test_render_deterministic() {
        let scan = sample_scan(300);
        assert_eq!(render(&scan), render(&scan));
    }
}
