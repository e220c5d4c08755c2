use pdf_qa_core::{ConversationLog, QaRecord};
use std::fmt::Write;

/// Renders one exchange; `number` is its 1-based position in the session.
pub fn format_record(number: usize, record: &QaRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "You: {}", record.question);
    let _ = writeln!(out, "Assistant: {}", record.answer);

    if !record.sources.is_empty() {
        let _ = writeln!(out, "Sources used (question {number}):");
        for source in record.display_sources() {
            let _ = writeln!(
                out,
                "  Page {} : {}",
                source.chunk.metadata.page, source.chunk.metadata.source
            );
        }
    }

    out
}

pub fn format_history(log: &ConversationLog) -> String {
    if log.is_empty() {
        return "no questions yet\n".to_string();
    }

    log.iter()
        .enumerate()
        .map(|(index, record)| format_record(index + 1, record))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_qa_core::{Answer, Chunk, RetrievedChunk};

    fn record(sources: usize) -> QaRecord {
        QaRecord::new(
            "What is the capital of France?",
            Answer {
                text: "Paris.".to_string(),
                sources: (0..sources)
                    .map(|page| RetrievedChunk {
                        chunk: Chunk::new("text", "atlas.pdf", page as u32 + 1),
                        score: 0.5,
                    })
                    .collect(),
            },
        )
    }

    #[test]
    fn record_lists_at_most_five_sources() {
        let rendered = format_record(3, &record(7));

        assert!(rendered.starts_with("You: What is the capital of France?\nAssistant: Paris.\n"));
        assert!(rendered.contains("Sources used (question 3):"));
        assert_eq!(rendered.matches("  Page ").count(), 5);
        assert!(rendered.contains("  Page 1 : atlas.pdf"));
        assert!(!rendered.contains("  Page 6 : atlas.pdf"));
    }

    #[test]
    fn record_without_sources_has_no_source_section() {
        let rendered = format_record(1, &record(0));
        assert!(!rendered.contains("Sources used"));
    }

    #[test]
    fn history_is_numbered_in_order() {
        let mut log = ConversationLog::new();
        log.append(record(1));
        log.append(record(1));

        let rendered = format_history(&log);
        let first = rendered.find("question 1").unwrap();
        let second = rendered.find("question 2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_history_says_so() {
        assert_eq!(format_history(&ConversationLog::new()), "no questions yet\n");
    }
}
