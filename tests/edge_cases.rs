//! Parser edge cases across formats.

use rapport::error::ParseWarning;
use rapport::parser::{Parser, Platform, create_parser, detect_platform};
use std::path::Path;

#[test]
fn test_empty_inputs_fail_cleanly() {
    let whatsapp = create_parser(Platform::WhatsApp).parse_str("");
    assert!(whatsapp.unwrap_err().is_invalid_format());

    let messenger = create_parser(Platform::Messenger).parse_str("");
    assert!(messenger.unwrap_err().is_invalid_format());

    let telegram = create_parser(Platform::Telegram).parse_str("{}");
    assert!(telegram.unwrap_err().is_invalid_format());
}

#[test]
fn test_whatsapp_only_system_lines_is_empty_corpus() {
    let input = "15.01.2024, 12:00 - Messages and calls are end-to-end encrypted. \
                 No one outside of this chat can read them.";
    let err = create_parser(Platform::WhatsApp)
        .parse_str(input)
        .unwrap_err();
    assert!(err.is_empty_corpus());
}

#[test]
fn test_whatsapp_locale_variants_agree() {
    // The same instant written four ways
    let variants = [
        "15.01.2024, 10:30 - Ala: treść",
        "[15/01/2024, 10:30:00] Ala: treść",
        "[1/15/24, 10:30:00 AM] Ala: treść",
        "[2024-01-15 10:30:00] Ala: treść",
    ];
    let parser = create_parser(Platform::WhatsApp);
    let timestamps: Vec<i64> = variants
        .iter()
        .map(|v| parser.parse_str(v).expect("parse failed").messages[0].timestamp)
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_whatsapp_ambiguous_date_warns_once() {
    let input = "03/04/2024, 10:30 - Ala: raz\n05/06/2024, 10:30 - Ala: dwa";
    let conv = create_parser(Platform::WhatsApp)
        .parse_str(input)
        .expect("parse failed");
    let warnings: Vec<_> = conv
        .warnings
        .iter()
        .filter(|w| matches!(w, ParseWarning::AmbiguousDate { .. }))
        .collect();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_fb_decoding_survives_reparse() {
    // Mojibake input decodes once; decoded text is stable under a second
    // pass through the fixer.
    let json = r#"{
        "participants": [{"name": "Ala"}],
        "messages": [{"sender_name": "Ala", "timestamp_ms": 1000, "content": "mi\u00c5\u0082o"}],
        "title": "t"
    }"#;
    let parser = create_parser(Platform::Messenger);
    let conv = parser.parse_str(json).expect("parse failed");
    assert_eq!(conv.messages[0].content, "miło");

    // Already-clean text is untouched on a second pass
    let clean = rapport::parsers::fix_meta_encoding(&conv.messages[0].content);
    let twice = rapport::parsers::fix_meta_encoding(&clean);
    assert_eq!(clean, twice);
}

#[test]
fn test_detect_platform_heuristics() {
    assert_eq!(
        detect_platform(Path::new("chat.txt"), "anything").unwrap(),
        Platform::WhatsApp
    );
    assert_eq!(
        detect_platform(
            Path::new("message_1.json"),
            r#"{"participants": [{"name": "A"}], "messages": [], "title": "A"}"#
        )
        .unwrap(),
        Platform::Messenger
    );
    assert_eq!(
        detect_platform(
            Path::new("result.json"),
            r#"{"name": "A", "type": "personal_chat", "id": 7,
                "messages": [{"from": "A", "date_unixtime": "1700000000", "type": "message", "text": "x"}]}"#
        )
        .unwrap(),
        Platform::Telegram
    );
}

#[test]
fn test_telegram_formatted_text_fragments() {
    let json = r#"{
        "name": "Ala", "type": "personal_chat", "id": 1,
        "messages": [
            {"id": 1, "type": "message", "date_unixtime": "1700000000", "from": "Ala",
             "text": [{"type": "bold", "text": "Ważne:"}, " spotkanie ", {"type": "italic", "text": "jutro"}]}
        ]
    }"#;
    let conv = create_parser(Platform::Telegram)
        .parse_str(json)
        .expect("parse failed");
    assert_eq!(conv.messages[0].content, "Ważne: spotkanie jutro");
}

#[test]
fn test_multi_part_dedup_on_overlap() {
    let part = |lo: i64, hi: i64| {
        let entries: Vec<String> = (lo..hi)
            .rev()
            .map(|i| {
                format!(
                    r#"{{"sender_name": "Ala", "timestamp_ms": {}, "content": "wiadomość {i}"}}"#,
                    1_700_000_000_000i64 + i * 60_000
                )
            })
            .collect();
        format!(
            r#"{{"participants": [{{"name": "Ala"}}], "messages": [{}], "title": "t"}}"#,
            entries.join(",")
        )
    };
    let parser = create_parser(Platform::Messenger);
    let a = parser.parse_str(&part(0, 30)).unwrap();
    let b = parser.parse_str(&part(20, 50)).unwrap();
    let merged = rapport::model::ParsedConversation::merge(vec![a, b]).unwrap();

    // 0..50 with the 20..30 overlap removed
    assert_eq!(merged.messages.len(), 50);
    let indices: Vec<usize> = merged.messages.iter().map(|m| m.index).collect();
    assert_eq!(indices, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_group_chat_flag() {
    let json = r#"{
        "participants": [{"name": "Ala"}, {"name": "Bartek"}, {"name": "Cezary"}],
        "messages": [{"sender_name": "Ala", "timestamp_ms": 1000, "content": "hej wszystkim"}],
        "title": "Paczka"
    }"#;
    let conv = create_parser(Platform::Messenger)
        .parse_str(json)
        .expect("parse failed");
    assert!(conv.metadata.is_group);
    assert_eq!(conv.title, "Paczka");
}
