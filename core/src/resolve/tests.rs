use super::*;

const STORAGE_URL: &str =
    "https://firebasestorage.googleapis.com/v0/b/ingbot-f8861.appspot.com/o/abc123def456.png?alt=media";

mod json_payloads {
    use super::*;

    #[test]
    fn id_field_wins() {
        assert_eq!(resolve(r#"{"id":"XYZ"}"#), "XYZ");
    }

    #[test]
    fn id_field_wins_over_url_substrings() {
        let raw = format!(r#"{{"id":"XYZ","image":"{STORAGE_URL}"}}"#);
        assert_eq!(resolve(&raw), "XYZ");
    }

    #[test]
    fn product_id_and_batch_number_are_accepted() {
        assert_eq!(resolve(r#"{"product_id":"PRD-000123"}"#), "PRD-000123");
        assert_eq!(resolve(r#"{"batchNumber":"LOT-A-2024-10"}"#), "LOT-A-2024-10");
    }

    #[test]
    fn numeric_id_is_rendered_in_decimal() {
        assert_eq!(resolve(r#"{"id":42}"#), "42");
    }

    #[test]
    fn null_id_falls_through_to_the_next_field() {
        assert_eq!(resolve(r#"{"id":null,"product_id":"P1"}"#), "P1");
    }

    #[test]
    fn json_without_identifier_field_falls_through_to_url_parsing() {
        let raw = format!(r#"{{"name":"milk","image":"{STORAGE_URL}"}}"#);
        assert_eq!(resolve(&raw), "abc123def456");
    }

    #[test]
    fn json_without_identifier_or_urls_falls_back_to_the_raw_string() {
        let raw = r#"{"name":"milk"}"#;
        assert_eq!(resolve(raw), raw);
    }

    #[test]
    fn json_id_with_image_extension_is_stripped() {
        assert_eq!(resolve(r#"{"id":"abc123.png"}"#), "abc123");
    }
}

mod storage_urls {
    use super::*;

    #[test]
    fn object_name_is_extracted_and_extension_stripped() {
        assert_eq!(resolve(STORAGE_URL), "abc123def456");
    }

    #[test]
    fn uuid_style_object_names_keep_their_dashes() {
        let raw = "https://firebasestorage.googleapis.com/v0/b/bkt/o/d290f1ee-6c54-4b01-90e6?alt=media";
        assert_eq!(resolve(raw), "d290f1ee-6c54-4b01-90e6");
    }

    #[test]
    fn object_name_without_query_string() {
        let raw = "https://firebasestorage.googleapis.com/v0/b/bkt/o/abc123";
        assert_eq!(resolve(raw), "abc123");
    }

    #[test]
    fn non_hex_object_names_use_the_loose_pattern() {
        let raw = "https://firebasestorage.googleapis.com/v0/b/bkt/o/My_Photo.PNG?alt=media";
        assert_eq!(resolve(raw), "My_Photo");
    }

    #[test]
    fn storage_branch_wins_over_a_url_parameter() {
        let raw = format!("{STORAGE_URL}&url=OTHER");
        assert_eq!(resolve(&raw), "abc123def456");
    }

    #[test]
    fn marker_without_object_delimiter_falls_back() {
        let raw = "firebasestorage-is-down";
        assert_eq!(resolve(raw), raw);
    }
}

mod query_parameters {
    use super::*;

    #[test]
    fn url_parameter_is_extracted() {
        assert_eq!(resolve("foo?url=BAR"), "BAR");
    }

    #[test]
    fn url_parameter_among_others_is_found() {
        assert_eq!(resolve("verify?alt=media&url=PRD-7"), "PRD-7");
    }

    #[test]
    fn missing_url_parameter_passes_through_unchanged() {
        assert_eq!(resolve("foo?nota=BAR"), "foo?nota=BAR");
    }

    #[test]
    fn percent_escapes_are_decoded() {
        assert_eq!(resolve("verify?url=PRD%2D001%20A"), "PRD-001 A");
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(resolve("verify?url=PRD%ZZ"), "PRD%ZZ");
    }

    #[test]
    fn empty_url_parameter_resolves_to_empty() {
        assert_eq!(resolve("foo?url="), "");
    }
}

mod post_processing {
    use super::*;

    #[test]
    fn known_image_extensions_are_stripped_case_insensitively() {
        for raw in [
            "abc123.png",
            "abc123.jpg",
            "abc123.jpeg",
            "abc123.gif",
            "abc123.webp",
            "abc123.PNG",
            "abc123.JpEg",
        ] {
            assert_eq!(resolve(raw), "abc123", "input: {raw}");
        }
    }

    #[test]
    fn unknown_extensions_survive() {
        assert_eq!(resolve("archive.tar.gz"), "archive.tar.gz");
    }

    #[test]
    fn only_the_trailing_extension_is_stripped() {
        assert_eq!(resolve("photo.png.jpg"), "photo.png");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(resolve("  PRD-001  "), "PRD-001");
        assert_eq!(resolve("\tabc123.png\n"), "abc123");
    }

    #[test]
    fn empty_string_resolves_to_empty_string() {
        assert_eq!(resolve(""), "");
    }
}

mod idempotence {
    use super::*;

    #[test]
    fn resolving_a_resolved_identifier_is_a_fixpoint() {
        let inputs = [
            "PRD-001",
            r#"{"id":"XYZ"}"#,
            STORAGE_URL,
            "verify?url=PRD-7",
            "abc123.PNG",
            "  spaced  ",
            "12345",
            "",
        ];

        for raw in inputs {
            let once = resolve(raw);
            assert_eq!(resolve(&once), once, "input: {raw}");
        }
    }
}
