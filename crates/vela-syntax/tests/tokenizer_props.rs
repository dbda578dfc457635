use proptest::prelude::*;
use vela_syntax::{tokenize, TokenKind};

const PROPTEST_CASES: u32 = 512;

fn arb_char() -> impl Strategy<Value = char> {
    // Draw from a pool that keeps shrinking effective while still hitting
    // the interesting scanner states: quotes, braces, escapes, comments,
    // prefix letters, digits, and a few multi-byte code points.
    prop_oneof![
        12 => prop::sample::select(vec![
            'a', 'x', 'z', '0', '1', '9', ' ', '\t', '.', ',', ':', ';',
            '(', ')', '[', ']', '{', '}', '#', '\'', '"', '\\', '_', '=',
            '<', '>', '+', '-', '*', '/', 'f', 'r', 'b', 'u', 'e', 'j',
        ]),
        3 => Just('\n'),
        2 => Just('\r'),
        1 => Just('é'),
        1 => Just('中'),
        1 => Just('😀'),
        1 => Just('\u{0301}'), // combining acute accent
        1 => Just('\u{00A0}'), // NBSP: not line whitespace
    ]
}

fn arb_source(max_chars: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(arb_char(), 0..=max_chars).prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn tokenization_is_total(text in arb_source(64)) {
        let output = tokenize(&text);
        let tokens = output.tokens.items();

        let last = tokens.last().expect("stream is never empty");
        prop_assert_eq!(last.kind.clone(), TokenKind::EndOfStream);
        prop_assert_eq!(last.range.end as usize, text.len());

        // End-of-stream is preceded by a newline, with only end-of-file
        // dedents in between.
        let mut idx = tokens.len() - 1;
        while idx > 0 && matches!(tokens[idx - 1].kind, TokenKind::Dedent { .. }) {
            idx -= 1;
        }
        prop_assert!(matches!(tokens[idx - 1].kind, TokenKind::NewLine(_)));
    }

    #[test]
    fn token_ranges_are_sorted_and_disjoint(text in arb_source(64)) {
        let output = tokenize(&text);
        for pair in output.tokens.items().windows(2) {
            prop_assert!(pair[0].range.start <= pair[1].range.start);
            prop_assert!(pair[0].range.end <= pair[1].range.start);
        }
    }

    #[test]
    fn indents_and_dedents_balance(text in arb_source(64)) {
        let output = tokenize(&text);
        let mut depth = 0i64;
        for tok in output.tokens.items() {
            match tok.kind {
                TokenKind::Indent { .. } => depth += 1,
                TokenKind::Dedent { .. } => {
                    depth -= 1;
                    prop_assert!(depth >= 0);
                }
                _ => {}
            }
        }
        prop_assert_eq!(depth, 0);
    }

    #[test]
    fn lines_tile_the_input(text in arb_source(64)) {
        let output = tokenize(&text);
        let lines = output.lines.items();

        prop_assert!(!lines.is_empty());
        prop_assert_eq!(lines[0].start, 0);
        prop_assert_eq!(lines[lines.len() - 1].end as usize, text.len());
        for pair in lines.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn newline_flavor_does_not_change_structure(text in arb_source(48)) {
        let lf_text: String = text.chars().filter(|&ch| ch != '\r').collect();
        let crlf_text = lf_text.replace('\n', "\r\n");

        let lf = tokenize(&lf_text);
        let crlf = tokenize(&crlf_text);

        prop_assert_eq!(lf.lines.count(), crlf.lines.count());

        let lf_kinds: Vec<_> = lf
            .tokens
            .items()
            .iter()
            .map(|tok| std::mem::discriminant(&tok.kind))
            .collect();
        let crlf_kinds: Vec<_> = crlf
            .tokens
            .items()
            .iter()
            .map(|tok| std::mem::discriminant(&tok.kind))
            .collect();
        prop_assert_eq!(lf_kinds, crlf_kinds);
    }

    #[test]
    fn offset_lookup_agrees_with_linear_scan(text in arb_source(48)) {
        let output = tokenize(&text);
        for offset in 0..=text.len() as u32 {
            let expected = output
                .lines
                .items()
                .iter()
                .position(|line| line.contains(offset))
                .or_else(|| {
                    (offset == output.lines.items().last().map_or(0, |line| line.end))
                        .then(|| output.lines.count() - 1)
                });
            prop_assert_eq!(output.lines.index_containing(offset), expected);
        }
    }
}
