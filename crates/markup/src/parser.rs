use crate::segment::Segment;
use limebar_theme::Color;
use thiserror::Error;
use tracing::debug;

/// Why a bracket group did not become a segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("segment '[{0}]' has no ':' separating attributes from text")]
    MissingColon(String),
    #[error("'[' inside unterminated segment '[{0}'")]
    NestedBracket(String),
    #[error("segment '[{0}' is never closed")]
    Unterminated(String),
}

/// Parse one markup line into its segments.
///
/// Malformed bracket groups are logged and dropped; they never affect the
/// groups around them.
pub fn parse(line: &str) -> Vec<Segment> {
    scan(line)
        .into_iter()
        .filter_map(|group| match group {
            Ok(segment) => Some(segment),
            Err(e) => {
                debug!("dropping malformed segment: {e}");
                None
            }
        })
        .collect()
}

/// Split `line` into bracket groups, one result per `[` encountered.
///
/// Characters outside brackets are ignored.  A `[` while a group is still
/// open abandons that group and starts a new one.
pub fn scan(line: &str) -> Vec<Result<Segment, MarkupError>> {
    let mut groups = Vec::new();
    let mut open: Option<usize> = None;

    for (i, c) in line.char_indices() {
        match (c, open) {
            ('[', None) => open = Some(i + 1),
            ('[', Some(start)) => {
                groups.push(Err(MarkupError::NestedBracket(line[start..i].to_string())));
                open = Some(i + 1);
            }
            (']', Some(start)) => {
                groups.push(parse_group(&line[start..i]));
                open = None;
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        groups.push(Err(MarkupError::Unterminated(line[start..].to_string())));
    }

    groups
}

/// Parse the content between `[` and `]`.
fn parse_group(content: &str) -> Result<Segment, MarkupError> {
    let content = content.trim_start_matches(' ');
    let Some((attrs, text)) = content.split_once(':') else {
        return Err(MarkupError::MissingColon(content.to_string()));
    };

    let mut segment = Segment::text(text);
    for token in attrs.split(',').filter(|t| !t.is_empty()) {
        apply_attr(&mut segment, token);
    }
    Ok(segment)
}

fn apply_attr(segment: &mut Segment, token: &str) {
    let mut chars = token.chars();
    let Some(kind) = chars.next() else {
        return;
    };
    let value = chars.as_str().strip_prefix('=');

    match (kind, value) {
        ('u', _) => segment.underline = true,
        ('F', Some(v)) => segment.foreground = Some(Color::from_hex_or(v, Color::WHITE)),
        ('B', Some(v)) => segment.background = Some(Color::from_hex_or(v, Color::BLACK)),
        ('U', Some(v)) => segment.underline_color = Some(Color::from_hex_or(v, Color::WHITE)),
        ('T', Some(v)) => segment.font_index = font_index(v),
        ('F' | 'B' | 'U' | 'T', None) => debug!("attribute '{token}' is missing '=value'"),
        _ => debug!("ignoring unknown attribute '{token}'"),
    }
}

/// `T=` values are 1-based; anything below 1 or unparsable selects font 0.
fn font_index(value: &str) -> usize {
    match value.trim().parse::<i64>() {
        Ok(n) if n >= 1 => usize::try_from(n - 1).unwrap_or(0),
        _ => {
            debug!("font index '{value}' out of range; using font 1");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_segment_example() {
        let segs = parse("[F=#ffffff,T=1:Hello] [F=#ff0000,u:World]");
        assert_eq!(segs.len(), 2);

        assert_eq!(segs[0].text, "Hello");
        assert_eq!(segs[0].foreground, Some(Color::WHITE));
        assert_eq!(segs[0].font_index, 0);
        assert!(!segs[0].underline);

        assert_eq!(segs[1].text, "World");
        assert_eq!(segs[1].foreground, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
        assert!(segs[1].underline);
        assert_eq!(segs[1].font_index, 0);
    }

    #[test]
    fn font_index_is_one_based_on_the_wire() {
        let segs = parse("[F=#ff0000,T=2:X]");
        assert_eq!(segs[0].font_index, 1);
    }

    #[test]
    fn nonsense_font_index_clamps_to_zero() {
        for line in ["[T=0:x]", "[T=-4:x]", "[T=abc:x]"] {
            assert_eq!(parse(line)[0].font_index, 0, "{line}");
        }
    }

    #[test]
    fn text_keeps_later_colons() {
        let segs = parse("[B=#000000:12:30:45]");
        assert_eq!(segs[0].text, "12:30:45");
        assert_eq!(segs[0].background, Some(Color::BLACK));
    }

    #[test]
    fn empty_text_and_empty_attrs() {
        let segs = parse("[u:] [:plain]");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].text, "");
        assert!(segs[0].underline);
        assert_eq!(segs[1], Segment::text("plain"));
    }

    #[test]
    fn leading_spaces_are_trimmed_at_bracket_start_only() {
        let segs = parse("[  F=#ffffff:  padded ]");
        assert_eq!(segs[0].foreground, Some(Color::WHITE));
        assert_eq!(segs[0].text, "  padded ");
    }

    #[test]
    fn group_without_colon_is_dropped() {
        let groups = scan("[nocolon] [u:ok]");
        assert_eq!(groups[0], Err(MarkupError::MissingColon("nocolon".into())));
        assert_eq!(parse("[nocolon] [u:ok]").len(), 1);
    }

    #[test]
    fn unterminated_group_keeps_earlier_segments() {
        let segs = parse("[F=#ffffff:first] [F=#fff:text");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "first");
        assert!(parse("[F=#fff:text").is_empty());
    }

    #[test]
    fn nested_bracket_drops_the_outer_group() {
        let groups = scan("[F=#ffffff:a[u:b]");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], Err(MarkupError::NestedBracket("F=#ffffff:a".into())));

        let segs = parse("[F=#ffffff:a[u:b]");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "b");
        assert!(segs[0].underline);
    }

    #[test]
    fn attribute_tokens_are_not_trimmed() {
        let segs = parse("[F=#ff0000, u:x]");
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].underline);
        assert_eq!(segs[0].foreground, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));

        // Only the start of the group content is trimmed.
        let segs = parse("[  u:y]");
        assert!(segs[0].underline);
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let segs = parse("[X=1,F=#00ff00,zz:hi]");
        assert_eq!(segs[0].foreground, Some(Color::rgba(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(segs[0].text, "hi");
    }

    #[test]
    fn invalid_colors_fall_back() {
        let segs = parse("[F=red,B=#12,U=#zzzzzz:x]");
        assert_eq!(segs[0].foreground, Some(Color::WHITE));
        assert_eq!(segs[0].background, Some(Color::BLACK));
        assert_eq!(segs[0].underline_color, Some(Color::WHITE));
    }

    #[test]
    fn attribute_without_value_is_ignored() {
        let segs = parse("[F,T:x]");
        assert_eq!(segs[0].foreground, None);
        assert_eq!(segs[0].font_index, 0);
    }

    #[test]
    fn text_outside_brackets_is_ignored() {
        assert!(parse("just words ] and more").is_empty());
        assert_eq!(parse("left [u:mid] right").len(), 1);
    }

    #[test]
    fn segments_own_distinct_values() {
        let segs = parse("[F=#ffffff:a][F=#ffffff:a]");
        assert_eq!(segs[0], segs[1]);
        assert_ne!(segs[0].text.as_ptr(), segs[1].text.as_ptr());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn attrs() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("u".to_string()),
                Just("F=#ff0000".to_string()),
                Just("B=#00000080".to_string()),
                Just("U=#123456".to_string()),
                (1u8..5).prop_map(|n| format!("T={n}")),
                Just("Q=ignored".to_string()),
            ],
            0..4,
        )
        .prop_map(|v| v.join(","))
    }

    proptest! {
        /// Well-formed lines yield exactly one segment per bracket group.
        #[test]
        fn one_segment_per_group(
            groups in prop::collection::vec((attrs(), "[^\\[\\]]{0,12}", "[^\\[\\]]{0,4}"), 0..8)
        ) {
            let line: String = groups
                .iter()
                .map(|(a, text, gap)| format!("[{a}:{text}]{gap}"))
                .collect();
            let segs = parse(&line);
            prop_assert_eq!(segs.len(), groups.len());
            for (seg, (_, text, _)) in segs.iter().zip(&groups) {
                prop_assert_eq!(&seg.text, text);
            }
        }

        /// Arbitrary input never panics.
        #[test]
        fn parse_is_total(line in ".{0,64}") {
            let _ = parse(&line);
        }
    }
}
