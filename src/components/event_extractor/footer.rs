/// Prefix Apollo puts in front of the creator name
const CREATED_BY: &str = "Created by ";

/// Recurrence label used when the footer carries none
pub const NO_RECURRENCE: &str = "No";

/// Bullet separator between creator and recurrence. The second form is the
/// same bullet after a UTF-8 → CP1252 round trip, seen in older exports.
const SEPARATORS: [&str; 2] = [" • ", " â€¢ "];

/// Split footer text into `(creator, recurrence)`
pub fn split_footer(text: &str) -> (String, String) {
    let text = text.strip_prefix(CREATED_BY).unwrap_or(text);

    let split = SEPARATORS
        .iter()
        .filter_map(|separator| text.find(separator).map(|index| (index, separator.len())))
        .min_by_key(|(index, _)| *index);

    match split {
        Some((index, separator_len)) => {
            let creator = &text[..index];
            let rest = &text[index + separator_len..];
            // Only the segment right after the creator is the recurrence
            let recurrence = SEPARATORS
                .iter()
                .filter_map(|separator| rest.find(separator))
                .min()
                .map_or(rest, |end| &rest[..end]);
            (creator.to_string(), recurrence.to_string())
        }
        None => (text.to_string(), NO_RECURRENCE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_with_recurrence() {
        assert_eq!(
            split_footer("Created by Alice • Weekly"),
            ("Alice".to_string(), "Weekly".to_string())
        );
    }

    #[test]
    fn test_creator_without_recurrence() {
        assert_eq!(
            split_footer("Created by Bob"),
            ("Bob".to_string(), "No".to_string())
        );
    }

    #[test]
    fn test_mangled_separator() {
        assert_eq!(
            split_footer("Created by Carol â€¢ Every 2 weeks"),
            ("Carol".to_string(), "Every 2 weeks".to_string())
        );
    }

    #[test]
    fn test_extra_segments_ignored() {
        assert_eq!(
            split_footer("Created by Dan • Daily • Ends Friday"),
            ("Dan".to_string(), "Daily".to_string())
        );
    }

    #[test]
    fn test_missing_prefix_kept_as_is() {
        assert_eq!(
            split_footer("Eve • Monthly"),
            ("Eve".to_string(), "Monthly".to_string())
        );
    }
}
