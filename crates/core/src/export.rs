//! CSV rendering for seller list exports.

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build a CSV document from a header and already-stringified rows.
///
/// Every line, the last included, ends with `\n`.
pub fn build_csv<I>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = header
        .iter()
        .map(|h| csv_escape(h))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');
    for row in rows {
        let line = row.iter().map(|v| csv_escape(v)).collect::<Vec<_>>().join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_are_untouched() {
        assert_eq!(csv_escape("seller_001"), "seller_001");
    }

    #[test]
    fn special_characters_are_quoted() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn build_csv_writes_header_and_rows() {
        let csv = build_csv(
            &["id", "name"],
            vec![
                vec!["1".to_string(), "브랜디".to_string()],
                vec!["2".to_string(), "a, b".to_string()],
            ],
        );
        assert_eq!(csv, "id,name\n1,브랜디\n2,\"a, b\"\n");
    }

    #[test]
    fn build_csv_with_no_rows_is_header_only() {
        assert_eq!(build_csv(&["id"], Vec::<Vec<String>>::new()), "id\n");
    }
}
