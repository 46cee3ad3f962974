//! Permissive Content-Disposition parsing

/// A parsed `Content-Disposition` part header
///
/// The grammar accepted here is deliberately loose: anything shaped
/// like `form-data; name="field"; filename="a.png"` parses, unknown
/// parameters are ignored, and quoting is optional. `file_name` keeps
/// the value exactly as written, surrounding quotes included; object
/// name derivation handles the quotes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentDisposition {
    /// The `name` parameter, unquoted
    pub name: Option<String>,
    /// The `filename` parameter, raw
    pub file_name: Option<String>,
}

impl ContentDisposition {
    /// Parse a header value. Returns `None` when the value is empty or
    /// has no disposition type at all; such parts are treated as plain
    /// fields downstream, not as errors.
    pub fn parse(value: &str) -> Option<Self> {
        let mut segments = value.split(';');
        let disposition_type = segments.next()?.trim();
        if disposition_type.is_empty() || disposition_type.contains('=') {
            return None;
        }

        let mut parsed = Self::default();
        for segment in segments {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "name" => parsed.name = Some(unquote(value.trim()).to_string()),
                "filename" => parsed.file_name = Some(value.trim().to_string()),
                _ => {}
            }
        }
        Some(parsed)
    }

    /// Whether this disposition declares a file: a `filename` parameter
    /// whose unquoted value is non-empty.
    pub fn is_file(&self) -> bool {
        self.file_name
            .as_deref()
            .is_some_and(|f| !unquote(f).is_empty())
    }
}

/// Strip one matching pair of surrounding double quotes
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_disposition() {
        let cd =
            ContentDisposition::parse(r#"form-data; name="file"; filename="a.txt""#).unwrap();
        assert_eq!(cd.name.as_deref(), Some("file"));
        assert_eq!(cd.file_name.as_deref(), Some(r#""a.txt""#));
        assert!(cd.is_file());
    }

    #[test]
    fn parses_field_disposition() {
        let cd = ContentDisposition::parse(r#"form-data; name="note""#).unwrap();
        assert_eq!(cd.name.as_deref(), Some("note"));
        assert_eq!(cd.file_name, None);
        assert!(!cd.is_file());
    }

    #[test]
    fn unquoted_parameters_are_accepted() {
        let cd = ContentDisposition::parse("form-data; name=plain; filename=report.pdf").unwrap();
        assert_eq!(cd.name.as_deref(), Some("plain"));
        assert_eq!(cd.file_name.as_deref(), Some("report.pdf"));
        assert!(cd.is_file());
    }

    #[test]
    fn empty_filename_is_not_a_file() {
        let cd = ContentDisposition::parse(r#"form-data; name="f"; filename="""#).unwrap();
        assert!(!cd.is_file());
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let cd = ContentDisposition::parse(
            r#"attachment; filename="x.bin"; creation-date="Tue, 1 Jan""#,
        )
        .unwrap();
        assert!(cd.is_file());
    }

    #[test]
    fn empty_value_does_not_parse() {
        assert_eq!(ContentDisposition::parse(""), None);
        assert_eq!(ContentDisposition::parse("   "), None);
    }

    #[test]
    fn parameter_without_type_does_not_parse() {
        assert_eq!(ContentDisposition::parse(r#"name="file""#), None);
    }
}
