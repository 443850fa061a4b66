use regex::Regex;

/// Case-insensitive allow-list of file extensions.
///
/// A file qualifies when its name has at least one character before the final `.<ext>`, so a bare
/// `.js` dotfile is not treated as a script.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    pattern: Option<Regex>,
}

impl ExtensionFilter {
    /// Build a filter from extensions given without their leading dot.
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = extensions
            .iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!(r"(?i)^.+\.(?:{})$", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Whether a file with this name should be embedded.
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(file_name))
    }
}
