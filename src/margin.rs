/// Strips a margin from every line of `text`.
///
/// Lines end at `\r\n`, `\n` or a lone `\r`, and a trailing terminator leaves
/// a final empty line. On each line, leading characters up to and including
/// `' '` are skipped; if the next character is `margin`, everything through it
/// is dropped. Lines without a margin are kept as they are. Lines are joined
/// with `\n`.
///
/// ```
/// use cfgparse::strip_margin;
///
/// let doc = strip_margin("name: \"x\"\n    |size: 1", '|');
/// assert_eq!(doc, "name: \"x\"\nsize: 1");
/// ```
pub fn strip_margin(text: &str, margin: char) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    text.split('\n')
        .map(|line| {
            let rest = line.trim_start_matches(|ch: char| ch <= ' ');
            match rest.strip_prefix(margin) {
                Some(stripped) => stripped,
                None => line,
            }
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Margin stripping as a method on string slices.
pub trait StripMargin {
    fn strip_margin_with(&self, margin: char) -> String;

    /// Strips a `|` margin.
    fn strip_margin(&self) -> String {
        self.strip_margin_with('|')
    }
}

impl StripMargin for str {
    fn strip_margin_with(&self, margin: char) -> String {
        strip_margin(self, margin)
    }
}
