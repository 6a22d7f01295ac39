use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Applied to generated question and option text before it is stored, since
/// it comes from an external model and is rendered by the quiz client.
/// Safe inline tags survive; `<script>` and its content are removed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_removed() {
        assert_eq!(clean_html("What is <script>alert(1)</script>2+2?"), "What is 2+2?");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(clean_html("Capital of France"), "Capital of France");
    }
}
