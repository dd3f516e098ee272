pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

pub fn truncate(s: &str, max_len: usize) -> String {
    match max_len {
        0 => return String::new(),
        1 => return "…".to_string(),
        _ => {}
    }

    if s.char_indices().nth(max_len).is_none() {
        return s.to_string();
    }

    let cut = s
        .char_indices()
        .nth(max_len - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    format!("{}…", &s[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap("duplicate registry identifier", 40), vec!["duplicate registry identifier"]);
    }

    #[test]
    fn wrap_breaks_at_word_boundaries() {
        assert_eq!(
            wrap("failed to write 'out/cgas_structures_master.csv'", 20),
            vec!["failed to write", "'out/cgas_structures_master.csv'"]
        );
    }

    #[test]
    fn wrap_empty_text_yields_one_blank_line() {
        assert_eq!(wrap("   ", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_leaves_fitting_text_alone() {
        assert_eq!(truncate("G150", 10), "G150");
        assert_eq!(truncate("VENT-03", 7), "VENT-03");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Azepino[4,5-b]indolone_core", 10), "Azepino[4…");
        assert_eq!(truncate("Pyrido", 1), "…");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("α-β-γ-δ", 4), "α-β…");
    }
}
