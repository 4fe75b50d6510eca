use classidoc::infrastructure::extraction::sanitize_extracted_text;

#[test]
fn given_word_hyphenated_across_lines_then_it_is_rejoined() {
    let raw = "attestation d'assu-\nrance multirisque";

    let text = sanitize_extracted_text(raw);

    assert_eq!(text, "attestation d'assurance multirisque");
}

#[test]
fn given_hyphen_followed_by_trailing_spaces_then_rejoining_still_applies() {
    let raw = "amortisse- \n  ment du prêt";

    let text = sanitize_extracted_text(raw);

    assert_eq!(text, "amortissement du prêt");
}

#[test]
fn given_compatibility_ligatures_then_they_are_normalized() {
    // U+FB01 LATIN SMALL LIGATURE FI, common in embedded PDF fonts.
    let raw = "certi\u{fb01}cat de conformité";

    let text = sanitize_extracted_text(raw);

    assert_eq!(text, "certificat de conformité");
}

#[test]
fn given_runs_of_spaces_and_tabs_then_they_collapse_to_single_spaces() {
    let raw = "Relevé   de\tcompte \t bancaire";

    let text = sanitize_extracted_text(raw);

    assert_eq!(text, "Relevé de compte bancaire");
}

#[test]
fn given_blank_lines_then_paragraph_breaks_are_preserved() {
    let raw = "Article 1\nLe preneur s'engage.\n\n\nArticle 2\nLe bailleur garantit.";

    let text = sanitize_extracted_text(raw);

    assert_eq!(
        text,
        "Article 1\nLe preneur s'engage.\n\nArticle 2\nLe bailleur garantit."
    );
}

#[test]
fn given_only_whitespace_then_result_is_empty() {
    assert_eq!(sanitize_extracted_text("  \n\t \n "), "");
    assert_eq!(sanitize_extracted_text(""), "");
}

#[test]
fn given_real_hyphenated_compound_inside_a_line_then_it_is_untouched() {
    let text = sanitize_extracted_text("procès-verbal d'assemblée générale");

    assert_eq!(text, "procès-verbal d'assemblée générale");
}
