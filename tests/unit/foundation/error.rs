use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptionError::invalid_color("x")
            .to_string()
            .contains("invalid color:")
    );
    assert!(
        CaptionError::invalid_duration("x")
            .to_string()
            .contains("invalid duration:")
    );
    assert!(
        CaptionError::source_open("x")
            .to_string()
            .contains("source open error:")
    );
    assert!(
        CaptionError::output_write("x")
            .to_string()
            .contains("output write error:")
    );
    assert!(
        CaptionError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CaptionError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
