use super::*;

#[test]
fn analyze_label_reflects_pending_request() {
    assert_eq!(analyze_label(true), "Analyzing...");
    assert_eq!(analyze_label(false), "Analyze");
}
