use crate::driver::Verdict;
use crate::reporter::Reporter;

#[test]
fn plain_rendering() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.render(&Verdict::Conforms), "ok");
    assert_eq!(reporter.render(&Verdict::Compatible), "compatible");
    assert_eq!(reporter.render(&Verdict::Incompatible), "incompatible");
    assert_eq!(
        reporter.render(&Verdict::Printed("(number | string)".to_string())),
        "(number | string)"
    );
    assert_eq!(
        reporter.render(&Verdict::Violation("a.ts:1:1 Value:\n1\nis not".to_string())),
        "a.ts:1:1 Value:\n1\nis not"
    );
}

#[test]
fn colored_violation_keeps_message_body() {
    colored::control::set_override(true);
    let reporter = Reporter::new(true);
    let rendered = reporter.render(&Verdict::Violation("head\nbody".to_string()));
    assert!(rendered.contains("head"));
    assert!(rendered.ends_with("\nbody"));
    assert_ne!(rendered, "head\nbody");
}

#[test]
fn success_classification() {
    assert!(Verdict::Conforms.is_success());
    assert!(Verdict::Incompatible.is_success());
    assert!(Verdict::Printed(String::new()).is_success());
    assert!(!Verdict::Violation(String::new()).is_success());
}
