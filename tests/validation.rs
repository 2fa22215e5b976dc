//! Validation behaviour on untrusted entity text

use geo_payload::guard::{validate_text, PatternValidator};
use geo_payload::{
    run_cycle, Configuration, Entity, FragmentCatalog, Lightbox, MapId, PipelineError,
    RecordingRuntime, TransportError, ValidationErrorKind,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn infobox() -> Configuration {
    Configuration::default().with_lightbox(Lightbox::Infobox)
}

fn described(description: &str) -> Entity {
    Entity::new(8, 51.5, -0.12)
        .with_title("Evening")
        .with_description(description)
}

/// Run a cycle and return the rejection kind, if any
fn rejection(config: &Configuration, entity: Entity) -> Option<ValidationErrorKind> {
    let mut runtime = RecordingRuntime::default();
    match run_cycle(&[entity], config, MapId::new(30), &mut runtime) {
        Ok(_) => None,
        Err(PipelineError::Validation(e)) => {
            assert!(runtime.installed.is_empty());
            Some(e.kind())
        }
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_script_tag_is_rejected() {
    assert_eq!(
        rejection(&infobox(), described("<script>alert(1)</script>")),
        Some(ValidationErrorKind::UnsafeCharacter)
    );
}

#[test]
fn test_javascript_pseudo_url_is_rejected() {
    assert_eq!(
        rejection(&infobox(), described("javascript:void(0)")),
        Some(ValidationErrorKind::ForbiddenKeyword)
    );
    assert_eq!(
        rejection(&infobox(), described("void(0)")),
        Some(ValidationErrorKind::ForbiddenCall)
    );
}

#[test]
fn test_function_declaration_is_rejected() {
    assert_eq!(
        rejection(&infobox(), described("function steal(name)")),
        Some(ValidationErrorKind::CodeInjection)
    );
    assert_eq!(
        rejection(&infobox(), described("Function(steal)")),
        Some(ValidationErrorKind::CodeInjection)
    );
}

#[test]
fn test_template_literal_is_rejected() {
    let entity = described("x").with_title("Lake `x`");
    assert_eq!(
        rejection(&Configuration::default(), entity),
        Some(ValidationErrorKind::UnsafeCharacter)
    );
}

#[test]
fn test_declared_markup_in_data_is_accepted() {
    let config = infobox();
    let catalog = FragmentCatalog::new(&config).unwrap();
    let payload = geo_payload::template::compose(
        &[described("Nice sunset in <b>Paris</b><br />")],
        &config,
        MapId::new(30),
    )
    .unwrap();
    let residue = validate_text("program", &payload.composed, catalog.fragments()).unwrap();
    assert_eq!(residue, vec!["Evening", "Evening", "Nice sunset in", "Paris"]);
}

#[test]
fn test_url_boundaries() {
    let validator = PatternValidator::new();
    assert!(validator.check("https://example.com/a.jpg").is_ok());
    assert_eq!(
        validator.check("http://<script>").unwrap_err().kind(),
        ValidationErrorKind::UrlFormat
    );

    let image = described("Quay").with_images("https://example.com/a.jpg", "https://example.com/t.jpg");
    assert_eq!(rejection(&Configuration::default(), image), None);

    let hostile = described("Quay").with_title("http://<script>");
    assert_eq!(
        rejection(&Configuration::default(), hostile),
        Some(ValidationErrorKind::UrlFormat)
    );
}

#[test]
fn test_url_in_prose_is_checked_word_by_word() {
    assert_eq!(
        rejection(&infobox(), described("More photos at https://example.com/gallery")),
        None
    );
    assert_eq!(
        rejection(&infobox(), described("More photos at http://<b>x</b>")),
        Some(ValidationErrorKind::UrlFormat)
    );
    assert_eq!(
        rejection(&infobox(), described("https://example.com/gallery void(0)")),
        Some(ValidationErrorKind::ForbiddenCall)
    );
}

#[test]
fn test_apostrophe_rejects_the_map() {
    assert_eq!(
        rejection(&infobox(), described("Paul's birthday")),
        Some(ValidationErrorKind::UnsafeCharacter)
    );
}

#[test]
fn test_punctuation_and_digits_pass() {
    for text in [
        "Sunset, 2019 (summer) #1",
        "Room 4/5; bring snacks!",
        "a = b + c",
        "50% off & more",
        "x: {y}",
    ] {
        assert_eq!(rejection(&infobox(), described(text)), None, "{text}");
    }
}

#[test]
fn test_body_splitter_in_data_fails_closed() {
    let mut runtime = RecordingRuntime::default();
    let err = run_cycle(&[described("a {split} b")], &infobox(), MapId::new(30), &mut runtime)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Transport(TransportError::MalformedBody { parts: 4 })
    ));
    assert!(runtime.installed.is_empty());
}

#[test]
fn test_rejection_report_points_at_token() {
    let err = PatternValidator::new().check("alert(1)").unwrap_err();
    let report = err.report("var t = \"alert(1)\";", "body");
    assert!(report.contains("forbidden-call"));
}

const BLACKLIST: &[&str] = &[
    "javascript", "phpinfo", "html", "script", "object", "applet", "embed", "phpsess", "iframe",
    "eval", "system", "alert", "void", "function", "http", "ftp", "{split}",
];

/// Printable ASCII without the characters rule b refuses
const PLAIN: &str = r"[ !#-&(-;=?-\[\]-_a-~]{1,24}";

proptest! {
    #[test]
    fn plain_text_always_validates(title in PLAIN, description in PLAIN) {
        let config = infobox();
        let catalog = FragmentCatalog::new(&config).unwrap();
        for text in [&title, &description] {
            let lower = text.to_lowercase();
            prop_assume!(!BLACKLIST.iter().any(|word| lower.contains(word)));
            prop_assume!(!catalog.fragments().iter().any(|f| text.contains(f.as_str())));
        }

        let entity = Entity::new(2, 10.0, 20.0)
            .with_title(&title)
            .with_description(&description);
        let mut runtime = RecordingRuntime::default();
        let result = run_cycle(&[entity], &config, MapId::new(4), &mut runtime);
        prop_assert!(result.is_ok(), "{:?}", result.err());
        prop_assert_eq!(runtime.installed.len(), 1);
    }
}
