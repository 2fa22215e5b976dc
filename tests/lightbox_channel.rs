//! Worldmap lightbox snippets through the executor

use geo_payload::config::ConfigurationError;
use geo_payload::{
    Configuration, CycleState, Entity, Executor, Lightbox, MapId, PipelineError,
    RecordingRuntime,
};
use pretty_assertions::assert_eq;

const VIEWERS: [Lightbox; 3] = [Lightbox::Slimbox2, Lightbox::Fancybox, Lightbox::Fancybox3];

fn photos(title: &str) -> Vec<Entity> {
    let harbour = Entity::new(3, 43.3, 5.37)
        .with_title(title)
        .with_images("https://example.com/h.jpg", "https://example.com/h-t.jpg");
    let mut unplaced = Entity::default()
        .with_title("Attic")
        .with_images("https://example.com/a.jpg", "https://example.com/a-t.jpg");
    unplaced.id = 4;
    vec![harbour, unplaced]
}

fn snippet_for(engine: Lightbox, title: &str) -> String {
    let config = Configuration::default().with_lightbox(engine);
    Executor::new(RecordingRuntime::default())
        .compose_lightbox(&photos(title), &config, MapId::new(21))
        .unwrap()
}

#[test]
fn test_benign_snippets_install_for_every_viewer() {
    for engine in VIEWERS {
        let snippet = snippet_for(engine, "Old harbour");
        assert!(snippet.contains("function geo2_maps_lightbox_21( imageSrc )"));
        assert!(snippet.contains("Attic"), "{engine}: unplaced photos belong in the gallery");

        let mut executor = Executor::awaiting(RecordingRuntime::default());
        executor.receive_lightbox(&snippet).unwrap();
        assert_eq!(executor.state(), CycleState::Executing);
        assert_eq!(executor.runtime().installed, vec![snippet]);
    }
}

#[test]
fn test_injected_title_never_installs() {
    for engine in VIEWERS {
        let snippet = snippet_for(engine, "eval (atob(x))");
        let mut executor = Executor::awaiting(RecordingRuntime::default());
        assert!(matches!(
            executor.receive_lightbox(&snippet),
            Err(PipelineError::Validation(_))
        ));
        assert_eq!(executor.state(), CycleState::Rejected);
        assert!(executor.runtime().installed.is_empty());
    }
}

#[test]
fn test_appended_code_is_rejected() {
    let mut snippet = snippet_for(Lightbox::Fancybox, "Old harbour");
    snippet.push_str("eval(atob(x));\n");
    let mut executor = Executor::awaiting(RecordingRuntime::default());
    assert!(executor.receive_lightbox(&snippet).is_err());
    assert!(executor.runtime().installed.is_empty());
}

#[test]
fn test_non_gallery_viewers_are_unsupported() {
    for engine in [Lightbox::Infobox, Lightbox::None] {
        let config = Configuration::default().with_lightbox(engine);
        let mut executor = Executor::new(RecordingRuntime::default());
        let err = executor
            .compose_lightbox(&photos("Old harbour"), &config, MapId::new(21))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Configuration(ConfigurationError::Unsupported { .. })
        ));
        assert_eq!(executor.state(), CycleState::Rejected);
    }
}
