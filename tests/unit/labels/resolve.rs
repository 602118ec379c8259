use super::*;

fn cat_anchors() -> AnchorSet {
    AnchorSet::from_anchors([
        Anchor {
            name: "top".to_string(),
            x: 0.5,
            y: 0.1,
        },
        Anchor {
            name: "bottom".to_string(),
            x: 0.5,
            y: 0.9,
        },
    ])
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_labels_use_anchor_names() {
    let bindings = resolve_labels(&cat_anchors(), &LabelSource::TestLabels).unwrap();
    assert_eq!(bindings.len(), 2);
    for b in &bindings {
        assert_eq!(b.text, b.anchor.name);
    }
}

#[test]
fn explicit_binds_only_named_anchors() {
    let source = LabelSource::Explicit(labels(&[("top", "Hello\nWorld")]));
    let bindings = resolve_labels(&cat_anchors(), &source).unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].anchor.name, "top");
    assert_eq!(bindings[0].text, "Hello\nWorld");
}

#[test]
fn explicit_ignores_unknown_names() {
    let source = LabelSource::Explicit(labels(&[("top", "Hi"), ("unknown", "X")]));
    let bindings = resolve_labels(&cat_anchors(), &source).unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].text, "Hi");
}

#[test]
fn explicit_with_no_matches_is_empty_not_error() {
    let source = LabelSource::Explicit(labels(&[("nowhere", "X")]));
    let bindings = resolve_labels(&cat_anchors(), &source).unwrap();
    assert!(bindings.is_empty());
}

#[test]
fn explicit_without_labels_fails() {
    let err = resolve_labels(&cat_anchors(), &LabelSource::Explicit(BTreeMap::new())).unwrap_err();
    assert!(matches!(err, StampError::NoLabelsRequested(_)));
}

#[test]
fn test_labels_ignore_an_empty_anchor_set() {
    let bindings = resolve_labels(&AnchorSet::default(), &LabelSource::TestLabels).unwrap();
    assert!(bindings.is_empty());
}

#[test]
fn resolving_twice_is_idempotent() {
    let anchors = cat_anchors();
    let source = LabelSource::Explicit(labels(&[("top", "a"), ("bottom", "b")]));
    let first = resolve_labels(&anchors, &source).unwrap();
    let second = resolve_labels(&anchors, &source).unwrap();
    assert_eq!(first, second);
}
