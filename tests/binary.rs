use anyhow::Result;
use indoc::indoc;
use nex_yaml::{Binary, Error, FormatterRegistry, from_str_with_registry, to_string_with_registry};

#[derive(Debug, Default, PartialEq)]
struct Attachment {
    name: String,
    data: Binary,
}

nex_yaml::yaml_object! {
    struct AttachmentFormatter for Attachment { name, data }
}

fn registry() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    registry.register::<Attachment>(AttachmentFormatter);
    registry
}

#[test]
fn binary_field_round_trips() -> Result<()> {
    let registry = registry();
    let attachment = Attachment {
        name: "logo".into(),
        data: Binary(vec![0, 1, 2, 254, 255]),
    };
    let yaml = to_string_with_registry(&attachment, &registry)?;
    assert_eq!(yaml, "name: logo\ndata: !!binary AAEC/v8=\n");
    assert_eq!(from_str_with_registry::<Attachment>(&yaml, &registry)?, attachment);
    Ok(())
}

#[test]
fn wrapped_base64_block_is_accepted() -> Result<()> {
    let yaml = indoc! {"
        name: poem
        data: !!binary |
          SGVsbG8s
          IHdvcmxk
    "};
    let attachment: Attachment = from_str_with_registry(yaml, &registry())?;
    assert_eq!(attachment.data.as_ref(), b"Hello, world");
    Ok(())
}

#[test]
fn empty_binary_round_trips() -> Result<()> {
    let registry = registry();
    let yaml = to_string_with_registry(&Binary::default(), &registry)?;
    assert_eq!(yaml, "!!binary \"\"\n");
    assert_eq!(from_str_with_registry::<Binary>(&yaml, &registry)?, Binary::default());
    Ok(())
}

#[test]
fn malformed_base64_reports_coercion() {
    let err = from_str_with_registry::<Binary>("!!binary 'abc'", &registry()).unwrap_err();
    assert!(matches!(err, Error::ScalarCoercion { .. }), "{err}");
}
