use std::collections::BTreeMap;

use anyhow::Result;
use indoc::indoc;
use nex_yaml::{FormatterRegistry, from_str_with_registry, to_string_with_registry};

#[derive(Debug, Default, PartialEq)]
struct Address {
    street: String,
    zip: Option<u32>,
}

nex_yaml::yaml_object! {
    struct AddressFormatter for Address { street, zip }
}

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: u32,
    nickname: Option<String>,
    address: Address,
    tags: Vec<String>,
    scores: BTreeMap<String, f64>,
}

nex_yaml::yaml_object! {
    struct PersonFormatter for Person { name, age, nickname, address, tags, scores }
}

fn registry() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    registry.register::<Address>(AddressFormatter);
    registry.register::<Person>(PersonFormatter);
    registry
}

fn ada() -> Person {
    Person {
        name: "Ada".into(),
        age: 36,
        nickname: None,
        address: Address {
            street: "Main St".into(),
            zip: Some(12345),
        },
        tags: vec!["math".into(), "yes".into()],
        scores: BTreeMap::from([("a".to_string(), 1.5), ("b".to_string(), -2.0)]),
    }
}

#[test]
fn person_serializes_in_block_style() -> Result<()> {
    let yaml = to_string_with_registry(&ada(), &registry())?;
    assert_eq!(
        yaml,
        indoc! {r#"
            name: Ada
            age: 36
            nickname: null
            address:
              street: Main St
              zip: 12345
            tags:
              - math
              - "yes"
            scores:
              a: 1.5
              b: -2.0
        "#}
    );
    Ok(())
}

#[test]
fn person_round_trips() -> Result<()> {
    let registry = registry();
    let original = ada();
    let yaml = to_string_with_registry(&original, &registry)?;
    let back: Person = from_str_with_registry(&yaml, &registry)?;
    assert_eq!(back, original);
    Ok(())
}

#[test]
fn flow_style_input_is_accepted() -> Result<()> {
    let yaml = indoc! {"
        name: Bob
        age: 0x1F
        address: {street: 'Elm', zip: ~}
        tags: [a, b]
        scores: {x: .inf}
    "};
    let person: Person = from_str_with_registry(yaml, &registry())?;
    assert_eq!(person.age, 31);
    assert_eq!(person.address.zip, None);
    assert_eq!(person.tags, vec!["a", "b"]);
    assert_eq!(person.scores.get("x").copied(), Some(f64::INFINITY));
    Ok(())
}

#[test]
fn tricky_strings_round_trip() -> Result<()> {
    let registry = FormatterRegistry::new();
    let strings: Vec<String> = [
        "", "~", "null", "true", "no", "123", "0x10", "1.5e3", "- dash", "key: value", "# hash",
        "trailing ", " leading", "line\nbreak", "tab\there", "quote's", "\"dq\"", "[x]", "{y}",
        "plain text",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let yaml = to_string_with_registry(&strings, &registry)?;
    let back: Vec<String> = from_str_with_registry(&yaml, &registry)?;
    assert_eq!(back, strings);
    Ok(())
}

#[test]
fn document_markers_are_quoted() -> Result<()> {
    assert_eq!(nex_yaml::to_string(&"...".to_string())?, "\"...\"\n");
    assert_eq!(nex_yaml::from_str::<String>("\"...\"\n")?, "...");

    let markers: Vec<String> = ["...", "---", "... end", "--- start", "....", "---x", "a ..."]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let yaml = nex_yaml::to_string(&markers)?;
    assert!(yaml.starts_with("- \"...\"\n- \"---\"\n- \"... end\"\n"), "{yaml}");
    assert!(yaml.contains("- ....\n"), "{yaml}");
    let back: Vec<String> = nex_yaml::from_str(&yaml)?;
    assert_eq!(back, markers);

    let root = nex_yaml::to_string(&"... end".to_string())?;
    assert_eq!(nex_yaml::from_str::<String>(&root)?, "... end");
    Ok(())
}

#[test]
fn quote_all_round_trips() -> Result<()> {
    let registry = registry();
    let opts = nex_yaml::serializer_options! { quote_all: true, indent_step: 4 };
    let mut ctx = nex_yaml::SerializationContext::new(&registry, opts);
    let mut emitter = nex_yaml::Emitter::new(opts);
    ctx.serialize_with_alias(&mut emitter, &ada())?;
    let yaml = emitter.finish()?;
    assert!(yaml.starts_with("'name': 'Ada'\n"), "{yaml}");
    assert!(yaml.contains("\n    'street': 'Main St'\n"), "{yaml}");
    assert!(yaml.contains("'nickname': null\n"), "{yaml}");
    let back: Person = from_str_with_registry(&yaml, &registry)?;
    assert_eq!(back, ada());
    Ok(())
}

#[test]
fn zero_indent_step_is_rejected() {
    let opts = nex_yaml::serializer_options! { indent_step: 0 };
    assert!(nex_yaml::to_string_with_options(&1u8, opts).is_err());
}
