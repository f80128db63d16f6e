use anyhow::Result;
use indoc::indoc;
use nex_yaml::{DeserializationContext, FormatterRegistry, ParseEventType, YamlParser};

#[derive(Debug, Default, PartialEq)]
struct Pet {
    name: String,
    age: u32,
}

nex_yaml::yaml_object! {
    struct PetFormatter for Pet { name, age }
}

fn registry() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    registry.register::<Pet>(PetFormatter);
    registry
}

#[derive(Debug, Default, PartialEq)]
struct Dog {
    name: String,
    age: i32,
}

nex_yaml::yaml_object! {
    struct DogFormatter for Dog { name, age }
}

/// `levels` mappings, each holding the next under `level`, written in block style
/// starting at `indent`.
fn nested_mapping(levels: usize, indent: usize) -> String {
    let mut yaml = String::new();
    for depth in 0..levels {
        yaml.push_str(&" ".repeat(indent + depth * 2));
        if depth + 1 == levels {
            yaml.push_str("level: bottom\n");
        } else {
            yaml.push_str("level:\n");
        }
    }
    yaml
}

fn nested_sequence(levels: usize) -> String {
    format!("{}leaf{}", "[".repeat(levels), "]".repeat(levels))
}

#[test]
fn extra_key_is_skipped_and_cursor_lands_on_document_end() -> Result<()> {
    let yaml = indoc! {"
        name: Rex
        age: 3
        extra:
          deeply:
            nested: [1, 2, {k: v}]
          more: &a text
    "};
    let registry = registry();
    let mut parser = YamlParser::new(yaml);
    assert!(parser.skip_after(ParseEventType::DocumentStart)?);
    let mut ctx = DeserializationContext::new(&registry);
    let pet: Pet = ctx.deserialize_with_alias(&mut parser)?;
    assert_eq!(
        pet,
        Pet {
            name: "Rex".into(),
            age: 3
        }
    );
    assert_eq!(parser.current_event_type(), ParseEventType::DocumentEnd);
    Ok(())
}

#[test]
fn flow_extra_is_discarded_and_parser_ends_at_document_end() -> Result<()> {
    let yaml = "name: \"Rex\"\nage: 3\nextra: {nested: [1,2,3]}";
    let mut registry = FormatterRegistry::new();
    registry.register::<Dog>(DogFormatter);

    let mut parser = YamlParser::new(yaml);
    assert!(parser.skip_after(ParseEventType::DocumentStart)?);
    let mut ctx = DeserializationContext::new(&registry);
    let dog: Dog = ctx.deserialize_with_alias(&mut parser)?;
    assert_eq!(dog, Dog { name: "Rex".into(), age: 3 });
    assert_eq!(parser.current_event_type(), ParseEventType::DocumentEnd);
    assert_eq!(parser.depth(), 0);
    Ok(())
}

#[test]
fn unknown_keys_anywhere_in_the_mapping() -> Result<()> {
    let yaml = indoc! {"
        first: [a, b]
        name: Tom
        ? [complex, key]
        : value
        age: 9
        last: ~
    "};
    let pet: Pet = nex_yaml::from_str_with_registry(yaml, &registry())?;
    assert_eq!(pet.name, "Tom");
    assert_eq!(pet.age, 9);
    Ok(())
}

#[test]
fn missing_keys_keep_defaults() -> Result<()> {
    let pet: Pet = nex_yaml::from_str_with_registry("age: 4\n", &registry())?;
    assert_eq!(pet, Pet { name: String::new(), age: 4 });
    let empty: Pet = nex_yaml::from_str_with_registry("{}", &registry())?;
    assert_eq!(empty, Pet::default());
    Ok(())
}

#[test]
fn skip_fifty_levels() -> Result<()> {
    let yaml = nested_sequence(50);
    let mut parser = YamlParser::new(&yaml);
    assert!(parser.skip_after(ParseEventType::DocumentStart)?);
    parser.skip_current_node()?;
    assert_eq!(parser.current_event_type(), ParseEventType::DocumentEnd);
    assert_eq!(parser.depth(), 0);
    Ok(())
}

#[test]
fn skip_fifty_levels_under_unknown_key() -> Result<()> {
    let yaml = format!("name: Deep\nextra: {}\nage: 1\n", nested_sequence(50));
    let pet: Pet = nex_yaml::from_str_with_registry(&yaml, &registry())?;
    assert_eq!(pet.name, "Deep");
    assert_eq!(pet.age, 1);
    Ok(())
}

#[test]
fn skip_fifty_nested_mappings() -> Result<()> {
    let yaml = nested_mapping(50, 0);
    let mut parser = YamlParser::new(&yaml);
    assert!(parser.skip_after(ParseEventType::DocumentStart)?);
    assert_eq!(parser.current_event_type(), ParseEventType::MappingStart);
    parser.skip_current_node()?;
    assert_eq!(parser.current_event_type(), ParseEventType::DocumentEnd);
    assert_eq!(parser.depth(), 0);
    Ok(())
}

#[test]
fn fifty_nested_mappings_under_unknown_key() -> Result<()> {
    let yaml = format!("name: Deep\nextra:\n{}age: 7\n", nested_mapping(50, 2));
    let pet: Pet = nex_yaml::from_str_with_registry(&yaml, &registry())?;
    assert_eq!(pet, Pet { name: "Deep".into(), age: 7 });
    Ok(())
}

#[test]
fn wrong_shape_is_a_structure_error() {
    let err = nex_yaml::from_str_with_registry::<Pet>("[1, 2]", &registry()).unwrap_err();
    match err {
        nex_yaml::Error::Structure { expected, found, location } => {
            assert_eq!(expected, "mapping start");
            assert_eq!(found, ParseEventType::SequenceStart);
            assert!(location.is_known());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_field_value_reports_position() {
    let yaml = "name: Rex\nage: three\n";
    let err = nex_yaml::from_str_with_registry::<Pet>(yaml, &registry()).unwrap_err();
    let location = err.location().expect("coercion errors carry a location");
    assert_eq!(location.line(), 2);
    assert!(err.to_string().contains("`three`"), "{err}");
}
