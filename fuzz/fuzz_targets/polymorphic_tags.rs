#![no_main]

use std::any::Any;

use libfuzzer_sys::fuzz_target;

trait Shape: Any + Send + Sync {}

#[derive(Debug, Default)]
struct Circle {
    radius: f64,
}

#[derive(Debug, Default)]
struct Square {
    side: f64,
}

impl Shape for Circle {}
impl Shape for Square {}

nex_yaml::polymorphic_base!(dyn Shape, Interface);
nex_yaml::yaml_variant!(Circle => Box<dyn Shape>);
nex_yaml::yaml_variant!(Square => Box<dyn Shape>);
nex_yaml::yaml_object! { struct CircleFormatter for Circle { radius } }
nex_yaml::yaml_object! { struct SquareFormatter for Square { side } }

// Arbitrary input read as a list of tagged shapes, then written back out.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let mut registry = nex_yaml::FormatterRegistry::new();
    if registry.register_variant::<Circle, Box<dyn Shape>>(CircleFormatter).is_err()
        || registry.register_variant::<Square, Box<dyn Shape>>(SquareFormatter).is_err()
    {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(shapes) = nex_yaml::from_str_with_registry::<Vec<Box<dyn Shape>>>(text, &registry) {
        let yaml = nex_yaml::to_string_with_registry(&shapes, &registry);
        assert!(yaml.is_ok(), "registered variants must serialize: {yaml:?}");
    }
});
