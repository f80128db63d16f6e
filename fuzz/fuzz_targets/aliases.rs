#![no_main]

use libfuzzer_sys::fuzz_target;

#[derive(Debug, Default)]
struct AliasDoc {
    a: Option<String>,
    b: Option<String>,
    seq: Option<Vec<i64>>,
    seq_alias: Option<Vec<i64>>,
}

nex_yaml::yaml_object! {
    struct AliasDocFormatter for AliasDoc { a, b, seq, seq_alias }
}

// Anchors and aliases around fuzzer input, read with and without replay.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);
    let yaml = format!("a: &A {s}\nb: *A\nseq: &S [1, 2, 3]\nseq_alias: *S\n");

    let mut registry = nex_yaml::FormatterRegistry::new();
    registry.register::<AliasDoc>(AliasDocFormatter);

    let _ = nex_yaml::from_str_with_registry::<AliasDoc>(&yaml, &registry);
    let options = nex_yaml::options! { replay_aliases: true };
    let _ = nex_yaml::from_str_multiple::<AliasDoc>(&yaml, options, &registry);
});
