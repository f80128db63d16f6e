#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;

// Fuzzer input wrapped in flow sequences and mappings, read through the generic
// container formatters and through a raw skip of the whole stream.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);

    let _ = nex_yaml::from_str::<Vec<Option<String>>>(&format!("[{s}]"));
    let _ = nex_yaml::from_str::<BTreeMap<String, String>>(&format!("{{{s}}}"));
    let _ = nex_yaml::from_slice::<BTreeMap<String, Vec<i64>>>(data);

    let mut parser = nex_yaml::YamlParser::new(&s);
    let _ = parser.skip_after(nex_yaml::ParseEventType::StreamEnd);
});
