#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_type_strip::{StripOptions, strip_with_sourcemap};

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    for path_rewriting in [false, true] {
        let options = StripOptions {
            path_rewriting,
            file_name: "fuzz.mts".to_string(),
            ..StripOptions::default()
        };

        if let Ok(out) = strip_with_sourcemap(&source, &options) {
            // If stripping succeeds, the sourcemap must be parseable JSON.
            let _ = serde_json::from_str::<serde_json::Value>(&out.sourcemap)
                .expect("sourcemap must be valid JSON when stripping returns Ok");
        }
    }
});
