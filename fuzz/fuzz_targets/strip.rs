#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_type_strip::{StripOptions, strip};

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast and avoid OOM in pathological cases.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    // Rejections are expected outcomes and must never crash.
    for remove_comments in [false, true] {
        let options = StripOptions {
            remove_comments,
            ..StripOptions::default()
        };

        if let Ok(out) = strip(&source, &options) {
            // Without specifier rewrites, stripping only ever deletes text.
            assert!(
                out.len() <= source.len(),
                "output grew from {} to {} bytes",
                source.len(),
                out.len()
            );
        }
    }
});
