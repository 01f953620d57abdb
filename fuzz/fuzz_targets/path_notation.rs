#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_resin_path::{NotationOptions, parse_path_set, path_set_string};

fuzz_target!(|data: &str| {
    // Parsing never panics; whatever parses must survive a write/read cycle.
    let Ok(paths) = parse_path_set(data) else {
        return;
    };
    let text = path_set_string(&paths, &NotationOptions::default());
    let reparsed = parse_path_set(&text).expect("serialized path data must parse");
    assert_eq!(reparsed.len(), paths.len());
    for (a, b) in paths.iter().zip(&reparsed) {
        assert_eq!(a.raw().len(), b.raw().len());
        assert_eq!(a.is_closed(), b.is_closed());
    }
});
