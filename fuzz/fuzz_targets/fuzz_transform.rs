#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(statements) = telingo_ast::parse(s, "fuzz.lp") {
            if let Ok(output) = telingo_transform::transform([statements]) {
                // every registered future atom yields a placeholder signature
                assert!(output.future_signatures.iter().all(|sig| sig.arity >= 2));
                let _ = output.render();
            }
        }
    }
});
