#![no_main]

use libfuzzer_sys::fuzz_target;
use modeldiff::complexity::{count_ctes, extract_sql_complexity, strip_sql_comments};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        // Unterminated comments and unbalanced parens must not panic
        let stripped = strip_sql_comments(sql);
        let _ = count_ctes(&stripped);
        let _ = extract_sql_complexity(sql);
    }
});
