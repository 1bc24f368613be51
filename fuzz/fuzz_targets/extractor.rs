#![no_main]

use libfuzzer_sys::fuzz_target;

use seolens::extractor::extract_text;
use seolens::suggest::parse_suggestions;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    // Neither markup stripping nor reply parsing may panic on any input
    let text = extract_text(&input);
    assert!(!text.starts_with(char::is_whitespace));

    let vocabulary = vec!["seo".to_string(), "news".to_string(), "ai".to_string()];
    let tags = parse_suggestions(&input, &vocabulary);
    assert!(tags.len() <= 5);
    assert!(tags.iter().all(|t| vocabulary.contains(t)));
});
