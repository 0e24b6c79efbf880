use lazy_regex::regex;
use scraper::ElementRef;

/// Full descendant text of an element with every whitespace run collapsed
/// to a single space.
pub fn tidy_text(element: ElementRef<'_>) -> String {
    tidy_str(&element.text().collect::<String>())
}

pub(crate) fn tidy_str(s: &str) -> String {
    regex!(r"\s+").replace_all(s.trim(), " ").into_owned()
}

/// The published pages contain two recurring typos in candidate names.
pub fn fix_candidate_name(messy_name: &str) -> String {
    let name = regex!(r"^Mme \.").replace(messy_name, "Mme");
    regex!("MARIE SARA")
        .replace_all(&name, "Marie SARA")
        .into_owned()
}
