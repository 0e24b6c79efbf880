use scraper::ElementRef;

pub(crate) fn next_sibling_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

// Matches only the element owning the text node, not its ancestors.
pub(crate) fn own_text_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}
