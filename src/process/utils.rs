/// Clean one extracted cell: absent → "", line breaks become spaces,
/// whitespace runs collapse to a single space, outer whitespace is trimmed.
pub fn clean_cell(raw: Option<&str>) -> String {
    match raw {
        None => String::new(),
        Some(s) => s.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// Left-pad with zeros to two characters (`"1"` → `"01"`); longer input is untouched.
pub fn zero_pad2(s: &str) -> String {
    format!("{:0>2}", s)
}
