//! View models: plain, comparable descriptions of each screen built from the
//! application state. Drawing code only ever sees these.

pub mod home;
pub mod matches;
pub mod profile;
pub mod stadiums;

/// Up to two uppercase initials, `?` for an empty name.
pub fn initials(name: &str) -> String {
    let out: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if out.is_empty() { "?".to_string() } else { out }
}

pub fn price_label(amount: u32, unit: Option<&str>) -> String {
    match (amount, unit) {
        (0, _) => "Free".to_string(),
        (n, Some(unit)) => format!("{n} / {unit}"),
        (n, None) => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("ana maria lopez"), "AM");
        assert_eq!(initials("  ziggy "), "Z");
        assert_eq!(initials(""), "?");
    }

    #[test]
    fn zero_price_is_free() {
        assert_eq!(price_label(0, Some("hr")), "Free");
        assert_eq!(price_label(60, Some("hr")), "60 / hr");
        assert_eq!(price_label(5, None), "5");
    }
}
