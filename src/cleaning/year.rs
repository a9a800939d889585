use once_cell::sync::Lazy;
use regex::Regex;

// A digit run with an optional leading apostrophe and an optional decade `s`.
static YEAR_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"('?)([0-9]+)(s?)").expect("year token pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearToken {
    /// `1965`, or the decade `1960s` when `decade` is set
    Full { year: i32, decade: bool },
    /// `'69`, `'60s`, `60s`
    Short { year: i32, decade: bool },
}

/// Year bounds a title year must fall within
#[derive(Debug, Clone, Copy)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

fn tokens(text: &str) -> Vec<YearToken> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();

    for caps in YEAR_TOKEN_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let apostrophe = !caps[1].is_empty();
        let digits = &caps[2];
        let decade = !caps[3].is_empty();

        // Reject runs glued to letters or digits, like `X1965` or `1965th`
        let before = whole.start().checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(whole.end()).copied();
        if before.is_some_and(|b| b.is_ascii_alphanumeric()) && !apostrophe {
            continue;
        }
        if after.is_some_and(|b| b.is_ascii_alphanumeric()) {
            continue;
        }

        let Ok(value) = digits.parse::<i32>() else { continue };
        match digits.len() {
            4 => found.push(YearToken::Full { year: value, decade }),
            2 if apostrophe || decade => {
                let century = if value >= 30 { 1900 } else { 2000 };
                found.push(YearToken::Short { year: century + value, decade });
            }
            _ => {}
        }
    }

    found
}

fn resolve(year: i32, decade: bool) -> i32 {
    if decade {
        year - year % 10 + 5
    } else {
        year
    }
}

/// Model year from a listing title, falling back to its description.
///
/// Four-digit years win over shorthand like `'69` or `60s`. A decade maps to
/// its middle year, so `1960s` gives 1965.
pub fn extract_year(title: &str, description: &str, range: YearRange) -> Option<i32> {
    let all: Vec<YearToken> = tokens(title).into_iter().chain(tokens(description)).collect();

    let plausible = |year, decade| Some(resolve(year, decade)).filter(|&y| range.contains(y));

    let full = all.iter().find_map(|t| match *t {
        YearToken::Full { year, decade } => plausible(year, decade),
        _ => None,
    });

    full.or_else(|| {
        all.iter().find_map(|t| match *t {
            YearToken::Short { year, decade } => plausible(year, decade),
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const RANGE: YearRange = YearRange { min: 1930, max: 2019 };

    #[rstest]
    #[case("1965 Fender Stratocaster Sunburst", Some(1965))]
    #[case("Gibson Les Paul Standard 2008 Honeyburst", Some(2008))]
    #[case("Fender 1960s Reissue Jazzmaster", Some(1965))]
    #[case("Gibson SG '69 Cherry", Some(1969))]
    #[case("Kramer Baretta '80s", Some(1985))]
    #[case("Ibanez RG 90s Black", Some(1995))]
    #[case("Squier '00s Telecaster", Some(2005))]
    #[case("Gibson ES-335 Dot", None)]
    #[case("Fender Model 12345", None)]
    #[case("Gretsch 6120 1920", None)]
    #[case("Fender 2025 Player", None)]
    #[case("Gretsch 1920s Archtop", None)]
    #[case("Fender 2010s Player", Some(2015))]
    fn finds_year_in_title(#[case] title: &str, #[case] expected: Option<i32>) {
        assert_eq!(extract_year(title, "", RANGE), expected);
    }

    #[test]
    fn four_digit_year_beats_earlier_shorthand() {
        assert_eq!(extract_year("'60s style 1972 Telecaster", "", RANGE), Some(1972));
    }

    #[test]
    fn falls_back_to_description() {
        assert_eq!(
            extract_year("Gibson Les Paul Custom", "Made in 1978, all original", RANGE),
            Some(1978)
        );
    }

    #[test]
    fn out_of_range_candidate_is_skipped() {
        assert_eq!(extract_year("Kit 1800 w/ 1974 pickups", "", RANGE), Some(1974));
    }

    #[test]
    fn decade_past_the_ceiling_is_rejected() {
        let range = YearRange { min: 1930, max: 2021 };
        assert_eq!(extract_year("Fender 2020s Player", "", range), None);
        assert_eq!(extract_year("Fender '20s Player", "", range), None);
        assert_eq!(extract_year("Fender 2020s Player 2021", "", range), Some(2021));
    }
}
