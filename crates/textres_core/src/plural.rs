//! Quantity → plural category selection.
//!
//! CLDR cardinal rules restricted to integer operands (quantities are whole
//! counts), for a curated set of languages. Languages missing from the table
//! select [`PluralCategory::Other`] for every quantity. Negative quantities use
//! their absolute value, as CLDR operands do.

use std::fmt;

use unic_langid::LanguageIdentifier;

/// CLDR plural category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule families, grouped by languages sharing the same integer behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    /// one: n = 1
    OneOther,
    /// one: i = 0,1
    ZeroOneIsOne,
    /// Icelandic, one: i % 10 = 1 and i % 100 != 11
    Icelandic,
    /// other only
    OtherOnly,
    /// Russian, Ukrainian, Belarusian
    EastSlavic,
    /// Serbian, Croatian, Bosnian (no `many` for integers)
    SouthSlavic,
    Polish,
    /// Czech, Slovak
    WestSlavic,
    Slovenian,
    Lithuanian,
    Latvian,
    Irish,
    Romanian,
    Arabic,
    Hebrew,
}

fn rule_for(locale: &LanguageIdentifier) -> Rule {
    let language = locale.language.as_str();
    // European Portuguese keeps zero plural, unlike `pt` (Brazil).
    if language == "pt" && locale.region.is_some_and(|r| r.as_str() == "PT") {
        return Rule::OneOther;
    }
    match language {
        "en" | "de" | "nl" | "sv" | "da" | "nb" | "nn" | "no" | "fi" | "et" | "el"
        | "it" | "es" | "ca" | "gl" | "eu" | "af" | "sw" | "ur" | "bg" | "hu" | "tr" | "az"
        | "ka" | "kk" | "mn" | "sq" | "ta" | "te" | "ml" | "mr" | "ne" | "or" => Rule::OneOther,
        "fr" | "pt" | "hy" | "kab" | "ff" | "fa" | "hi" | "bn" | "gu" | "kn" | "am" | "zu" => {
            Rule::ZeroOneIsOne
        }
        "ja" | "zh" | "ko" | "th" | "vi" | "km" | "lo" | "my" | "yue" | "id" | "ms" => {
            Rule::OtherOnly
        }
        "is" => Rule::Icelandic,
        "ru" | "uk" | "be" => Rule::EastSlavic,
        "sr" | "hr" | "bs" | "sh" => Rule::SouthSlavic,
        "pl" => Rule::Polish,
        "cs" | "sk" => Rule::WestSlavic,
        "sl" => Rule::Slovenian,
        "lt" => Rule::Lithuanian,
        "lv" => Rule::Latvian,
        "ga" => Rule::Irish,
        "ro" | "mo" => Rule::Romanian,
        "ar" => Rule::Arabic,
        "he" | "iw" => Rule::Hebrew,
        _ => Rule::OtherOnly,
    }
}

/// Select the plural category of `quantity` for `locale`.
pub fn plural_category(locale: &LanguageIdentifier, quantity: i64) -> PluralCategory {
    use PluralCategory::*;

    let n = quantity.unsigned_abs();
    let n10 = n % 10;
    let n100 = n % 100;

    match rule_for(locale) {
        Rule::OneOther => {
            if n == 1 {
                One
            } else {
                Other
            }
        }
        Rule::ZeroOneIsOne => {
            if n <= 1 {
                One
            } else {
                Other
            }
        }
        Rule::Icelandic => {
            if n10 == 1 && n100 != 11 {
                One
            } else {
                Other
            }
        }
        Rule::OtherOnly => Other,
        Rule::EastSlavic => {
            if n10 == 1 && n100 != 11 {
                One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                Few
            } else {
                Many
            }
        }
        Rule::SouthSlavic => {
            if n10 == 1 && n100 != 11 {
                One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                Few
            } else {
                Other
            }
        }
        Rule::Polish => {
            if n == 1 {
                One
            } else if (2..=4).contains(&n10) && !(12..=14).contains(&n100) {
                Few
            } else {
                Many
            }
        }
        Rule::WestSlavic => match n {
            1 => One,
            2..=4 => Few,
            _ => Other,
        },
        Rule::Slovenian => match n100 {
            1 => One,
            2 => Two,
            3 | 4 => Few,
            _ => Other,
        },
        Rule::Lithuanian => {
            if (11..=19).contains(&n100) {
                Other
            } else if n10 == 1 {
                One
            } else if n10 >= 2 {
                Few
            } else {
                Other
            }
        }
        Rule::Latvian => {
            if n10 == 0 || (11..=19).contains(&n100) {
                Zero
            } else if n10 == 1 && n100 != 11 {
                One
            } else {
                Other
            }
        }
        Rule::Irish => match n {
            1 => One,
            2 => Two,
            3..=6 => Few,
            7..=10 => Many,
            _ => Other,
        },
        Rule::Romanian => {
            if n == 1 {
                One
            } else if n == 0 || (2..=19).contains(&n100) {
                Few
            } else {
                Other
            }
        }
        Rule::Arabic => match (n, n100) {
            (0, _) => Zero,
            (1, _) => One,
            (2, _) => Two,
            (_, 3..=10) => Few,
            (_, 11..=99) => Many,
            _ => Other,
        },
        Rule::Hebrew => match n {
            1 => One,
            2 => Two,
            _ => Other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unic_langid::langid;

    fn cats(locale: &LanguageIdentifier, ns: &[i64]) -> Vec<PluralCategory> {
        ns.iter().map(|&n| plural_category(locale, n)).collect()
    }

    #[test]
    fn english_one_other() {
        use PluralCategory::*;
        let en = langid!("en-US");
        assert_eq!(cats(&en, &[0, 1, 2, 5, 21]), vec![Other, One, Other, Other, Other]);
        assert_eq!(plural_category(&en, -1), One);
    }

    #[test]
    fn french_zero_is_singular() {
        use PluralCategory::*;
        let fr = langid!("fr");
        assert_eq!(cats(&fr, &[0, 1, 2]), vec![One, One, Other]);
    }

    #[test]
    fn icelandic_ends_in_one() {
        use PluralCategory::*;
        let is = langid!("is");
        assert_eq!(
            cats(&is, &[0, 1, 11, 21, 31, 101, 111]),
            vec![Other, One, Other, One, One, One, Other]
        );
    }

    #[test]
    fn portuguese_region_matters() {
        use PluralCategory::*;
        assert_eq!(cats(&langid!("pt-BR"), &[0, 1, 2]), vec![One, One, Other]);
        assert_eq!(cats(&langid!("pt"), &[0, 1, 2]), vec![One, One, Other]);
        assert_eq!(cats(&langid!("pt-PT"), &[0, 1, 2]), vec![Other, One, Other]);
    }

    #[test]
    fn russian_and_polish() {
        use PluralCategory::*;
        let ru = langid!("ru");
        assert_eq!(
            cats(&ru, &[1, 2, 5, 11, 21, 22, 112]),
            vec![One, Few, Many, Many, One, Few, Many]
        );

        let pl = langid!("pl");
        assert_eq!(cats(&pl, &[1, 2, 5, 21, 22]), vec![One, Few, Many, Many, Few]);
    }

    #[test]
    fn arabic_uses_all_categories() {
        use PluralCategory::*;
        let ar = langid!("ar");
        assert_eq!(
            cats(&ar, &[0, 1, 2, 3, 11, 100]),
            vec![Zero, One, Two, Few, Many, Other]
        );
    }

    #[test]
    fn unknown_and_cjk_are_other() {
        assert_eq!(plural_category(&langid!("ja"), 1), PluralCategory::Other);
        assert_eq!(plural_category(&langid!("tlh"), 1), PluralCategory::Other);
    }
}
