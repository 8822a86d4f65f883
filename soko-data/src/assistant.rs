//! Rule-based market price assistant for English and Swahili questions.
//!
//! There is no model here: the reply is chosen by keyword matching against
//! the commodities and counties present in the current [`PriceIndex`].

use crate::index::PriceIndex;
use soko_prices::record::PriceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Swahili,
}

const SWAHILI_MARKERS: &[&str] = &[
    "bei", "ya", "ni", "gani", "habari", "jambo", "wapi", "soko", "leo", "nini", "sasa",
    "shamba", "kiasi", "naomba", "tafadhali", "asante", "kwa", "katika", "je", "hujambo",
];

const ENGLISH_MARKERS: &[&str] = &[
    "price", "prices", "what", "is", "the", "how", "much", "where", "market", "hello", "hi",
    "today", "of", "in", "cost", "please", "thanks",
];

const GREETINGS: &[&str] = &["hello", "hi", "hey", "habari", "jambo", "hujambo", "mambo"];

/// Swahili commodity words and the English word they map to.
const COMMODITY_ALIASES: &[(&str, &str)] = &[
    ("mahindi", "maize"),
    ("maharagwe", "beans"),
    ("viazi", "potatoes"),
    ("nyanya", "tomatoes"),
    ("sukuma", "kales"),
    ("kabichi", "cabbage"),
    ("vitunguu", "onions"),
    ("ndizi", "bananas"),
    ("mchele", "rice"),
    ("ngano", "wheat"),
    ("maziwa", "milk"),
    ("mtama", "sorghum"),
    ("ndengu", "green grams"),
    ("wimbi", "finger millet"),
];

fn words(message: &str) -> Vec<String> {
    message
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Guess the language of a message from marker words.
///
/// Swahili is chosen only when it has strictly more marker hits than English.
pub fn detect_language(message: &str) -> Language {
    let words = words(message);
    let swahili = count_markers(&words, SWAHILI_MARKERS) + count_aliases(&words);
    let english = count_markers(&words, ENGLISH_MARKERS);
    if swahili > english {
        Language::Swahili
    } else {
        Language::English
    }
}

fn count_markers(words: &[String], markers: &[&str]) -> usize {
    words
        .iter()
        .filter(|w| markers.iter().any(|m| *m == w.as_str()))
        .count()
}

fn count_aliases(words: &[String]) -> usize {
    words
        .iter()
        .filter(|w| COMMODITY_ALIASES.iter().any(|(sw, _)| *sw == w.as_str()))
        .count()
}

/// True when `phrase` occurs in `tokens` as consecutive whole words.
fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && tokens.windows(phrase.len()).any(|w| w == phrase)
}

/// The first commodity in `index` named in the message, directly or via a Swahili alias.
///
/// Multi-word names also match on any of their longer words ("potatoes" for
/// "Irish Potatoes").
fn find_commodity<'a>(tokens: &[String], index: &'a PriceIndex) -> Option<&'a str> {
    let aliased: Vec<Vec<String>> = COMMODITY_ALIASES
        .iter()
        .filter(|(sw, _)| tokens.iter().any(|t| t == sw))
        .map(|(_, en)| words(en))
        .collect();
    index.commodities().find(|commodity| {
        let name = words(commodity);
        contains_phrase(tokens, &name)
            || name.iter().any(|w| w.len() > 3 && tokens.contains(w))
            || aliased.iter().any(|en| contains_phrase(&name, en))
    })
}

fn find_county<'a>(tokens: &[String], index: &'a PriceIndex) -> Option<&'a str> {
    index
        .counties()
        .find(|county| contains_phrase(tokens, &words(county)))
}

struct PriceFacts<'a> {
    unit: &'a str,
    average: f64,
    cheapest: &'a PriceRecord,
    markets: usize,
}

/// Average and cheapest record over the records sharing the first record's unit.
fn price_facts<'a>(records: &[&'a PriceRecord]) -> Option<PriceFacts<'a>> {
    let first: &'a PriceRecord = records.first().copied()?;
    let unit = first.unit.as_str();
    let same_unit: Vec<&PriceRecord> = records.iter().copied().filter(|r| r.unit == unit).collect();
    let cheapest = same_unit
        .iter()
        .copied()
        .min_by(|a, b| a.price.total_cmp(&b.price))?;
    let average = same_unit.iter().map(|r| r.price).sum::<f64>() / same_unit.len() as f64;
    let mut markets: Vec<&str> = same_unit.iter().map(|r| r.market.as_str()).collect();
    markets.sort_unstable();
    markets.dedup();
    Some(PriceFacts {
        unit,
        average,
        cheapest,
        markets: markets.len(),
    })
}

fn describe(
    language: Language,
    commodity: &str,
    place: Option<&str>,
    facts: &PriceFacts,
) -> String {
    match language {
        Language::English => format!(
            "{}{}: average KES {:.2} per {} across {} market(s); lowest KES {:.2} at {} ({}).",
            commodity,
            place.map(|p| format!(" in {}", p)).unwrap_or_default(),
            facts.average,
            facts.unit,
            facts.markets,
            facts.cheapest.price,
            facts.cheapest.market,
            facts.cheapest.county,
        ),
        Language::Swahili => format!(
            "Bei ya {}{}: wastani KES {:.2} kwa {} katika masoko {}; bei ya chini KES {:.2} huko {} ({}).",
            commodity,
            place.map(|p| format!(" katika {}", p)).unwrap_or_default(),
            facts.average,
            facts.unit,
            facts.markets,
            facts.cheapest.price,
            facts.cheapest.market,
            facts.cheapest.county,
        ),
    }
}

/// Answer a farmer's message from the prices in `index`.
pub fn generate_response(message: &str, index: &PriceIndex) -> String {
    let language = detect_language(message);
    let tokens = words(message);
    let commodity = find_commodity(&tokens, index);
    let county = find_county(&tokens, index);
    log::debug!(
        "assistant: language={:?} commodity={:?} county={:?}",
        language,
        commodity,
        county
    );

    let Some(commodity) = commodity else {
        let greeted = tokens
            .iter()
            .any(|w| GREETINGS.iter().any(|g| *g == w.as_str()));
        return match (language, greeted) {
            (Language::English, true) => {
                "Hello! Ask me about market prices, e.g. \"price of maize in Nakuru\".".to_string()
            }
            (Language::Swahili, true) => {
                "Habari! Niulize kuhusu bei za soko, mfano \"bei ya mahindi Nakuru\".".to_string()
            }
            (Language::English, false) => {
                "I can share market prices. Ask e.g. \"price of maize in Nakuru\".".to_string()
            }
            (Language::Swahili, false) => {
                "Naweza kukupa bei za soko. Uliza mfano \"bei ya mahindi Nakuru\".".to_string()
            }
        };
    };

    let records: Vec<&PriceRecord> = match county {
        Some(county) => index
            .commodity_prices
            .get(commodity)
            .and_then(|by_county| by_county.get(county))
            .map(|bucket| bucket.iter().collect())
            .unwrap_or_default(),
        None => index.commodity_records(commodity),
    };

    match price_facts(&records) {
        Some(facts) => describe(language, commodity, county, &facts),
        None => {
            let place = county.unwrap_or_default();
            match language {
                Language::English => {
                    format!("No {} prices recorded for {} yet.", commodity, place)
                }
                Language::Swahili => {
                    format!("Hakuna bei ya {} iliyorekodiwa {} bado.", commodity, place)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::sample_records;

    #[test]
    fn detects_swahili_and_english() {
        assert_eq!(detect_language("Bei ya mahindi ni gani leo?"), Language::Swahili);
        assert_eq!(detect_language("What is the price of maize?"), Language::English);
        assert_eq!(detect_language(""), Language::English);
    }

    #[test]
    fn answers_commodity_in_county() {
        let index = PriceIndex::build(&sample_records());
        let reply = generate_response("What is the price of maize in Nakuru?", &index);
        assert_eq!(
            reply,
            "Maize in Nakuru: average KES 46.25 per kg across 2 market(s); lowest KES 45.00 at Nakuru Town (Nakuru)."
        );
    }

    #[test]
    fn answers_in_swahili_via_alias() {
        let index = PriceIndex::build(&sample_records());
        let reply = generate_response("Bei ya mahindi ni gani leo?", &index);
        assert!(reply.starts_with("Bei ya Maize: wastani KES 44.17"), "{}", reply);
        assert!(reply.contains("Eldoret"));
    }

    #[test]
    fn commodity_without_county_data() {
        let index = PriceIndex::build(&sample_records());
        let reply = generate_response("price of maize in Kiambu", &index);
        // Kiambu is a known county (beans only), so no maize bucket
        assert_eq!(reply, "No Maize prices recorded for Kiambu yet.");
    }

    #[test]
    fn greeting_and_fallback() {
        let index = PriceIndex::build(&sample_records());
        assert!(generate_response("Hello there", &index).starts_with("Hello!"));
        assert!(generate_response("Habari yako, jambo", &index).starts_with("Habari!"));
        assert!(generate_response("weather tomorrow", &index).starts_with("I can share"));
    }

    #[test]
    fn names_match_whole_words_only() {
        let index = PriceIndex::build(&[
            PriceRecord::new("Rice", "Kirinyaga", "Mwea", 120.0, "kg", "2024-01-01"),
            PriceRecord::new("Maize", "Nakuru", "Nakuru Town", 45.0, "kg", "2024-01-01"),
        ]);
        // "price" must not be read as "rice"
        let reply = generate_response("What is the price of maize in Nakuru?", &index);
        assert_eq!(
            reply,
            "Maize in Nakuru: average KES 45.00 per kg across 1 market(s); lowest KES 45.00 at Nakuru Town (Nakuru)."
        );
        let rice = generate_response("price of rice", &index);
        assert!(rice.starts_with("Rice: average KES 120.00"), "{}", rice);
        let mchele = generate_response("bei ya mchele", &index);
        assert!(mchele.starts_with("Bei ya Rice"), "{}", mchele);
    }

    #[test]
    fn multi_word_names() {
        let index = PriceIndex::build(&[
            PriceRecord::new("Irish Potatoes", "Nyandarua", "Ol Kalou", 2500.0, "bag", ""),
            PriceRecord::new("Irish Potatoes", "Uasin Gishu", "Eldoret", 2300.0, "bag", ""),
        ]);
        let reply = generate_response("price of potatoes in uasin gishu", &index);
        assert!(
            reply.starts_with("Irish Potatoes in Uasin Gishu: average KES 2300.00 per bag"),
            "{}",
            reply
        );
        let viazi = generate_response("bei ya viazi", &index);
        assert!(viazi.starts_with("Bei ya Irish Potatoes"), "{}", viazi);
    }

    #[test]
    fn empty_index_falls_back() {
        let index = PriceIndex::build(&[]);
        let reply = generate_response("price of maize", &index);
        assert!(reply.starts_with("I can share"));
    }
}
