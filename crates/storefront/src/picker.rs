//! Store name suggestions for the store picker.

use rand::Rng;
use rand::seq::IndexedRandom;

const ADJECTIVES: &[&str] = &[
    "adorable", "beautiful", "clean", "drab", "elegant", "fancy", "glamorous", "handsome",
    "long", "magnificent", "old-fashioned", "plain", "quaint", "sparkling", "ugliest",
    "unsightly", "angry", "bewildered", "clumsy", "defeated", "embarrassed", "fierce",
    "grumpy", "helpless", "itchy", "jealous", "lazy", "mysterious", "nervous", "obnoxious",
    "panicky", "repulsive", "scary", "thoughtless", "uptight", "worried",
];

const NOUNS: &[&str] = &[
    "anchovy", "barracuda", "catfish", "dogfish", "eel", "flounder", "grouper", "haddock",
    "herring", "jellyfish", "kingfish", "lobster", "mackerel", "marlin", "octopus", "oyster",
    "perch", "pike", "prawn", "salmon", "sardine", "scallop", "shark", "shrimp", "snapper",
    "squid", "sturgeon", "swordfish", "trout", "tuna", "walleye",
];

/// Suggest a store name like `sparkling-grumpy-halibut`.
#[must_use]
pub fn fun_name() -> String {
    fun_name_with(&mut rand::rng())
}

/// Suggest a store name using the given random source.
pub fn fun_name_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = ADJECTIVES.choose(rng).copied().unwrap_or("fresh");
    let second = ADJECTIVES.choose(rng).copied().unwrap_or("salty");
    let noun = NOUNS.choose(rng).copied().unwrap_or("fish");
    format!("{first}-{second}-{noun}")
}
