//! Demo inventory used to populate a fresh store.

use catch_of_the_day_core::{Fish, FishKey, FishStatus, Inventory, Price};

/// The nine-fish demo inventory, keyed `fish1` through `fish9`.
#[must_use]
pub fn sample_fishes() -> Inventory {
    [
        (
            "fish1",
            "Pacific Halibut",
            1724,
            "Everyone's favorite white fish. We will cut it to the size you need and ship it.",
            "/images/halibut.jpg",
        ),
        (
            "fish2",
            "Lobster",
            3200,
            "These tender, mouth-watering beauties are a fantastic hit at any dinner party.",
            "/images/lobster.jpg",
        ),
        (
            "fish3",
            "Sea Scallops",
            1684,
            "Big, sweet and tender. True dry-pack scallops from the icy waters of Alaska.",
            "/images/scallops.jpg",
        ),
        (
            "fish4",
            "Mahi Mahi",
            1129,
            "Lean flesh with a mild, sweet flavor profile, moderately firm texture and large, moist flakes.",
            "/images/mahi.jpg",
        ),
        (
            "fish5",
            "King Crab",
            4234,
            "Crack these open and enjoy them plain or with one of our cocktail sauces.",
            "/images/king-crab.jpg",
        ),
        (
            "fish6",
            "Atlantic Salmon",
            1453,
            "This flaky, oily salmon is truly the king of the sea. Bake it, grill it, broil it.",
            "/images/salmon.jpg",
        ),
        (
            "fish7",
            "Oysters",
            2543,
            "A soft plump oyster with a sweet salty flavor and a clean finish.",
            "/images/oysters.jpg",
        ),
        (
            "fish8",
            "Mussels",
            425,
            "The best mussels from the Pacific Northwest with a full-flavored and complex taste.",
            "/images/mussels.jpg",
        ),
        (
            "fish9",
            "Jumbo Prawns",
            2250,
            "With 21-25 two bite prawns in each pound, these sweet morsels are perfect for shish-kebabs.",
            "/images/prawns.jpg",
        ),
    ]
    .into_iter()
    .map(|(key, name, cents, desc, image)| {
        (
            FishKey::from(key),
            Fish::new(name, Price::from_cents(cents), FishStatus::Available)
                .with_desc(desc)
                .with_image(image),
        )
    })
    .collect()
}
