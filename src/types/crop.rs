//! Crop lookup table and label resolution

use std::collections::HashMap;
use std::sync::LazyLock;

/// Label returned for class codes the table does not know.
pub const UNKNOWN_CROP: &str = "Unknown Crop";

/// Class code to crop name, as encoded when the classifier was trained.
pub const CROP_TABLE: [(i64, &str); 22] = [
    (1, "Rice"),
    (2, "Maize"),
    (3, "Jute"),
    (4, "Cotton"),
    (5, "Coconut"),
    (6, "Papaya"),
    (7, "Orange"),
    (8, "Apple"),
    (9, "Muskmelon"),
    (10, "Watermelon"),
    (11, "Grapes"),
    (12, "Mango"),
    (13, "Banana"),
    (14, "Pomegranate"),
    (15, "Lentil"),
    (16, "Blackgram"),
    (17, "Mungbean"),
    (18, "Mothbeans"),
    (19, "Pigeonpeas"),
    (20, "Kidneybeans"),
    (21, "Chickpea"),
    (22, "Coffee"),
];

static CROPS: LazyLock<HashMap<i64, &'static str>> =
    LazyLock::new(|| CROP_TABLE.iter().copied().collect());

/// Resolve a class code to its crop name.
///
/// Never fails: unrecognised codes resolve to [`UNKNOWN_CROP`].
pub fn crop_name(code: i64) -> &'static str {
    CROPS.get(&code).copied().unwrap_or(UNKNOWN_CROP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_resolves() {
        for (code, name) in CROP_TABLE {
            assert_eq!(crop_name(code), name);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(crop_name(1), "Rice");
        assert_eq!(crop_name(22), "Coffee");
        assert_eq!(crop_name(0), UNKNOWN_CROP);
        assert_eq!(crop_name(23), UNKNOWN_CROP);
        assert_eq!(crop_name(-5), UNKNOWN_CROP);
    }

    #[test]
    fn test_codes_are_contiguous_and_unique() {
        let codes: Vec<i64> = CROP_TABLE.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes, (1..=22).collect::<Vec<i64>>());
        assert_eq!(CROPS.len(), CROP_TABLE.len());
    }
}
