//! Fixed product sample table backing the values API.
//!
//! Stands in for a relational product catalog; the rows never change at
//! runtime.

const PRODUCT_NAMES: &[&str] = &[
    "Mountain-100 Silver, 38",
    "Mountain-100 Silver, 42",
    "Mountain-100 Black, 38",
    "Mountain-100 Black, 44",
    "Mountain-200 Silver, 38",
    "Mountain-200 Black, 42",
    "Road-150 Red, 44",
    "Road-150 Red, 48",
    "Road-150 Red, 52",
    "Road-250 Black, 44",
    "Road-250 Red, 58",
    "Road-350-W Yellow, 40",
    "Road-550-W Yellow, 38",
    "Road-650 Red, 44",
    "Road-650 Black, 52",
    "Touring-1000 Blue, 46",
    "Touring-1000 Yellow, 50",
    "Touring-2000 Blue, 54",
    "Touring-3000 Yellow, 58",
    "HL Mountain Frame - Silver, 42",
    "HL Mountain Frame - Black, 38",
    "LL Road Frame - Red, 60",
    "ML Road Frame - Red, 48",
    "HL Road Frame - Red, 56",
    "Classic Vest, S",
    "Classic Vest, M",
    "Long-Sleeve Logo Jersey, S",
    "Long-Sleeve Logo Jersey, L",
    "Short-Sleeve Classic Jersey, M",
    "Short-Sleeve Classic Jersey, XL",
    "Sport-100 Helmet, Red",
    "Sport-100 Helmet, Black",
    "Sport-100 Helmet, Blue",
    "Water Bottle - 30 oz.",
    "Mountain Bottle Cage",
    "Road Bottle Cage",
    "Patch Kit/8 Patches",
    "Bike Wash - Dissolver",
    "Fender Set - Mountain",
    "All-Purpose Bike Stand",
];

/// First `limit` product names, in table order.
pub fn top_names(limit: usize) -> Vec<String> {
    PRODUCT_NAMES
        .iter()
        .take(limit)
        .map(|name| name.to_string())
        .collect()
}

pub fn count() -> usize {
    PRODUCT_NAMES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_names_caps_at_table_size() {
        assert_eq!(top_names(100).len(), count());
        assert_eq!(top_names(3).len(), 3);
        assert_eq!(top_names(1)[0], "Mountain-100 Silver, 38");
    }
}
