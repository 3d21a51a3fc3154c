use serde::Serialize;

/// Category id that switches the search screen to "by vehicle brand" browsing.
/// Selecting it disables the category predicate instead of matching on it.
pub const CATEGORY_BY_BRAND: &str = "by-brand";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartCategory {
    pub id: &'static str,
    pub name: &'static str,
}

pub const PART_CATEGORIES: &[PartCategory] = &[
    PartCategory { id: "engine", name: "Engine & Drivetrain" },
    PartCategory { id: "suspension", name: "Suspension & Steering" },
    PartCategory { id: "brakes", name: "Brakes" },
    PartCategory { id: "body", name: "Body Parts" },
    PartCategory { id: "electrical", name: "Lights & Electrical" },
    PartCategory { id: "tyres", name: "Tyres & Wheels" },
    PartCategory { id: "interior", name: "Interior Parts" },
    PartCategory { id: "exterior", name: "Exterior Accessories" },
    PartCategory { id: "fluids", name: "Fluids & Lubricants" },
    PartCategory { id: "tools", name: "Tools & Equipment" },
    PartCategory { id: "performance", name: "Performance Mods" },
    PartCategory { id: CATEGORY_BY_BRAND, name: "By Vehicle Brand" },
];

#[must_use]
pub fn find_category(id: &str) -> Option<&'static PartCategory> {
    PART_CATEGORIES.iter().find(|c| c.id == id)
}
