//! Waste category catalog.
//!
//! Six fixed categories, each with display metadata and disposal guidance.
//! The table is static and read-only for the lifetime of the process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of one of the six waste categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    /// Food scraps and other biodegradable waste
    Organic,
    /// Plastic packaging, bottles and bags
    Plastic,
    /// Paper and cardboard
    Paper,
    /// Glass bottles and jars
    Glass,
    /// Cans, lids, foil and other metal objects
    Metal,
    /// Batteries, chemicals, medicines and electronics
    Hazardous,
}

impl CategoryKey {
    /// All categories in display order.
    pub const ALL: [CategoryKey; 6] = [
        CategoryKey::Organic,
        CategoryKey::Plastic,
        CategoryKey::Paper,
        CategoryKey::Glass,
        CategoryKey::Metal,
        CategoryKey::Hazardous,
    ];

    /// Lowercase identifier used in config files and host commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Organic => "organic",
            CategoryKey::Plastic => "plastic",
            CategoryKey::Paper => "paper",
            CategoryKey::Glass => "glass",
            CategoryKey::Metal => "metal",
            CategoryKey::Hazardous => "hazardous",
        }
    }

    /// Display metadata for this category.
    pub fn info(&self) -> &'static CategoryInfo {
        lookup(*self)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown waste category: '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for CategoryKey {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(wanted.to_string()))
    }
}

/// Display metadata and disposal guidance for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Display name shown in the result card
    pub name: &'static str,
    /// Background color token for the icon badge
    pub color_token: &'static str,
    /// Text color token for the name and icon
    pub text_color_token: &'static str,
    /// Icon token
    pub icon_token: &'static str,
    /// What kind of items belong to the category
    pub description: &'static str,
    /// Where the waste should be deposited
    pub disposal: &'static str,
    /// Practical recycling advice
    pub tips: &'static str,
}

static ORGANIC: CategoryInfo = CategoryInfo {
    name: "Orgánico",
    color_token: "bg-green-100",
    text_color_token: "text-green-800",
    icon_token: "fas fa-trash",
    description: "Residuos biodegradables como restos de comida, cáscaras, etc.",
    disposal: "Contenedor marrón o compostera",
    tips: "Puedes compostar estos residuos para crear abono natural.",
};

static PLASTIC: CategoryInfo = CategoryInfo {
    name: "Plástico",
    color_token: "bg-yellow-100",
    text_color_token: "text-yellow-800",
    icon_token: "fas fa-recycle",
    description: "Envases, botellas, bolsas y otros productos plásticos.",
    disposal: "Contenedor amarillo",
    tips: "Lava los envases antes de reciclarlos. Reduce el uso de plásticos de un solo uso.",
};

static PAPER: CategoryInfo = CategoryInfo {
    name: "Papel/Cartón",
    color_token: "bg-blue-100",
    text_color_token: "text-blue-800",
    icon_token: "fas fa-file-alt",
    description: "Periódicos, revistas, cajas de cartón, papel de oficina, etc.",
    disposal: "Contenedor azul",
    tips: "Aplana las cajas para ahorrar espacio. No recicles papel sucio o con restos de comida.",
};

static GLASS: CategoryInfo = CategoryInfo {
    name: "Vidrio",
    color_token: "bg-purple-100",
    text_color_token: "text-purple-800",
    icon_token: "fas fa-wine-bottle",
    description: "Botellas, frascos y otros envases de vidrio.",
    disposal: "Contenedor verde",
    tips: "Quita tapas y corchos antes de reciclar. No mezcles con cerámica o cristal.",
};

static METAL: CategoryInfo = CategoryInfo {
    name: "Metal",
    color_token: "bg-gray-100",
    text_color_token: "text-gray-800",
    icon_token: "fas fa-cogs",
    description: "Latas, tapas, papel aluminio y otros objetos metálicos.",
    disposal: "Contenedor amarillo (envases) o punto limpio (otros metales)",
    tips: "Aplasta las latas para ahorrar espacio. Separa los metales ferrosos y no ferrosos.",
};

static HAZARDOUS: CategoryInfo = CategoryInfo {
    name: "Peligroso",
    color_token: "bg-red-100",
    text_color_token: "text-red-800",
    icon_token: "fas fa-biohazard",
    description: "Baterías, productos químicos, medicamentos, electrónicos.",
    disposal: "Punto limpio o contenedores especiales",
    tips: "Nunca tires estos residuos a la basura normal. Sigue las instrucciones de eliminación.",
};

/// Look up the metadata for a category. Total over all keys.
pub fn lookup(key: CategoryKey) -> &'static CategoryInfo {
    match key {
        CategoryKey::Organic => &ORGANIC,
        CategoryKey::Plastic => &PLASTIC,
        CategoryKey::Paper => &PAPER,
        CategoryKey::Glass => &GLASS,
        CategoryKey::Metal => &METAL,
        CategoryKey::Hazardous => &HAZARDOUS,
    }
}
