//! Defines all crafting materials and the fixed per-tier drop pools
//! used by the loot engine.

use std::fmt;

/// Rarity tier of a material. Ordering matters: weighted rarity selection
/// indexes tiers from `Common` (0) to `Legendary` (4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl MaterialTier {
    pub const ALL: [MaterialTier; 5] = [
        MaterialTier::Common,
        MaterialTier::Uncommon,
        MaterialTier::Rare,
        MaterialTier::Epic,
        MaterialTier::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialTier::Common => "Common",
            MaterialTier::Uncommon => "Uncommon",
            MaterialTier::Rare => "Rare",
            MaterialTier::Epic => "Epic",
            MaterialTier::Legendary => "Legendary",
        }
    }

    /// Accent color used by the browser client when rendering drops.
    pub fn color(&self) -> u32 {
        match self {
            MaterialTier::Common => 0x95A5A6,
            MaterialTier::Uncommon => 0x2ECC71,
            MaterialTier::Rare => 0x3498DB,
            MaterialTier::Epic => 0x9B59B6,
            MaterialTier::Legendary => 0xF1C40F,
        }
    }
}

impl fmt::Display for MaterialTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct MaterialProperties {
    pub display_name: &'static str,
    pub description: &'static str,
    pub tier: MaterialTier,
    pub sell_price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Material {
    IronShard = 1,
    LeatherStrip = 2,
    ClothScrap = 3,
    BoneFragment = 4,
    SilverDust = 5,
    HardwoodPlank = 6,
    WolfPelt = 7,
    MoonstoneChip = 8,
    RunePlate = 9,
    EmberCrystal = 10,
    DragonScale = 11,
    VoidEssence = 12,
    PhoenixFeather = 13,
    StarforgedCore = 14,
}

impl Material {
    pub fn properties(&self) -> MaterialProperties {
        match self {
            Material::IronShard => MaterialProperties {
                display_name: "Iron Shard",
                description: "A jagged sliver of raw iron. Smiths buy these by the crate.",
                tier: MaterialTier::Common,
                sell_price: 8,
            },
            Material::LeatherStrip => MaterialProperties {
                display_name: "Leather Strip",
                description: "Cured hide cut into workable strips.",
                tier: MaterialTier::Common,
                sell_price: 6,
            },
            Material::ClothScrap => MaterialProperties {
                display_name: "Cloth Scrap",
                description: "Torn cloth salvaged from the battlefield.",
                tier: MaterialTier::Common,
                sell_price: 5,
            },
            Material::BoneFragment => MaterialProperties {
                display_name: "Bone Fragment",
                description: "A splinter of monster bone, surprisingly sturdy.",
                tier: MaterialTier::Common,
                sell_price: 7,
            },
            Material::SilverDust => MaterialProperties {
                display_name: "Silver Dust",
                description: "Fine silver powder used in wardings and filigree.",
                tier: MaterialTier::Uncommon,
                sell_price: 25,
            },
            Material::HardwoodPlank => MaterialProperties {
                display_name: "Hardwood Plank",
                description: "Dense timber from the deep forest.",
                tier: MaterialTier::Uncommon,
                sell_price: 20,
            },
            Material::WolfPelt => MaterialProperties {
                display_name: "Wolf Pelt",
                description: "A thick pelt taken from a dire wolf.",
                tier: MaterialTier::Uncommon,
                sell_price: 30,
            },
            Material::MoonstoneChip => MaterialProperties {
                display_name: "Moonstone Chip",
                description: "A pale gem that glows faintly at night.",
                tier: MaterialTier::Rare,
                sell_price: 90,
            },
            Material::RunePlate => MaterialProperties {
                display_name: "Rune-Etched Plate",
                description: "A metal plate carrying a half-worn enchantment.",
                tier: MaterialTier::Rare,
                sell_price: 110,
            },
            Material::EmberCrystal => MaterialProperties {
                display_name: "Ember Crystal",
                description: "Warm to the touch. Never stops smoldering.",
                tier: MaterialTier::Rare,
                sell_price: 120,
            },
            Material::DragonScale => MaterialProperties {
                display_name: "Dragon Scale",
                description: "A scale shed by a true dragon. Harder than steel.",
                tier: MaterialTier::Epic,
                sell_price: 400,
            },
            Material::VoidEssence => MaterialProperties {
                display_name: "Void Essence",
                description: "Bottled nothing. Handle with gloves.",
                tier: MaterialTier::Epic,
                sell_price: 450,
            },
            Material::PhoenixFeather => MaterialProperties {
                display_name: "Phoenix Feather",
                description: "Still warm. Said to kindle second chances.",
                tier: MaterialTier::Legendary,
                sell_price: 1500,
            },
            Material::StarforgedCore => MaterialProperties {
                display_name: "Starforged Core",
                description: "A heart of metal that fell from the sky.",
                tier: MaterialTier::Legendary,
                sell_price: 2000,
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.properties().display_name
    }

    pub fn tier(&self) -> MaterialTier {
        self.properties().tier
    }

    /// The fixed pool a material id is drawn from once a tier has been
    /// selected by the loot engine. Pools are disjoint and cover every
    /// material exactly once.
    pub fn pool(tier: MaterialTier) -> &'static [Material] {
        match tier {
            MaterialTier::Common => &[
                Material::IronShard,
                Material::LeatherStrip,
                Material::ClothScrap,
                Material::BoneFragment,
            ],
            MaterialTier::Uncommon => &[
                Material::SilverDust,
                Material::HardwoodPlank,
                Material::WolfPelt,
            ],
            MaterialTier::Rare => &[
                Material::MoonstoneChip,
                Material::RunePlate,
                Material::EmberCrystal,
            ],
            MaterialTier::Epic => &[Material::DragonScale, Material::VoidEssence],
            MaterialTier::Legendary => &[Material::PhoenixFeather, Material::StarforgedCore],
        }
    }

    pub fn from_i32(id: i32) -> Option<Material> {
        let material = match id {
            1 => Material::IronShard,
            2 => Material::LeatherStrip,
            3 => Material::ClothScrap,
            4 => Material::BoneFragment,
            5 => Material::SilverDust,
            6 => Material::HardwoodPlank,
            7 => Material::WolfPelt,
            8 => Material::MoonstoneChip,
            9 => Material::RunePlate,
            10 => Material::EmberCrystal,
            11 => Material::DragonScale,
            12 => Material::VoidEssence,
            13 => Material::PhoenixFeather,
            14 => Material::StarforgedCore,
            _ => return None,
        };
        Some(material)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
