//! Defines all shop and crafted items, their properties, and prices.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Consumable,
    Equipment,
    Special,
}

pub struct ItemProperties {
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: ItemCategory,
    pub is_sellable: bool,
    pub buy_price: Option<i64>,
    pub sell_price: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Item {
    HealthPotion = 1,
    EnergyTonic = 2,
    LuckyCharm = 3,
    IronSword = 4,
    SteelShield = 5,
    RunebladeLongsword = 6,
    DrakehideArmor = 7,
    PetTreat = 8,
    DungeonTorch = 9,
    WarBanner = 10,
}

impl Item {
    pub fn properties(&self) -> ItemProperties {
        match self {
            Item::HealthPotion => ItemProperties {
                display_name: "Health Potion",
                description: "Restores a chunk of health between dungeon floors.",
                category: ItemCategory::Consumable,
                is_sellable: true,
                buy_price: Some(40),
                sell_price: Some(20),
            },
            Item::EnergyTonic => ItemProperties {
                display_name: "Energy Tonic",
                description: "A bitter brew that restores 5 energy instantly.",
                category: ItemCategory::Consumable,
                is_sellable: true,
                buy_price: Some(120),
                sell_price: Some(60),
            },
            Item::LuckyCharm => ItemProperties {
                display_name: "Lucky Charm",
                description: "A rabbit's foot on a silver chain. Surely it does something.",
                category: ItemCategory::Special,
                is_sellable: true,
                buy_price: Some(300),
                sell_price: Some(150),
            },
            Item::IronSword => ItemProperties {
                display_name: "Iron Sword",
                description: "A dependable blade for a starting adventurer.",
                category: ItemCategory::Equipment,
                is_sellable: true,
                buy_price: Some(250),
                sell_price: Some(125),
            },
            Item::SteelShield => ItemProperties {
                display_name: "Steel Shield",
                description: "Heavy, dented, and still better than dodging.",
                category: ItemCategory::Equipment,
                is_sellable: true,
                buy_price: Some(350),
                sell_price: Some(175),
            },
            Item::RunebladeLongsword => ItemProperties {
                display_name: "Runeblade Longsword",
                description: "Forged around a rune-etched plate. Crafting only.",
                category: ItemCategory::Equipment,
                is_sellable: true,
                buy_price: None,
                sell_price: Some(900),
            },
            Item::DrakehideArmor => ItemProperties {
                display_name: "Drakehide Armor",
                description: "Dragon scale layered over wolf pelt. Crafting only.",
                category: ItemCategory::Equipment,
                is_sellable: true,
                buy_price: None,
                sell_price: Some(1400),
            },
            Item::PetTreat => ItemProperties {
                display_name: "Pet Treat",
                description: "Dried meat strips. Pets train harder for these.",
                category: ItemCategory::Consumable,
                is_sellable: true,
                buy_price: Some(60),
                sell_price: Some(30),
            },
            Item::DungeonTorch => ItemProperties {
                display_name: "Dungeon Torch",
                description: "Burns for exactly one dungeon, somehow.",
                category: ItemCategory::Consumable,
                is_sellable: true,
                buy_price: Some(30),
                sell_price: Some(15),
            },
            Item::WarBanner => ItemProperties {
                display_name: "War Banner",
                description: "Raised by guilds marching to war.",
                category: ItemCategory::Special,
                is_sellable: false,
                buy_price: Some(500),
                sell_price: None,
            },
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.properties().display_name
    }

    pub fn from_i32(id: i32) -> Option<Item> {
        let item = match id {
            1 => Item::HealthPotion,
            2 => Item::EnergyTonic,
            3 => Item::LuckyCharm,
            4 => Item::IronSword,
            5 => Item::SteelShield,
            6 => Item::RunebladeLongsword,
            7 => Item::DrakehideArmor,
            8 => Item::PetTreat,
            9 => Item::DungeonTorch,
            10 => Item::WarBanner,
            _ => return None,
        };
        Some(item)
    }

    /// Every item purchasable with gold, in shop display order.
    pub fn shop_stock() -> &'static [Item] {
        &[
            Item::HealthPotion,
            Item::EnergyTonic,
            Item::DungeonTorch,
            Item::PetTreat,
            Item::IronSword,
            Item::SteelShield,
            Item::LuckyCharm,
            Item::WarBanner,
        ]
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Item {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Health Potion" => Ok(Item::HealthPotion),
            "Energy Tonic" => Ok(Item::EnergyTonic),
            "Lucky Charm" => Ok(Item::LuckyCharm),
            "Iron Sword" => Ok(Item::IronSword),
            "Steel Shield" => Ok(Item::SteelShield),
            "Runeblade Longsword" => Ok(Item::RunebladeLongsword),
            "Drakehide Armor" => Ok(Item::DrakehideArmor),
            "Pet Treat" => Ok(Item::PetTreat),
            "Dungeon Torch" => Ok(Item::DungeonTorch),
            "War Banner" => Ok(Item::WarBanner),
            _ => Err(()),
        }
    }
}
