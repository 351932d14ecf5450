//! # Store Entities
//!
//! Catalogue, cart and balance records returned by the Store API.
//! The API omits fields freely, so every field defaults when absent.

use crate::parse::de;
use serde::{Deserialize, Serialize};

/// Bucket name for items that belong to no group
pub const UNGROUPED_GROUP_NAME: &str = "Ungrouped";

/// Item type reported for virtual currencies
pub const VIRTUAL_CURRENCY_TYPE: &str = "virtual_currency";

/// Real-money price of an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount_without_discount: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub is_default: bool,
}

impl ItemPrice {
    /// Format for display (e.g., "1.99 USD")
    pub fn display(&self) -> String {
        format!("{} {}", self.amount, self.currency)
    }

    pub fn has_discount(&self) -> bool {
        self.amount_without_discount > self.amount
    }
}

/// Price expressed in a virtual currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualPrice {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: f64,
    #[serde(default)]
    pub is_default: bool,
}

/// Group reference embedded in an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroup {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub name: String,
}

/// A catalogue item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub groups: Vec<ItemGroup>,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prices: Vec<ItemPrice>,
    #[serde(default)]
    pub virtual_prices: Vec<VirtualPrice>,
    #[serde(default)]
    pub is_free: bool,
}

impl StoreItem {
    /// The price flagged as default, else the first listed
    pub fn default_price(&self) -> Option<&ItemPrice> {
        self.prices
            .iter()
            .find(|p| p.is_default)
            .or_else(|| self.prices.first())
    }

    pub fn is_virtual_currency(&self) -> bool {
        self.item_type == VIRTUAL_CURRENCY_TYPE
    }

    pub fn is_ungrouped(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Response of the item list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreItems {
    #[serde(default)]
    pub items: Vec<StoreItem>,
}

impl StoreItems {
    /// Find an item by SKU
    pub fn find(&self, sku: &str) -> Option<&StoreItem> {
        self.items.iter().find(|i| i.sku == sku)
    }

    /// Distinct group names in first-seen order.
    ///
    /// Items without groups land in [`UNGROUPED_GROUP_NAME`].
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for item in &self.items {
            if item.is_ungrouped() {
                if !names.iter().any(|n| n == UNGROUPED_GROUP_NAME) {
                    names.push(UNGROUPED_GROUP_NAME.to_string());
                }
                continue;
            }
            for group in &item.groups {
                if !names.contains(&group.name) {
                    names.push(group.name.clone());
                }
            }
        }
        names
    }

    /// Items belonging to the named group
    pub fn in_group<'a>(&'a self, group_name: &'a str) -> impl Iterator<Item = &'a StoreItem> + 'a {
        self.items.iter().filter(move |item| {
            if group_name == UNGROUPED_GROUP_NAME && item.is_ungrouped() {
                return true;
            }
            item.groups.iter().any(|g| g.name == group_name)
        })
    }

    /// Items that are virtual currencies
    pub fn virtual_currencies(&self) -> impl Iterator<Item = &StoreItem> {
        self.items.iter().filter(|i| i.is_virtual_currency())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A catalogue group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub parent_external_id: Option<String>,
    #[serde(default)]
    pub children: Vec<Group>,
}

/// Response of the groups endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Groups {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// A user's cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, alias = "cart_id", deserialize_with = "de_cart_id")]
    pub id: String,
}

fn de_cart_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(de::opt_string(deserializer)?.unwrap_or_default())
}

impl Cart {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Cart total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPrice {
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount_without_discount: f64,
    #[serde(default)]
    pub currency: String,
}

/// Line in a cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<ItemPrice>,
    #[serde(default)]
    pub is_free: bool,
}

/// Contents of a cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartItems {
    #[serde(default, deserialize_with = "de_cart_id")]
    pub cart_id: String,
    #[serde(default)]
    pub price: Option<CartPrice>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartItems {
    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Quantity payload for cart updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub quantity: u32,
}

impl Quantity {
    pub fn new(quantity: u32) -> Self {
        Self { quantity }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self { quantity: 1 }
    }
}

/// Payment token issued for a purchase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseData {
    #[serde(default)]
    pub token: String,
}

/// Balance of one virtual currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualCurrencyBalance {
    #[serde(default)]
    pub sku: String,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Response of the balance endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualCurrenciesBalance {
    #[serde(default)]
    pub items: Vec<VirtualCurrencyBalance>,
}

impl VirtualCurrenciesBalance {
    /// Balance for a currency by display name
    pub fn by_name(&self, name: &str) -> Option<&VirtualCurrencyBalance> {
        self.items.iter().find(|b| b.name == name)
    }
}
