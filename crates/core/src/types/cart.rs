//! Cart items and the in-memory cart collection.
//!
//! A [`Cart`] is an ordered, id-unique list of [`CartItem`]s. Every item
//! present has `quantity >= 1`; an item that would drop to zero is removed.
//! The operations here are pure and synchronous. Persistence lives in the
//! `go-marketplace-cart` crate.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as offered by the catalog, before it has a quantity.
///
/// This is the argument to [`Cart::add`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

impl NewCartItem {
    /// Attach a quantity, turning the product into a cart line.
    #[must_use]
    pub fn with_quantity(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// A product in the cart together with how many units were added.
///
/// Field names match the persisted record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Ordered collection of cart items, unique by product ID.
///
/// Serializes as a bare JSON array of items. Deserializing goes through
/// [`Cart::from_items`], so a stored record can never produce an invalid cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw items, repairing anything that breaks the cart
    /// invariants.
    ///
    /// Items with a zero quantity are dropped. Repeated IDs are folded into
    /// the first occurrence, summing quantities. Order of first appearance is
    /// kept.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(&item.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Look up an item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add one unit of a product.
    ///
    /// Bumps the quantity if the product is already in the cart, otherwise
    /// appends it with quantity 1.
    pub fn add(&mut self, product: NewCartItem) {
        if !self.increment(&product.id) {
            self.items.push(product.with_quantity(1));
        }
    }

    /// Add one unit of an existing item.
    ///
    /// Returns `false` and leaves the cart untouched if the ID is unknown.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Remove one unit of an existing item, dropping the item when it reaches
    /// zero.
    ///
    /// Returns `false` and leaves the cart untouched if the ID is unknown.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let remaining = self.items.get_mut(index).map(|item| {
            item.quantity = item.quantity.saturating_sub(1);
            item.quantity
        });
        if remaining == Some(0) {
            self.items.remove(index);
        }
        true
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Self::from_items)
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<T: IntoIterator<Item = CartItem>>(iter: T) -> Self {
        Self::from_items(iter)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            image_url: format!("https://cdn.example.com/{id}.png"),
            price: Price::from_cents(cents),
        }
    }

    fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|item| (item.id.as_str(), item.quantity))
            .collect()
    }

    #[test]
    fn test_add_new_item_starts_at_one() {
        let mut cart = Cart::new();
        cart.add(product("a", 1000));
        assert_eq!(quantities(&cart), vec![("a", 1)]);
    }

    #[test]
    fn test_add_existing_item_increments() {
        let mut cart = Cart::new();
        cart.add(product("a", 1000));
        cart.add(product("a", 1000));
        assert_eq!(quantities(&cart), vec![("a", 2)]);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(product("a", 100));
        cart.add(product("b", 200));
        cart.add(product("a", 100));
        assert_eq!(quantities(&cart), vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn test_increment_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("a", 100));
        let before = cart.clone();

        assert!(!cart.increment(&ProductId::new("missing")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_to_zero_removes_item() {
        let mut cart = Cart::new();
        cart.add(product("a", 100));
        cart.add(product("b", 100));

        assert!(cart.decrement(&ProductId::new("a")));
        assert_eq!(quantities(&cart), vec![("b", 1)]);
    }

    #[test]
    fn test_decrement_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("a", 100));
        let before = cart.clone();

        assert!(!cart.decrement(&ProductId::new("missing")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_increment_decrement_walkthrough() {
        let a = ProductId::new("a");
        let mut cart = Cart::new();

        cart.add(product("a", 1000));
        assert_eq!(quantities(&cart), vec![("a", 1)]);

        cart.increment(&a);
        assert_eq!(quantities(&cart), vec![("a", 2)]);

        cart.decrement(&a);
        assert_eq!(quantities(&cart), vec![("a", 1)]);

        cart.decrement(&a);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(product("a", 1050));
        cart.add(product("a", 1050));
        cart.add(product("b", 199));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(2299));
        assert_eq!(
            cart.get(&ProductId::new("a")).map(CartItem::line_total),
            Some(Price::from_cents(2100))
        );
    }

    #[test]
    fn test_from_items_repairs_invariants() {
        let cart = Cart::from_items([
            product("a", 100).with_quantity(2),
            product("zero", 100).with_quantity(0),
            product("b", 100).with_quantity(1),
            product("a", 100).with_quantity(3),
        ]);
        assert_eq!(quantities(&cart), vec![("a", 5), ("b", 1)]);
    }

    #[test]
    fn test_serializes_as_array_of_records() {
        let mut cart = Cart::new();
        cart.add(product("a", 1000));

        assert_eq!(
            serde_json::to_string(&cart).unwrap(),
            r#"[{"id":"a","title":"Product a","image_url":"https://cdn.example.com/a.png","price":10.00,"quantity":1}]"#
        );
    }

    #[test]
    fn test_deserializes_records_with_integer_price() {
        let raw = r#"[{"id":"7","title":"Mug","image_url":"mug.png","price":10,"quantity":2}]"#;
        let cart: Cart = serde_json::from_str(raw).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal(), Price::from_cents(2000));
    }

    #[test]
    fn test_deserialize_drops_zero_quantities() {
        let raw = r#"[
            {"id":"a","title":"A","image_url":"","price":1,"quantity":0},
            {"id":"b","title":"B","image_url":"","price":1,"quantity":1}
        ]"#;
        let cart: Cart = serde_json::from_str(raw).unwrap();
        assert_eq!(quantities(&cart), vec![("b", 1)]);
    }
}
