//! Cart commands.
//!
//! Every mutating command waits for its write to land before returning, so
//! the process never exits with a cart change still in flight.

use std::fmt::Write as _;

use go_marketplace_cart::{CartConfig, CartError, CartStore, FileStore, PersistOutcome};
use go_marketplace_core::{Cart, NewCartItem, Price, ProductId};
use tracing::{info, warn};

/// Open the cart configured by `config`.
pub async fn open(config: &CartConfig) -> CartStore<FileStore> {
    info!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "Opening cart"
    );
    CartStore::load(config.file_store(), &config.storage_key).await
}

/// Print every item in the cart.
#[allow(clippy::print_stdout)]
pub fn list(store: &CartStore<FileStore>) {
    print!("{}", store.with_cart(render_list));
}

/// Print item count and subtotal.
#[allow(clippy::print_stdout)]
pub fn total(store: &CartStore<FileStore>) {
    println!("{}", store.with_cart(render_total));
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the cart could not be written.
pub async fn add(
    store: &CartStore<FileStore>,
    id: String,
    title: String,
    image_url: String,
    price: Price,
) -> Result<(), CartError> {
    let product = NewCartItem {
        id: ProductId::new(id),
        title,
        image_url,
        price,
    };
    let id = product.id.clone();

    let outcome = store.add_to_cart(product).wait().await?;
    report(store, &id, outcome);
    Ok(())
}

/// Add one unit of an item already in the cart.
///
/// # Errors
///
/// Returns an error if the cart could not be written.
pub async fn increment(store: &CartStore<FileStore>, id: &str) -> Result<(), CartError> {
    let id = ProductId::new(id);
    warn_if_missing(store, &id);
    let outcome = store.increment(&id).wait().await?;
    report(store, &id, outcome);
    Ok(())
}

/// Remove one unit of an item.
///
/// # Errors
///
/// Returns an error if the cart could not be written.
pub async fn decrement(store: &CartStore<FileStore>, id: &str) -> Result<(), CartError> {
    let id = ProductId::new(id);
    warn_if_missing(store, &id);
    let outcome = store.decrement(&id).wait().await?;
    report(store, &id, outcome);
    Ok(())
}

fn warn_if_missing(store: &CartStore<FileStore>, id: &ProductId) {
    if store.with_cart(|cart| cart.get(id).is_none()) {
        warn!(product_id = %id, "Product is not in the cart, nothing to change");
    }
}

#[allow(clippy::print_stdout)]
fn report(store: &CartStore<FileStore>, id: &ProductId, outcome: PersistOutcome) {
    info!(generation = outcome.generation(), "Cart saved");
    let quantity = store.with_cart(|cart| cart.get(id).map_or(0, |item| item.quantity));
    println!("{id}: quantity {quantity}");
}

/// Render one line per item plus a closing total line.
fn render_list(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "{id}\t{title}\t{quantity} x {price}\t{line}",
            id = item.id,
            title = item.title,
            quantity = item.quantity,
            price = item.price,
            line = item.line_total(),
        );
    }
    let _ = writeln!(out, "{}", render_total(cart));
    out
}

fn render_total(cart: &Cart) -> String {
    format!("{} item(s), subtotal {}", cart.item_count(), cart.subtotal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn product(id: &str, title: &str, cents: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            title: title.to_string(),
            image_url: String::new(),
            price: Price::from_cents(cents),
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_list(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_list() {
        let mut cart = Cart::new();
        cart.add(product("1", "Mug", 1990));
        cart.add(product("1", "Mug", 1990));
        cart.add(product("2", "Tee", 2500));

        assert_eq!(
            render_list(&cart),
            "1\tMug\t2 x 19.90\t39.80\n\
             2\tTee\t1 x 25.00\t25.00\n\
             3 item(s), subtotal 64.80\n"
        );
    }

    #[tokio::test]
    async fn test_commands_persist_to_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = CartConfig::default().with_data_dir(dir.path());

        let store = open(&config).await;
        add(&store, "1".into(), "Mug".into(), String::new(), Price::from_cents(1990))
            .await
            .unwrap();
        increment(&store, "1").await.unwrap();
        decrement(&store, "missing").await.unwrap();

        let reopened = open(&config).await;
        assert_eq!(reopened.cart(), store.cart());
        assert_eq!(reopened.item_count(), 2);
    }
}
