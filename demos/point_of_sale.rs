//! Runs the point-of-sale flow on a headless stage.
//!
//! `RUST_LOG=debug cargo run --example point_of_sale` shows every view
//! transition and completion.
use flow_result::{
    CheckoutFlow, InMemoryReceiptStore, PointOfSale, Presenter, ShoppingCart, Stage,
};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Rc::new(InMemoryReceiptStore::new());
    let receipts = store.clone();
    let point_of_sale = Rc::new(PointOfSale::new(
        || ShoppingCart::from_names(["Curry wurst", "Club Mate", "Pfefi"]),
        CheckoutFlow::new,
        move |receipt| receipts.store(receipt),
    ));

    let stage = Rc::new(Stage::new());
    stage.show(point_of_sale.start(&stage));

    // "Pay", then "Get receipt".
    while stage.depth() > 0 && store.receipts().is_empty() {
        println!("tapping {:?}", stage.top_title());
        stage.tap_top();
    }
    for receipt in store.receipts() {
        println!("{} @ {}", receipt.text, receipt.date.to_rfc3339());
    }
}
