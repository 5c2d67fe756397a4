//! Declarative composition of presentable flows.
//!
//! A [`FutureResult`] is a single-fire, observable slot for the outcome of
//! one asynchronous operation. A [`Presentable`] flow produces a view and a
//! `FutureResult` of its eventual value, and flows are sequenced by chaining
//! their futures: the [`PointOfSale`] runs checkout, then stores the receipt,
//! and exposes the whole transaction as one future.
//!
//! # Examples
//!
//! ```
//! use flow_result::{FutureResult, PointOfSale, Receipt, ShoppingCart, CheckoutFlow, Presentable};
//!
//! let pos = PointOfSale::new(
//!     || ShoppingCart::from_names(["A", "B"]),
//!     CheckoutFlow::new,
//!     |_receipt: Receipt| FutureResult::with_value(()),
//! );
//! let paid = pos.pay(|checkout| {
//!     let (view, result) = checkout.start();
//!     view.tap();
//!     result
//! });
//! assert_eq!(paid.outcome(), Some(Ok(())));
//! ```
pub mod flow;
pub mod future_result;
pub mod model;
pub mod point_of_sale;

pub use flow::{present, ActionView, Presentable, Presenter, Stage, ViewId};
pub use future_result::{FutureResult, Outcome};
pub use model::{Product, Receipt, ShoppingCart};
pub use point_of_sale::{CheckoutFlow, InMemoryReceiptStore, PointOfSale};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The future already holds an outcome.
    #[error("future result already completed")]
    AlreadyCompleted,
    #[error("payment declined: {0}")]
    Declined(String),
    #[error("failed to store receipt: {0}")]
    Storage(String),
}
