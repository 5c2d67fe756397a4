//! The checkout transaction: browse cart, check out, store the receipt.
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};
use crate::flow::{present, ActionView, Presentable, Stage};
use crate::{Error, FutureResult, Receipt, ShoppingCart};

/// Shows the cart and resolves with its receipt once "Get receipt" is tapped.
///
/// A declined checkout fails with [`Error::Declined`] on that tap instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFlow {
    pub cart: ShoppingCart,
    decline: Option<String>,
}

impl CheckoutFlow {
    pub fn new(cart: ShoppingCart) -> Self {
        Self { cart, decline: None }
    }

    /// A checkout whose payment is refused with `reason`.
    pub fn declined(cart: ShoppingCart, reason: impl Into<String>) -> Self {
        Self {
            cart,
            decline: Some(reason.into()),
        }
    }
}

impl Presentable for CheckoutFlow {
    type View = ActionView;
    type Value = Receipt;
    type Error = Error;

    fn start(&self) -> (ActionView, FutureResult<Receipt, Error>) {
        let receipt = Receipt::from_cart(&self.cart);
        let decline = self.decline.clone();
        let result = FutureResult::new();
        let done = result.clone();
        let view = ActionView::new("Get receipt").on_action(move || {
            let _ = match &decline {
                Some(reason) => {
                    warn!(%reason, "checkout declined");
                    done.reject(Error::Declined(reason.clone()))
                }
                None => done.resolve(receipt.clone()),
            };
        });
        (view, result)
    }
}

type CartProvider = dyn Fn() -> ShoppingCart;
type CheckoutBuilder = dyn Fn(ShoppingCart) -> CheckoutFlow;
type ReceiptSink = dyn Fn(Receipt) -> FutureResult<(), Error>;

/// Sequences checkout and receipt storage into one future.
///
/// The collaborators are injected: where the cart comes from, how checkout
/// is built from it and where receipts go.
pub struct PointOfSale {
    current_cart: Box<CartProvider>,
    proceed_to_checkout: Box<CheckoutBuilder>,
    store_receipt: Rc<ReceiptSink>,
}

impl PointOfSale {
    pub fn new<C, P, S>(current_cart: C, proceed_to_checkout: P, store_receipt: S) -> Self
    where
        C: Fn() -> ShoppingCart + 'static,
        P: Fn(ShoppingCart) -> CheckoutFlow + 'static,
        S: Fn(Receipt) -> FutureResult<(), Error> + 'static,
    {
        Self {
            current_cart: Box::new(current_cart),
            proceed_to_checkout: Box::new(proceed_to_checkout),
            store_receipt: Rc::new(store_receipt),
        }
    }

    /// Runs one payment.
    ///
    /// `present_checkout` shows the checkout step and hands back its future.
    /// A receipt is stored only if checkout succeeds; the returned future
    /// settles with the storage outcome, or with the checkout failure. It may
    /// already be settled when this returns.
    pub fn pay<F>(&self, present_checkout: F) -> FutureResult<(), Error>
    where
        F: FnOnce(CheckoutFlow) -> FutureResult<Receipt, Error>,
    {
        let cart = (self.current_cart)();
        info!(products = cart.products.len(), "starting payment");
        let checkout = (self.proceed_to_checkout)(cart);

        let store_receipt = self.store_receipt.clone();
        let paid = present_checkout(checkout).and_then(move |receipt| store_receipt(receipt));
        paid.observe(|outcome| match outcome {
            Ok(()) => info!("payment finished"),
            Err(error) => info!(%error, "payment failed"),
        });
        paid
    }

    /// The root "Pay" screen. Tapping it presents checkout on `stage`.
    pub fn start(self: &Rc<Self>, stage: &Rc<Stage>) -> ActionView {
        let point_of_sale = self.clone();
        let stage = Rc::downgrade(stage);
        ActionView::new("Pay").on_action(move || {
            let Some(stage) = stage.upgrade() else {
                return;
            };
            point_of_sale.pay(|checkout| present(&stage, &checkout));
        })
    }
}

/// Keeps stored receipts in memory.
#[derive(Debug, Default)]
pub struct InMemoryReceiptStore {
    receipts: RefCell<Vec<Receipt>>,
    failure: Option<String>,
}

impl InMemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            receipts: RefCell::new(vec![]),
            failure: Some(reason.into()),
        }
    }

    pub fn store(&self, receipt: Receipt) -> FutureResult<(), Error> {
        if let Some(reason) = &self.failure {
            warn!(%reason, "receipt not stored");
            return FutureResult::from(Err(Error::Storage(reason.clone())));
        }
        info!(text = %receipt.text, "receipt stored");
        self.receipts.borrow_mut().push(receipt);
        FutureResult::with_value(())
    }

    pub fn receipts(&self) -> Vec<Receipt> {
        self.receipts.borrow().clone()
    }
}
