#[cfg(test)]
mod tests {
    use flow_result::{
        present, CheckoutFlow, Error, FutureResult, InMemoryReceiptStore, PointOfSale,
        Presentable, Presenter, Receipt, ShoppingCart, Stage,
    };
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn point_of_sale(store: Rc<InMemoryReceiptStore>) -> PointOfSale {
        PointOfSale::new(
            || ShoppingCart::from_names(["A", "B"]),
            CheckoutFlow::new,
            move |receipt| store.store(receipt),
        )
    }

    #[test]
    fn test_checkout_then_store_succeeds() {
        let store = Rc::new(InMemoryReceiptStore::new());
        let pos = point_of_sale(store.clone());

        let tap = RefCell::new(None);
        let paid = pos.pay(|checkout| {
            let (view, result) = checkout.start();
            *tap.borrow_mut() = Some(view);
            result
        });
        assert!(!paid.is_completed());
        assert!(store.receipts().is_empty());

        tap.borrow().as_ref().unwrap().tap();
        assert_eq!(paid.outcome(), Some(Ok(())));
        let receipts = store.receipts();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].text, "A, B");
        assert_eq!(block_on(paid), Ok(()));
    }

    #[test]
    fn test_declined_checkout_never_stores() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let pos = PointOfSale::new(
            || ShoppingCart::from_names(["A", "B"]),
            CheckoutFlow::new,
            move |_| {
                counter.set(counter.get() + 1);
                FutureResult::with_value(())
            },
        );

        let step = FutureResult::<Receipt, Error>::new();
        let pending = step.clone();
        let paid = pos.pay(move |_| pending);
        step.reject(Error::Declined("card_declined".into())).unwrap();

        assert_eq!(
            paid.outcome(),
            Some(Err(Error::Declined("card_declined".into())))
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_storage_outcome_becomes_final_outcome() {
        let store = Rc::new(InMemoryReceiptStore::failing("disk full"));
        let pos = point_of_sale(store.clone());
        let paid =
            pos.pay(|checkout| FutureResult::with_value(Receipt::from_cart(&checkout.cart)));
        assert_eq!(
            paid.outcome(),
            Some(Err(Error::Storage("disk full".into())))
        );
    }

    #[test]
    fn test_final_future_waits_for_storage() {
        let storage = FutureResult::<(), Error>::new();
        let received = Rc::new(RefCell::new(vec![]));
        let (pending, sink) = (storage.clone(), received.clone());
        let pos = PointOfSale::new(
            || ShoppingCart::from_names(["Club Mate"]),
            CheckoutFlow::new,
            move |receipt: Receipt| {
                sink.borrow_mut().push(receipt.text);
                pending.clone()
            },
        );

        let order = Rc::new(RefCell::new(vec![]));
        let step = FutureResult::<Receipt, Error>::new();
        let (pending_step, step_log) = (step.clone(), order.clone());
        step.observe(move |_| step_log.borrow_mut().push("checkout"));
        let paid = pos.pay(move |_| pending_step);
        let final_log = order.clone();
        paid.observe(move |_| final_log.borrow_mut().push("paid"));

        step.resolve(Receipt::from_cart(&ShoppingCart::from_names(["Club Mate"])))
            .unwrap();
        assert_eq!(*received.borrow(), vec!["Club Mate"]);
        assert!(!paid.is_completed());

        order.borrow_mut().push("stored");
        storage.resolve(()).unwrap();
        assert_eq!(*order.borrow(), vec!["checkout", "stored", "paid"]);
        assert_eq!(paid.outcome(), Some(Ok(())));
    }

    #[test]
    fn test_declined_checkout_on_stage_stores_nothing() {
        let store = Rc::new(InMemoryReceiptStore::new());
        let receipts = store.clone();
        let pos = Rc::new(PointOfSale::new(
            || ShoppingCart::from_names(["A", "B"]),
            |cart| CheckoutFlow::declined(cart, "card_declined"),
            move |receipt| receipts.store(receipt),
        ));
        let stage = Rc::new(Stage::new());
        stage.show(pos.start(&stage));

        let outcome = Rc::new(RefCell::new(None));
        let sink = outcome.clone();
        let paid = pos.pay(|checkout| present(&stage, &checkout));
        paid.observe(move |settled| *sink.borrow_mut() = Some(settled.clone()));
        assert_eq!(stage.top_title().as_deref(), Some("Get receipt"));

        assert!(stage.tap_top());
        assert_eq!(
            *outcome.borrow(),
            Some(Err(Error::Declined("card_declined".into())))
        );
        assert!(store.receipts().is_empty());
        assert_eq!(stage.top_title().as_deref(), Some("Pay"));
    }

    #[test]
    fn test_pay_screen_drives_checkout_on_stage() {
        let store = Rc::new(InMemoryReceiptStore::new());
        let pos = Rc::new(point_of_sale(store.clone()));
        let stage = Rc::new(Stage::new());
        stage.show(pos.start(&stage));
        assert_eq!(stage.top_title().as_deref(), Some("Pay"));

        assert!(stage.tap_top());
        assert_eq!(stage.depth(), 2);
        assert_eq!(stage.top_title().as_deref(), Some("Get receipt"));

        assert!(stage.tap_top());
        assert_eq!(stage.depth(), 1);
        assert_eq!(stage.top_title().as_deref(), Some("Pay"));
        assert_eq!(store.receipts().len(), 1);

        // Paying again runs an independent checkout.
        assert!(stage.tap_top());
        assert!(stage.tap_top());
        assert_eq!(store.receipts().len(), 2);
        assert_eq!(stage.depth(), 1);
    }
}
