//! Presentable flows: things that can be shown and eventually yield a value.
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::debug;
use crate::FutureResult;

/// A step that produces a displayable unit and the future of its outcome.
///
/// Every call to `start` builds a fresh view and a fresh future; nothing is
/// shared between two runs of the same step.
pub trait Presentable {
    type View;
    type Value;
    type Error;

    fn start(&self) -> (Self::View, FutureResult<Self::Value, Self::Error>);
}

/// Identifies one shown view within its presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

/// Displays views and retires them again.
pub trait Presenter<V> {
    fn show(&self, view: V) -> ViewId;
    /// Retires the view `show` returned `id` for. Unknown ids are ignored.
    fn dismiss(&self, id: ViewId);
}

/// Starts `presentable`, shows its view and returns the step's future.
///
/// Observers registered on the returned future hear the outcome first; then
/// this step's view, and only that one, is dismissed.
///
/// ```
/// use flow_result::{present, ActionView, FutureResult, Presentable, Stage};
/// use std::rc::Rc;
///
/// struct Confirm;
///
/// impl Presentable for Confirm {
///     type View = ActionView;
///     type Value = bool;
///     type Error = ();
///
///     fn start(&self) -> (ActionView, FutureResult<bool, ()>) {
///         let result = FutureResult::new();
///         let done = result.clone();
///         let view = ActionView::new("OK").on_action(move || {
///             let _ = done.resolve(true);
///         });
///         (view, result)
///     }
/// }
///
/// let stage = Rc::new(Stage::new());
/// let confirmed = present(&stage, &Confirm);
/// assert_eq!(stage.top_title().as_deref(), Some("OK"));
/// stage.tap_top();
/// assert_eq!(confirmed.outcome(), Some(Ok(true)));
/// assert_eq!(stage.depth(), 0);
/// ```
pub fn present<S, P>(presenter: &Rc<S>, presentable: &P) -> FutureResult<P::Value, P::Error>
where
    S: Presenter<P::View> + 'static,
    P: Presentable,
    P::Value: Clone + 'static,
    P::Error: Clone + 'static,
{
    let (view, result) = presentable.start();
    let id = presenter.show(view);

    let presented = FutureResult::new();
    let forward = presented.clone();
    let presenter = presenter.clone();
    result.observe(move |outcome| {
        let _ = forward.complete(outcome.clone());
        presenter.dismiss(id);
    });
    presented
}

/// A titled single-button screen.
#[derive(Clone)]
pub struct ActionView {
    title: String,
    on_action: Option<Rc<dyn Fn()>>,
}

impl ActionView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            on_action: None,
        }
    }

    pub fn on_action<F>(mut self, action: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_action = Some(Rc::new(action));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Fires the button's action, if one is set.
    pub fn tap(&self) {
        if let Some(action) = &self.on_action {
            action()
        }
    }
}

impl fmt::Debug for ActionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionView")
            .field("title", &self.title)
            .field("has_action", &self.on_action.is_some())
            .finish()
    }
}

/// Headless presenter: a stack of shown views, topmost last.
#[derive(Debug, Default)]
pub struct Stage {
    views: RefCell<Vec<(ViewId, ActionView)>>,
    next_id: Cell<u64>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn top_title(&self) -> Option<String> {
        self.views.borrow().last().map(|(_, view)| view.title().to_owned())
    }

    /// Taps the topmost view. Returns `false` when nothing is shown.
    pub fn tap_top(&self) -> bool {
        // The action may show or dismiss views, so don't hold the stack.
        let top = self.views.borrow().last().map(|(_, view)| view.clone());
        match top {
            Some(view) => {
                view.tap();
                true
            }
            None => false,
        }
    }
}

impl Presenter<ActionView> for Stage {
    fn show(&self, view: ActionView) -> ViewId {
        let id = ViewId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        debug!(title = view.title(), id = id.0, "showing view");
        self.views.borrow_mut().push((id, view));
        id
    }

    fn dismiss(&self, id: ViewId) {
        let mut views = self.views.borrow_mut();
        if let Some(position) = views.iter().position(|(shown, _)| *shown == id) {
            let (_, view) = views.remove(position);
            debug!(title = view.title(), id = id.0, "dismissed view");
        }
    }
}
