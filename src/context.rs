//! Build context and dependency recording.
//!
//! While an artifact is being built, a [`Context`] is active on the current
//! thread. Content lookups made through the [`Pad`](crate::content::Pad)
//! report the source files they touch to the active context, so the build
//! knows which files an artifact depends on.
//!
//! ```ignore
//! let ctx = Context::new();
//! {
//!     let _guard = context::enter(&ctx);
//!     pad.get("/about");              // records about/contents.toml
//! }
//! assert!(ctx.dependencies().contains(&about_contents));
//! ```

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashSet;

thread_local! {
    /// Stack of active contexts (innermost last).
    static STACK: RefCell<Vec<Rc<Context>>> = const { RefCell::new(Vec::new()) };
}

/// Per-artifact build context.
#[derive(Debug)]
pub struct Context {
    dependencies: RefCell<FxHashSet<PathBuf>>,
    recording: Cell<bool>,
}

impl Context {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            dependencies: RefCell::new(FxHashSet::default()),
            recording: Cell::new(true),
        })
    }

    /// Record a dependency on `path` (ignored while recording is disabled).
    pub fn record_dependency(&self, path: &Path) {
        if self.recording.get() {
            self.dependencies.borrow_mut().insert(path.to_path_buf());
        }
    }

    /// Dependencies recorded so far, sorted.
    pub fn dependencies(&self) -> Vec<PathBuf> {
        let mut deps: Vec<_> = self.dependencies.borrow().iter().cloned().collect();
        deps.sort();
        deps
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording.get()
    }
}

/// Guard returned by [`enter`]; pops the context when dropped.
#[must_use = "the context is left as soon as the guard is dropped"]
pub struct ContextGuard {
    _not_send: std::marker::PhantomData<Rc<()>>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Make `ctx` the active context of the current thread.
pub fn enter(ctx: &Rc<Context>) -> ContextGuard {
    STACK.with(|stack| stack.borrow_mut().push(Rc::clone(ctx)));
    ContextGuard {
        _not_send: std::marker::PhantomData,
    }
}

/// The active context of the current thread, if any.
pub fn current() -> Option<Rc<Context>> {
    STACK.with(|stack| stack.borrow().last().cloned())
}

/// Record dependencies on the active context, if there is one.
pub fn record_dependencies<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    if let Some(ctx) = current() {
        for path in paths {
            ctx.record_dependency(path);
        }
    }
}

/// Guard returned by [`disable_dependency_recording`].
#[must_use = "recording resumes as soon as the guard is dropped"]
pub struct RecordingGuard {
    ctx: Option<Rc<Context>>,
    previous: bool,
}

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        if let Some(ctx) = &self.ctx {
            ctx.recording.set(self.previous);
        }
    }
}

/// Suspend dependency recording on the active context until the guard drops.
///
/// Without an active context this is a no-op.
pub fn disable_dependency_recording() -> RecordingGuard {
    let ctx = current();
    let previous = ctx.as_ref().is_some_and(|c| c.recording.replace(false));
    RecordingGuard { ctx, previous }
}
