//! Services the embedding host provides to the grid.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::error::Result;

/// A fire-and-forget task on the host's single-threaded executor.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs save callbacks without the grid awaiting them.
pub trait TaskSpawner {
    fn spawn_local(&self, task: LocalTask);
}

/// System clipboard.
pub trait Clipboard {
    /// Write plain text.
    ///
    /// # Errors
    /// Returns [`crate::GridError::Clipboard`] when the platform refuses the
    /// write. The grid logs and otherwise ignores the failure.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Host services bundled for [`crate::LedgerGrid::new`].
#[derive(Clone)]
pub struct GridHost {
    pub spawner: Rc<dyn TaskSpawner>,
    pub clipboard: Rc<dyn Clipboard>,
}

/// Spawner backed by the browser microtask queue.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WasmSpawner;

#[cfg(target_arch = "wasm32")]
impl TaskSpawner for WasmSpawner {
    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// `navigator.clipboard`. The write itself is asynchronous; a rejected promise
/// is logged from the spawned task.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigatorClipboard;

#[cfg(target_arch = "wasm32")]
impl Clipboard for NavigatorClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let window = web_sys::window()
            .ok_or_else(|| crate::GridError::Clipboard("no window".to_string()))?;
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!(error = ?err, "clipboard write rejected");
            }
        });
        Ok(())
    }
}
