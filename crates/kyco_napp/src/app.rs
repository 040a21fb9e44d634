//! The NApp trait implemented by every App

use crate::context::AppContext;
use crate::error::HandlerResult;
use crate::listener::Listener;
use async_trait::async_trait;

/// A pluggable unit of application logic hosted by the controller.
///
/// `setup`, `execute` and `shutdown` have no default: a type that leaves one
/// out is rejected by the compiler.
///
/// ```compile_fail
/// use kyco_napp::{async_trait, AppContext, HandlerResult, NApp};
///
/// struct NoShutdown;
///
/// #[async_trait]
/// impl NApp for NoShutdown {
///     fn name(&self) -> &str { "no_shutdown" }
///     async fn setup(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
///     async fn execute(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
/// }
/// ```
///
/// ```compile_fail
/// use kyco_napp::{async_trait, AppContext, HandlerResult, NApp};
///
/// struct NoSetup;
///
/// #[async_trait]
/// impl NApp for NoSetup {
///     fn name(&self) -> &str { "no_setup" }
///     async fn execute(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
///     async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
/// }
/// ```
///
/// ```compile_fail
/// use kyco_napp::{async_trait, AppContext, HandlerResult, NApp};
///
/// struct NoExecute;
///
/// #[async_trait]
/// impl NApp for NoExecute {
///     fn name(&self) -> &str { "no_execute" }
///     async fn setup(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
///     async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
/// }
/// ```
///
/// With all three present the same shape compiles:
///
/// ```
/// use kyco_napp::{async_trait, AppContext, HandlerResult, NApp};
///
/// struct Complete;
///
/// #[async_trait]
/// impl NApp for Complete {
///     fn name(&self) -> &str { "complete" }
///     async fn setup(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
///     async fn execute(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
///     async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
/// }
/// ```
///
/// Listeners are declared once per type in [`NApp::listeners`]; the reserved
/// shutdown listener is added by the framework and calls [`NApp::shutdown`].
///
/// ```rust,no_run
/// use kyco_napp::{async_trait, listen_to, AppContext, HandlerResult, KycoEvent, Listener, NApp};
///
/// struct Echo;
///
/// impl Echo {
///     async fn on_ping(&self, ctx: &AppContext, event: &KycoEvent) -> HandlerResult {
///         ctx.buffers()
///             .add_to_app_buffer(KycoEvent::new("Pong").with_content(event.content.clone()))?;
///         Ok(())
///     }
/// }
///
/// #[async_trait]
/// impl NApp for Echo {
///     fn name(&self) -> &str { "echo" }
///
///     fn listeners() -> Vec<Listener<Self>> {
///         vec![listen_to!("Ping" => on_ping)]
///     }
///
///     async fn setup(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
///
///     async fn execute(&self, ctx: &AppContext) -> HandlerResult {
///         ctx.until_shutdown().await;
///         Ok(())
///     }
///
///     async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
/// }
/// ```
#[async_trait]
pub trait NApp: Send + Sync + Sized + 'static {
    /// Name used to identify the App in logs
    fn name(&self) -> &str;

    /// Core Apps ship with the controller itself
    fn is_core(&self) -> bool {
        false
    }

    /// Listener table of this App type
    fn listeners() -> Vec<Listener<Self>> {
        Vec::new()
    }

    /// First action of the run phase. `execute` only starts once this returns.
    async fn setup(&self, ctx: &AppContext) -> HandlerResult;

    /// Main body of the App, run once after `setup`; may loop until
    /// [`AppContext::until_shutdown`] resolves.
    async fn execute(&self, ctx: &AppContext) -> HandlerResult;

    /// Called when the reserved shutdown event is delivered. Should make
    /// `execute` return if it is looping.
    async fn shutdown(&self, ctx: &AppContext) -> HandlerResult;
}
