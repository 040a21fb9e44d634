//! Macros for App development

/// Declare a listener for an App method.
///
/// Used inside `impl NApp for MyApp`, typically in `listeners()`:
///
/// - `listen_to!("A", "B" => on_ab)` binds
///   `async fn on_ab(&self, ctx: &AppContext, event: &KycoEvent) -> HandlerResult`
/// - `listen_to!("A" => blocking on_a)` binds the synchronous
///   `fn on_a(&self, ctx: &AppContext, event: &KycoEvent) -> HandlerResult`,
///   which runs on the blocking pool
///
/// The listener is named after the method in logs.
#[macro_export]
macro_rules! listen_to {
    ($first:expr $(, $rest:expr)* => blocking $method:ident) => {
        $crate::ListenTo::new($first)
            $(.and($rest))*
            .blocking(
                |app: ::std::sync::Arc<Self>,
                 ctx: $crate::AppContext,
                 event: ::std::sync::Arc<$crate::KycoEvent>| app.$method(&ctx, &event),
            )
            .named(stringify!($method))
    };
    ($first:expr $(, $rest:expr)* => $method:ident) => {
        $crate::ListenTo::new($first)
            $(.and($rest))*
            .handler(
                |app: ::std::sync::Arc<Self>,
                 ctx: $crate::AppContext,
                 event: ::std::sync::Arc<$crate::KycoEvent>| async move {
                    app.$method(&ctx, &event).await
                },
            )
            .named(stringify!($method))
    };
}

/// Build a keyed buffer configuration from closures or sinks.
///
/// ```rust
/// use kyco_napp::{buffer_config, BufferError, KycoEvent};
///
/// let config = buffer_config! {
///     inbound_sink => |_e: KycoEvent| -> Result<(), BufferError> { Ok(()) },
///     outbound_sink => |_e: KycoEvent| -> Result<(), BufferError> { Ok(()) },
/// };
/// assert!(config.validate().is_err());
/// ```
#[macro_export]
macro_rules! buffer_config {
    ($($key:ident => $sink:expr),* $(,)?) => {{
        let mut sinks: ::std::collections::HashMap<
            ::std::string::String,
            ::std::sync::Arc<dyn $crate::BufferSink>,
        > = ::std::collections::HashMap::new();
        $(
            sinks.insert(stringify!($key).to_string(), ::std::sync::Arc::new($sink));
        )*
        $crate::NAppConfig::from_map(sinks)
    }};
}
