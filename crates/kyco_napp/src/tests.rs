//! End-to-end tests of construction, dispatch and lifecycle

use crate::*;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

struct TestBuffers {
    inbound: UnboundedReceiver<KycoEvent>,
    outbound: UnboundedReceiver<KycoEvent>,
    interapp: UnboundedReceiver<KycoEvent>,
}

fn test_config() -> (NAppConfig, TestBuffers) {
    let (in_tx, inbound) = unbounded_channel();
    let (out_tx, outbound) = unbounded_channel();
    let (app_tx, interapp) = unbounded_channel();

    let config = NAppConfig::new()
        .inbound_sink(channel_sink(BufferKind::Inbound, in_tx))
        .outbound_sink(channel_sink(BufferKind::Outbound, out_tx))
        .interapp_sink(channel_sink(BufferKind::InterApp, app_tx));

    (
        config,
        TestBuffers {
            inbound,
            outbound,
            interapp,
        },
    )
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn wait_idle<A: NApp>(handle: &NAppHandle<A>) {
    wait_until(|| handle.stats().in_flight() == 0).await;
}

// ----------------------------------------------------------------------------
// Echo: one listener on "Ping"
// ----------------------------------------------------------------------------

#[derive(Default)]
struct Echo {
    pings: AtomicUsize,
    setups: AtomicUsize,
    shutdowns: AtomicUsize,
}

impl Echo {
    async fn on_ping(&self, ctx: &AppContext, event: &KycoEvent) -> HandlerResult {
        self.pings.fetch_add(1, Ordering::SeqCst);
        ctx.buffers().add_to_app_buffer(
            KycoEvent::new("Pong")
                .with_content(event.content.clone())
                .with_source(ctx.name()),
        )?;
        Ok(())
    }
}

#[async_trait]
impl NApp for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![listen_to!("Ping" => on_ping)]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(&self, ctx: &AppContext) -> HandlerResult {
        ctx.until_shutdown().await;
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_echo_scenario() {
    let (config, mut buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config).unwrap();

    for i in 0..3 {
        let started = echo.deliver("Ping", KycoEvent::new("Ping").with_content(serde_json::json!(i)));
        assert_eq!(started, 1);
    }
    wait_idle(&echo).await;
    assert_eq!(echo.app().pings.load(Ordering::SeqCst), 3);
    assert_eq!(echo.stats().started, 3);
    assert_eq!(echo.stats().completed, 3);

    let mut seen = Vec::new();
    for _ in 0..3 {
        let pong = buffers.interapp.recv().await.unwrap();
        assert_eq!(pong.name, "Pong");
        assert_eq!(pong.source.as_deref(), Some("echo"));
        seen.push(pong.content.as_u64().unwrap());
    }
    seen.sort_unstable();
    assert_eq!(seen, [0, 1, 2]);

    assert_eq!(echo.deliver("Pong", KycoEvent::new("Pong")), 0);
    assert_eq!(echo.stats().started, 3);
    assert_eq!(echo.app().pings.load(Ordering::SeqCst), 3);

    assert!(buffers.inbound.try_recv().is_err());
    assert!(buffers.outbound.try_recv().is_err());
}

#[tokio::test]
async fn test_unbound_event_is_noop() {
    let (config, _buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config).unwrap();

    assert_eq!(echo.deliver("NobodyListens", KycoEvent::new("NobodyListens")), 0);
    assert_eq!(echo.emit(KycoEvent::new("Ping*")), 0);
    assert_eq!(echo.stats(), DispatchStats::default());
}

#[tokio::test]
async fn test_emit_uses_event_name() {
    let (config, _buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config).unwrap();

    assert_eq!(echo.emit(KycoEvent::new("Ping")), 1);
    wait_idle(&echo).await;
    assert_eq!(echo.app().pings.load(Ordering::SeqCst), 1);
}

// ----------------------------------------------------------------------------
// Fan-out: several listeners on "E", several on "F", one on both
// ----------------------------------------------------------------------------

#[derive(Default)]
struct FanOut {
    e_only: AtomicUsize,
    e_again: AtomicUsize,
    f_only: AtomicUsize,
    e_and_f: AtomicUsize,
}

impl FanOut {
    async fn on_e(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        self.e_only.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_e_again(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        self.e_again.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_f(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        self.f_only.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_e_or_f(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        self.e_and_f.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl NApp for FanOut {
    fn name(&self) -> &str {
        "fan_out"
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![
            listen_to!("E" => on_e),
            listen_to!("E" => blocking on_e_again),
            listen_to!("F" => on_f),
            listen_to!("E", "F" => on_e_or_f),
        ]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn execute(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_starts_only_matching_listeners() {
    let (config, _buffers) = test_config();
    let fan_out = NAppHandle::new(FanOut::default(), config).unwrap();

    assert_eq!(fan_out.deliver("E", KycoEvent::new("E")), 3);
    wait_idle(&fan_out).await;

    let app = fan_out.app();
    assert_eq!(app.e_only.load(Ordering::SeqCst), 1);
    assert_eq!(app.e_again.load(Ordering::SeqCst), 1);
    assert_eq!(app.e_and_f.load(Ordering::SeqCst), 1);
    assert_eq!(app.f_only.load(Ordering::SeqCst), 0);

    assert_eq!(fan_out.deliver("F", KycoEvent::new("F")), 2);
    wait_idle(&fan_out).await;
    assert_eq!(app.f_only.load(Ordering::SeqCst), 1);
    assert_eq!(app.e_and_f.load(Ordering::SeqCst), 2);
    assert_eq!(app.e_only.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_multi_name_listener_is_in_every_entry() {
    let (config, _buffers) = test_config();
    let fan_out = NAppHandle::new(FanOut::default(), config).unwrap();
    let registry = fan_out.registry();

    for name in ["E", "F"] {
        assert!(registry
            .handlers_for(name)
            .iter()
            .any(|listener| listener.name() == "on_e_or_f"));
    }
    assert_eq!(registry.handler_count("E"), 3);
    assert_eq!(registry.handler_count("F"), 2);
}

#[tokio::test]
async fn test_registry_is_identical_across_instances() {
    let (first_config, _b1) = test_config();
    let (second_config, _b2) = test_config();
    let first = NAppHandle::new(FanOut::default(), first_config).unwrap();
    let second = NAppHandle::new(FanOut::default(), second_config).unwrap();

    let mut first_keys: Vec<String> = first.registry().event_names().map(|n| n.to_string()).collect();
    let mut second_keys: Vec<String> = second.registry().event_names().map(|n| n.to_string()).collect();
    first_keys.sort();
    second_keys.sort();
    assert_eq!(first_keys, second_keys);
    assert_eq!(first_keys, ["E", "F", SHUTDOWN_EVENT]);

    for key in &first_keys {
        assert_eq!(
            first.registry().handler_count(key),
            second.registry().handler_count(key)
        );
    }
}

#[tokio::test]
async fn test_every_app_listens_to_shutdown() {
    let (config, _buffers) = test_config();
    let fan_out = NAppHandle::new(FanOut::default(), config).unwrap();

    let listeners = fan_out.registry().handlers_for(SHUTDOWN_EVENT);
    assert_eq!(listeners.len(), 1);
    assert_eq!(listeners[0].name(), "shutdown_handler");
}

// ----------------------------------------------------------------------------
// Overlap: invocations of one listener are not serialized
// ----------------------------------------------------------------------------

struct Rendezvous {
    barrier: tokio::sync::Barrier,
    passed: AtomicUsize,
}

impl Rendezvous {
    async fn on_ping(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        self.barrier.wait().await;
        self.passed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl NApp for Rendezvous {
    fn name(&self) -> &str {
        "rendezvous"
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![listen_to!("Ping" => on_ping)]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn execute(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_listener_runs_concurrently() {
    let (config, _buffers) = test_config();
    let app = Rendezvous {
        barrier: tokio::sync::Barrier::new(3),
        passed: AtomicUsize::new(0),
    };
    let rendezvous = NAppHandle::new(app, config).unwrap();

    // Each invocation only passes the barrier once all three are running.
    for _ in 0..3 {
        assert_eq!(rendezvous.deliver("Ping", KycoEvent::new("Ping")), 1);
    }

    wait_until(|| rendezvous.app().passed.load(Ordering::SeqCst) == 3).await;
    wait_idle(&rendezvous).await;
    assert_eq!(
        rendezvous.stats(),
        DispatchStats {
            started: 3,
            completed: 3,
            faulted: 0
        }
    );
}

// ----------------------------------------------------------------------------
// Construction failures
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_buffer_bindings() {
    for kind in BufferKind::ALL {
        let (mut config, _buffers) = test_config();
        match kind {
            BufferKind::Inbound => config.inbound_sink = None,
            BufferKind::Outbound => config.outbound_sink = None,
            BufferKind::InterApp => config.interapp_sink = None,
        }

        match NAppHandle::new(Echo::default(), config) {
            Err(NAppError::MissingDependency(key)) => assert_eq!(key, kind.key()),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("construction without {} should fail", kind.key()),
        }
    }

    let (config, _buffers) = test_config();
    assert!(NAppHandle::new(Echo::default(), config).is_ok());
}

#[test]
fn test_construction_requires_runtime() {
    let (config, _buffers) = test_config();
    assert!(matches!(
        NAppHandle::new(Echo::default(), config),
        Err(NAppError::NoRuntime)
    ));
}

struct BlankName;

impl BlankName {
    async fn on_nothing(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        Ok(())
    }
}

#[async_trait]
impl NApp for BlankName {
    fn name(&self) -> &str {
        "blank"
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![listen_to!("" => on_nothing)]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn execute(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }
}

#[tokio::test]
async fn test_blank_listener_fails_construction() {
    let (config, _buffers) = test_config();
    assert!(matches!(
        NAppHandle::new(BlankName, config),
        Err(NAppError::Definition(_))
    ));
}

// ----------------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------------

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_lifecycle_through_shutdown_event() {
    let (config, _buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config).unwrap();
    assert_eq!(echo.state(), AppState::Created);

    let run_unit = echo.run().unwrap();
    wait_until(|| echo.state() == AppState::Executing).await;
    assert_eq!(echo.app().setups.load(Ordering::SeqCst), 1);

    assert!(matches!(echo.run(), Err(NAppError::AlreadyStarted(AppState::Executing))));

    assert_eq!(echo.request_shutdown(), 1);
    tokio::time::timeout(Duration::from_secs(5), echo.wait_terminated())
        .await
        .expect("echo should terminate after shutdown");
    run_unit.await.unwrap();

    assert_eq!(echo.state(), AppState::Terminated);
    wait_idle(&echo).await;
    assert_eq!(echo.app().shutdowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_execute_returning_terminates() {
    let (config, _buffers) = test_config();
    let fan_out = NAppHandle::new(FanOut::default(), config).unwrap();

    fan_out.run().unwrap().await.unwrap();
    assert_eq!(fan_out.state(), AppState::Terminated);

    // Late shutdown still reaches the App but never moves the state back.
    assert_eq!(fan_out.request_shutdown(), 1);
    wait_idle(&fan_out).await;
    assert_eq!(fan_out.state(), AppState::Terminated);
}

#[tokio::test]
async fn test_shutdown_before_run_blocks_start() {
    let (config, _buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config).unwrap();

    echo.request_shutdown();
    wait_until(|| echo.state() == AppState::ShuttingDown).await;
    assert!(matches!(echo.run(), Err(NAppError::AlreadyStarted(AppState::ShuttingDown))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shutdown_invoked_once_per_delivery() {
    let (config, _buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config).unwrap();
    echo.run().unwrap();

    for _ in 0..20 {
        echo.deliver("Ping", KycoEvent::new("Ping"));
    }
    echo.request_shutdown();
    for _ in 0..20 {
        echo.deliver("Ping", KycoEvent::new("Ping"));
    }
    echo.request_shutdown();

    wait_idle(&echo).await;
    echo.wait_terminated().await;
    assert_eq!(echo.app().shutdowns.load(Ordering::SeqCst), 2);
    assert_eq!(echo.app().pings.load(Ordering::SeqCst), 40);
}

/// App whose `setup` blows up
struct BrokenSetup {
    executed: AtomicUsize,
}

#[async_trait]
impl NApp for BrokenSetup {
    fn name(&self) -> &str {
        "broken_setup"
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        panic!("cannot open switch table");
    }

    async fn execute(&self, _ctx: &AppContext) -> HandlerResult {
        self.executed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }
}

#[tokio::test]
async fn test_setup_panic_terminates_without_execute() {
    let (config, _buffers) = test_config();
    let app = NAppHandle::new(
        BrokenSetup {
            executed: AtomicUsize::new(0),
        },
        config,
    )
    .unwrap();

    app.run().unwrap().await.expect("run unit contains the panic");
    assert_eq!(app.state(), AppState::Terminated);
    assert_eq!(app.app().executed.load(Ordering::SeqCst), 0);
}

// ----------------------------------------------------------------------------
// Isolation
// ----------------------------------------------------------------------------

struct Unruly {
    release: Mutex<Option<std::sync::mpsc::Receiver<()>>>,
    quick: AtomicUsize,
}

impl Unruly {
    fn new(release: std::sync::mpsc::Receiver<()>) -> Self {
        Self {
            release: Mutex::new(Some(release)),
            quick: AtomicUsize::new(0),
        }
    }

    fn on_stall(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        let release = self.release.lock().unwrap().take();
        if let Some(release) = release {
            release
                .recv_timeout(Duration::from_secs(5))
                .map_err(HandlerFault::failed)?;
        }
        Ok(())
    }

    async fn on_quick(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        self.quick.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_fail(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        Err(HandlerFault::failed("flow table full"))
    }

    async fn on_panic(&self, _ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
        panic!("handler exploded");
    }
}

#[async_trait]
impl NApp for Unruly {
    fn name(&self) -> &str {
        "unruly"
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![
            listen_to!("Stall" => blocking on_stall),
            listen_to!("Quick", "Fail", "Panic" => on_quick),
            listen_to!("Fail" => on_fail),
            listen_to!("Panic" => on_panic),
        ]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn execute(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_listener_does_not_stall_others() {
    let (release_tx, release_rx) = std::sync::mpsc::channel();
    let (config, _buffers) = test_config();
    let unruly = NAppHandle::new(Unruly::new(release_rx), config).unwrap();

    assert_eq!(unruly.deliver("Stall", KycoEvent::new("Stall")), 1);
    for _ in 0..5 {
        assert_eq!(unruly.deliver("Quick", KycoEvent::new("Quick")), 1);
    }

    wait_until(|| unruly.app().quick.load(Ordering::SeqCst) == 5).await;
    assert_eq!(unruly.stats().in_flight(), 1);

    release_tx.send(()).unwrap();
    wait_idle(&unruly).await;
    assert_eq!(unruly.stats().completed, 6);
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_faults_are_contained() {
    let (_release_tx, release_rx) = std::sync::mpsc::channel();
    let (config, _buffers) = test_config();
    let unruly = NAppHandle::new(Unruly::new(release_rx), config).unwrap();

    assert_eq!(unruly.deliver("Fail", KycoEvent::new("Fail")), 2);
    assert_eq!(unruly.deliver("Panic", KycoEvent::new("Panic")), 2);
    wait_idle(&unruly).await;

    let stats = unruly.stats();
    assert_eq!(stats.started, 4);
    assert_eq!(stats.faulted, 2);
    assert_eq!(stats.completed, 2);

    // Siblings of the failing listeners ran, and the App keeps dispatching.
    assert_eq!(unruly.app().quick.load(Ordering::SeqCst), 2);
    assert_eq!(unruly.deliver("Quick", KycoEvent::new("Quick")), 1);
    wait_idle(&unruly).await;
    assert_eq!(unruly.app().quick.load(Ordering::SeqCst), 3);
}

// ----------------------------------------------------------------------------
// Injected logging
// ----------------------------------------------------------------------------

#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_logs_go_to_injected_dispatch() {
    let (capture, dispatch) = capture_dispatch();
    let (config, _buffers) = test_config();
    let config = config.log_dispatch(dispatch);
    let (release_tx, release_rx) = std::sync::mpsc::channel();
    drop(release_tx);
    let unruly = NAppHandle::new(Unruly::new(release_rx), config).unwrap();

    unruly.deliver("Fail", KycoEvent::new("Fail"));
    wait_idle(&unruly).await;

    let logs = capture.contents();
    assert!(logs.contains("unruly instantiated"), "logs were: {logs}");
    assert!(logs.contains("on_fail failed on Fail"), "logs were: {logs}");
    assert!(logs.contains("flow table full"), "logs were: {logs}");
}

fn capture_dispatch() -> (CaptureWriter, tracing::Dispatch) {
    let capture = CaptureWriter::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (capture, tracing::Dispatch::new(subscriber))
}

/// Core App that ships with the controller
struct Clock;

#[async_trait]
impl NApp for Clock {
    fn name(&self) -> &str {
        "clock"
    }

    fn is_core(&self) -> bool {
        true
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        tracing::info!("clock wound");
        Ok(())
    }

    async fn execute(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_core_app_logs_in_its_own_span_and_sink() {
    let (clock_logs, clock_dispatch) = capture_dispatch();
    let (echo_logs, echo_dispatch) = capture_dispatch();

    let (config, _clock_buffers) = test_config();
    let clock = NAppHandle::new(Clock, config.log_dispatch(clock_dispatch)).unwrap();
    let (config, _echo_buffers) = test_config();
    let echo = NAppHandle::new(Echo::default(), config.log_dispatch(echo_dispatch)).unwrap();

    clock.run().unwrap().await.unwrap();
    echo.deliver("Ping", KycoEvent::new("Ping"));
    wait_idle(&echo).await;

    let clock_logs = clock_logs.contents();
    assert!(clock_logs.contains("Core App clock instantiated"), "logs were: {clock_logs}");
    assert!(clock_logs.contains("Running Core App clock"), "logs were: {clock_logs}");
    assert!(clock_logs.contains("napp{app=clock}"), "logs were: {clock_logs}");
    assert!(clock_logs.contains("clock wound"), "logs were: {clock_logs}");
    assert!(!clock_logs.contains("echo"), "logs were: {clock_logs}");

    let echo_logs = echo_logs.contents();
    assert!(echo_logs.contains("App echo instantiated"), "logs were: {echo_logs}");
    assert!(!echo_logs.contains("Core App"), "logs were: {echo_logs}");
    assert!(echo_logs.contains("napp{app=echo}"), "logs were: {echo_logs}");
    assert!(!echo_logs.contains("clock"), "logs were: {echo_logs}");
}
