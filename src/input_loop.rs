use crate::device::ControllerState;
use crate::error::Result;
use crate::platform::{self, VirtualController};
use crate::transport::DatagramSource;
use crate::translator::{self, Translation};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub datagrams: u64,
    pub fields_applied: u64,
    pub fields_skipped: u64,
}

impl SessionStats {
    fn record(&mut self, outcome: Translation) {
        self.datagrams += 1;
        self.fields_applied += outcome.applied as u64;
        self.fields_skipped += outcome.skipped as u64;
    }
}

/// Requests an [`InputLoop`] to return. Checked only between receives.
///
/// A stop is sticky: requested before [`InputLoop::run`] it makes `run`
/// return without receiving anything.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// The receive → translate → publish loop.
///
/// Runs on the calling thread; each datagram is fully merged and published
/// before the next receive. Controller state lives for one call to [`run`].
///
/// [`run`]: InputLoop::run
pub struct InputLoop {
    running: AtomicBool,
    stop_requested: Arc<AtomicBool>,
}

impl InputLoop {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            stop_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop_requested.clone())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run until stopped or until receive/publish fails.
    pub fn run(
        &mut self,
        source: &mut dyn DatagramSource,
        controller: &mut dyn VirtualController,
    ) -> Result<SessionStats> {
        self.running.store(true, Ordering::SeqCst);
        log::info!("Input loop started");

        let mut state = ControllerState::new();
        let mut stats = SessionStats::default();
        let result = self.drive(source, controller, &mut state, &mut stats);

        self.running.store(false, Ordering::SeqCst);
        log::info!(
            "Input loop stopped after {} datagrams ({} fields applied, {} skipped)",
            stats.datagrams,
            stats.fields_applied,
            stats.fields_skipped
        );
        result.map(|()| stats)
    }

    fn drive(
        &self,
        source: &mut dyn DatagramSource,
        controller: &mut dyn VirtualController,
        state: &mut ControllerState,
        stats: &mut SessionStats,
    ) -> Result<()> {
        while !self.stop_requested.load(Ordering::SeqCst) {
            let Some(datagram) = source.receive()? else {
                continue;
            };
            log::info!("{} -> {}", datagram.origin, datagram.payload);

            let outcome = translator::translate(state, &datagram.payload);
            stats.record(outcome);
            platform::publish(controller, state)?;
        }
        Ok(())
    }
}

impl Default for InputLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Button;
    use crate::error::BridgeError;
    use crate::platform::recording::RecordingController;
    use crate::transport::Datagram;
    use std::collections::VecDeque;

    /// Replays scripted payloads, with `None` standing for a poll timeout,
    /// then stops the loop once drained.
    struct ScriptedSource {
        script: VecDeque<Option<&'static str>>,
        stop: StopHandle,
    }

    impl ScriptedSource {
        fn new(input_loop: &InputLoop, script: &[Option<&'static str>]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                stop: input_loop.stop_handle(),
            }
        }
    }

    impl DatagramSource for ScriptedSource {
        fn receive(&mut self) -> Result<Option<Datagram>> {
            let next = self.script.pop_front();
            if self.script.is_empty() {
                self.stop.stop();
            }
            Ok(next.flatten().map(|payload| Datagram {
                payload: payload.to_string(),
                origin: "127.0.0.1:5005".parse().unwrap(),
            }))
        }
    }

    #[test]
    fn publishes_once_per_datagram() {
        let mut input_loop = InputLoop::new();
        let mut source = ScriptedSource::new(
            &input_loop,
            &[Some("RX=50,RY=50"), None, Some("A=1"), Some("A=1")],
        );
        let mut controller = RecordingController::default();

        let stats = input_loop.run(&mut source, &mut controller).unwrap();

        assert_eq!(stats.datagrams, 3);
        assert_eq!(controller.submitted.len(), 3);
        let last = &controller.submitted[2];
        assert_eq!((last.x, last.y), (50, 50));
        assert_eq!(last.pressed().collect::<Vec<_>>(), vec![Button::A]);
        assert_eq!(controller.submitted[1], controller.submitted[2]);
        assert!(!input_loop.is_running());
    }

    #[test]
    fn bad_fields_do_not_stop_the_loop() {
        let mut input_loop = InputLoop::new();
        let mut source =
            ScriptedSource::new(&input_loop, &[Some("A=1,garbage,B=1"), Some("FOO=1,RX=abc")]);
        let mut controller = RecordingController::default();

        let stats = input_loop.run(&mut source, &mut controller).unwrap();

        assert_eq!(
            stats,
            SessionStats {
                datagrams: 2,
                fields_applied: 2,
                fields_skipped: 3,
            }
        );
        assert_eq!(controller.submitted[1], ControllerState::new());
    }

    #[test]
    fn publish_failure_is_fatal() {
        let mut input_loop = InputLoop::new();
        let mut source =
            ScriptedSource::new(&input_loop, &[Some("A=1"), Some("B=1"), Some("X=1")]);
        let mut controller = RecordingController::failing_after(1);

        let err = input_loop.run(&mut source, &mut controller).unwrap_err();

        assert!(matches!(err, BridgeError::Publish(_)));
        assert_eq!(controller.submitted.len(), 1);
        assert_eq!(source.script.len(), 1);
        assert!(!input_loop.is_running());
    }

    #[test]
    fn stop_is_honoured_while_idle() {
        let mut input_loop = InputLoop::new();
        let mut source = ScriptedSource::new(&input_loop, &[None, None]);
        let mut controller = RecordingController::default();

        let stats = input_loop.run(&mut source, &mut controller).unwrap();

        assert_eq!(stats, SessionStats::default());
        assert!(controller.submitted.is_empty());
    }

    /// Never has data; counts how often it was asked.
    #[derive(Default)]
    struct IdleSource {
        receives: usize,
    }

    impl DatagramSource for IdleSource {
        fn receive(&mut self) -> Result<Option<Datagram>> {
            self.receives += 1;
            if self.receives > 5 {
                return Err(BridgeError::Receive(std::io::ErrorKind::Other.into()));
            }
            Ok(None)
        }
    }

    #[test]
    fn stop_before_run_skips_receiving() {
        let mut input_loop = InputLoop::new();
        input_loop.stop_handle().stop();
        let mut source = IdleSource::default();
        let mut controller = RecordingController::default();

        let stats = input_loop.run(&mut source, &mut controller).unwrap();

        assert_eq!(source.receives, 0);
        assert_eq!(stats, SessionStats::default());
        assert!(!input_loop.is_running());
    }
}
