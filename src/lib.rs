pub mod config;
pub mod device;
pub mod error;
pub mod input_loop;
pub mod platform;
pub mod protocol;
pub mod translator;
pub mod transport;

use config::BridgeConfig;
use error::Result;
use input_loop::{InputLoop, SessionStats};
use transport::UdpListener;

/// Bring up the bridge and run the input loop until it fails.
///
/// Startup failures (invalid config file, bind, controller creation) return before
/// the loop is entered.
pub fn run() -> Result<SessionStats> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BridgeConfig::load()?;

    let mut listener = UdpListener::bind(
        config.listen_addr,
        config.receive_buffer_size,
        config.poll_interval(),
    )?;
    let mut controller = platform::connect(&config)?;

    InputLoop::new().run(&mut listener, controller.as_mut())
}
