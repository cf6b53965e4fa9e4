use crate::error::{BridgeError, Result};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// One received datagram, decoded as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: String,
    pub origin: SocketAddr,
}

/// Blocking source of datagrams.
///
/// `Ok(None)` means the source woke up without data so the caller can check
/// for a stop request; it is not end-of-stream.
pub trait DatagramSource {
    fn receive(&mut self) -> Result<Option<Datagram>>;
}

/// UDP socket bound for the lifetime of the bridge.
pub struct UdpListener {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpListener {
    pub fn bind(addr: SocketAddr, buffer_size: usize, poll_interval: Duration) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|source| BridgeError::Bind { addr, source })?;
        socket.set_read_timeout(Some(poll_interval))?;
        log::info!("Listening for datagrams on {}", socket.local_addr()?);
        Ok(Self {
            socket,
            buf: vec![0; buffer_size],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramSource for UdpListener {
    fn receive(&mut self) -> Result<Option<Datagram>> {
        loop {
            match self.socket.recv_from(&mut self.buf) {
                Ok((len, origin)) => {
                    let payload = String::from_utf8_lossy(&self.buf[..len]).into_owned();
                    return Ok(Some(Datagram { payload, origin }));
                }
                // Read timeout: WouldBlock on Unix, TimedOut on Windows.
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None)
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(BridgeError::Receive(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_listener() -> UdpListener {
        UdpListener::bind(
            "127.0.0.1:0".parse().unwrap(),
            1024,
            Duration::from_millis(50),
        )
        .unwrap()
    }

    fn receive_some(listener: &mut UdpListener) -> Datagram {
        for _ in 0..100 {
            if let Some(datagram) = listener.receive().unwrap() {
                return datagram;
            }
        }
        panic!("no datagram received");
    }

    #[test]
    fn receives_payload_and_origin() {
        let mut listener = loopback_listener();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(b"RX=120,A=1", listener.local_addr().unwrap())
            .unwrap();

        let datagram = receive_some(&mut listener);
        assert_eq!(datagram.payload, "RX=120,A=1");
        assert_eq!(datagram.origin, sender.local_addr().unwrap());
    }

    #[test]
    fn invalid_utf8_is_passed_through_as_text() {
        let mut listener = loopback_listener();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(b"A=1,\xff\xfe,B=1", listener.local_addr().unwrap())
            .unwrap();

        let datagram = receive_some(&mut listener);
        assert!(datagram.payload.starts_with("A=1,"));
        assert!(datagram.payload.ends_with(",B=1"));
    }

    #[test]
    fn idle_socket_times_out_without_error() {
        let mut listener = loopback_listener();
        assert_eq!(listener.receive().unwrap(), None);
    }

    #[test]
    fn binding_a_taken_port_fails() {
        let first = loopback_listener();
        let addr = first.local_addr().unwrap();

        let err = UdpListener::bind(addr, 1024, Duration::from_millis(50))
            .err()
            .expect("second bind should fail");
        assert!(matches!(err, BridgeError::Bind { .. }));
    }
}
