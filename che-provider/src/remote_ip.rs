//! Host IP detection for user-facing URLs and launcher wiring.

use std::env;
use std::net::UdpSocket;

/// Gateway addresses used by Docker for Mac / Docker for Windows; from
/// the host's point of view these are reachable as localhost.
const DOCKER_DESKTOP_IPS: [&str; 2] = ["192.168.65.2", "10.0.75.2"];

/// Detects the host's outbound IPv4 address.
///
/// `CHE_HOST_IP` wins when set. Otherwise a connected UDP socket tells
/// us which local address the routing table would pick; no packet is
/// actually sent. Falls back to loopback on fully offline machines.
pub fn detect_host_ip() -> String {
    if let Ok(ip) = env::var("CHE_HOST_IP") {
        return ip;
    }

    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:53")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Rewrites container-gateway addresses to `localhost` for display.
pub fn display_host(ip: &str) -> &str {
    if DOCKER_DESKTOP_IPS.contains(&ip) {
        "localhost"
    } else {
        ip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_desktop_gateways_display_as_localhost() {
        assert_eq!(display_host("192.168.65.2"), "localhost");
        assert_eq!(display_host("10.0.75.2"), "localhost");
        assert_eq!(display_host("10.1.2.3"), "10.1.2.3");
    }

    #[test]
    fn detection_returns_some_address() {
        let ip = detect_host_ip();
        assert!(!ip.is_empty());
    }
}
