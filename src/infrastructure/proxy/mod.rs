mod upstream_relay;

pub use upstream_relay::{RelayError, RelayedResponse, UpstreamRelay};
