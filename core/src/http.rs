//! HTTP request description and the transport seam.
//!
//! # Design
//! `Exchange` never opens a socket itself. It describes the request as plain
//! data (`HttpRequest`) and hands it to whatever `Transport` the caller
//! injects. A transport only has to turn a request into a response body or
//! fail; the client folds every failure into `ExchangeError::Connection`, so
//! the transport's own error type never reaches callers.
//!
//! `UreqTransport` (feature `ureq`, enabled by default) is the stock blocking
//! implementation.

/// HTTP method for a request. The Fixer API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `Exchange::build_request`. Headers keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// First header value whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Failure reported by a transport. Only its message survives into
/// `ExchangeError::Connection`.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Executes one `HttpRequest` and returns the raw response body.
///
/// Implementations should treat non-2xx statuses as failures.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<String, TransportError>,
{
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::{HttpMethod, HttpRequest, Transport, TransportError};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// Timeouts, proxies and TLS settings come from the agent's configuration.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self {
                agent: ureq::Agent::new_with_defaults(),
            }
        }

        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<String, TransportError> {
            let mut builder = match request.method {
                HttpMethod::Get => self.agent.get(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            let mut response = builder.call()?;
            let body = response.body_mut().read_to_string()?;
            Ok(body)
        }
    }
}
