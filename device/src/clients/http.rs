use crate::error::Error;
use crate::traits::transport::Transport;
use core::fmt::Write;
use embedded_nal_async::{Dns, TcpConnect};
use heapless::String;
use reqwless::client::HttpClient;
use reqwless::headers::ContentType;
use reqwless::request::{Method, RequestBuilder};

/// [`Transport`] over a plain HTTP connection.
pub struct HttpTransport<'a, T, D>
where
    T: TcpConnect + 'a,
    D: Dns + 'a,
{
    client: HttpClient<'a, T, D>,
    base_url: &'a str,
    rx_buf: [u8; 1024],
}

impl<'a, T, D> HttpTransport<'a, T, D>
where
    T: TcpConnect + 'a,
    D: Dns + 'a,
{
    /// `base_url` is scheme, host and optional port, without trailing slash.
    pub fn new(tcp: &'a T, dns: &'a D, base_url: &'a str) -> Self {
        Self {
            client: HttpClient::new(tcp, dns),
            base_url,
            rx_buf: [0; 1024],
        }
    }
}

impl<'a, T, D> Transport for HttpTransport<'a, T, D>
where
    T: TcpConnect + 'a,
    D: Dns + 'a,
{
    async fn post(&mut self, path: &str, body: &[u8], token: &str) -> Result<(), Error> {
        let mut url: String<256> = String::new();
        write!(url, "{}{}", self.base_url, path).map_err(|_| Error::Config)?;
        let mut authorization: String<520> = String::new();
        write!(authorization, "Bearer {}", token).map_err(|_| Error::Credentials)?;
        let headers = [("Authorization", authorization.as_str())];

        let base_url = self.base_url;
        let mut request = self
            .client
            .request(Method::POST, &url)
            .await
            .map_err(|_| {
                warn!("Error connecting to {}", base_url);
                Error::Network
            })?
            .body(body)
            .content_type(ContentType::ApplicationJson)
            .headers(&headers);

        let response = request.send(&mut self.rx_buf).await.map_err(|_| {
            warn!("Error sending request to {}", base_url);
            Error::Network
        })?;

        if response.status.is_successful() {
            Ok(())
        } else {
            warn!("Request to {} rejected", base_url);
            Err(Error::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::net::{IpAddr, SocketAddr};
    use embedded_io_async::{ErrorKind, ErrorType, Read, Write};
    use embedded_nal_async::AddrType;
    use futures::executor::block_on;

    struct Unreachable;

    impl ErrorType for Unreachable {
        type Error = ErrorKind;
    }

    impl Read for Unreachable {
        async fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ErrorKind> {
            Err(ErrorKind::NotConnected)
        }
    }

    impl Write for Unreachable {
        async fn write(&mut self, _buf: &[u8]) -> Result<usize, ErrorKind> {
            Err(ErrorKind::NotConnected)
        }
    }

    struct Offline;

    impl TcpConnect for Offline {
        type Error = ErrorKind;
        type Connection<'a> = Unreachable where Self: 'a;

        async fn connect<'a>(&'a self, _remote: SocketAddr) -> Result<Unreachable, ErrorKind> {
            Err(ErrorKind::ConnectionRefused)
        }
    }

    impl Dns for Offline {
        type Error = ErrorKind;

        async fn get_host_by_name(&self, _host: &str, _addr_type: AddrType) -> Result<IpAddr, ErrorKind> {
            Err(ErrorKind::NotFound)
        }

        async fn get_host_by_address(&self, _addr: IpAddr, _result: &mut [u8]) -> Result<usize, ErrorKind> {
            Err(ErrorKind::NotFound)
        }
    }

    #[test]
    fn test_unreachable_endpoint() {
        let stack = Offline;
        let mut transport = HttpTransport::new(&stack, &stack, "http://pubsub.local:8085");
        assert_eq!(
            Err(Error::Network),
            block_on(transport.post("/v1/projects/p/topics/t:publish", b"{}", "token"))
        );
    }

    #[test]
    fn test_oversized_url() {
        let stack = Offline;
        let mut transport = HttpTransport::new(&stack, &stack, "http://pubsub.local:8085");
        let path = [b'a'; 300];
        let path = core::str::from_utf8(&path).unwrap();
        assert_eq!(
            Err(Error::Config),
            block_on(transport.post(path, b"{}", "token"))
        );
    }
}
