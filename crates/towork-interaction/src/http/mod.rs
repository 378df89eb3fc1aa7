//! Request model, transport seam and interceptors.

mod interceptor;
mod request;
mod transport;

pub use interceptor::{AuthErrorInterceptor, BearerTokenInterceptor, RequestInterceptor};
pub use request::{ApiRequest, FilePart, MultipartForm, RawResponse, RequestBody};
pub use transport::{HttpTransport, ReqwestTransport};
pub use reqwest::{Method, StatusCode};
