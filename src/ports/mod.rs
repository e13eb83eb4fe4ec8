//! Ports (trait seams) between the client core and its collaborators.

mod gateway_transport;
mod payment_events;
mod token_cache;

pub use gateway_transport::{
    GatewayRequest, GatewayResponse, GatewayTransport, RequestAuth, TransportError,
};
pub use payment_events::{NullPaymentEvents, PaymentEvents};
pub use token_cache::{CacheError, TokenCache};
